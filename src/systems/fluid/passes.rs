//! SPH passes over a snapshot of fluid particle state
//!
//! Pure functions over slices: the engine gathers positions and velocities,
//! runs the passes, then scatters forces back to the particles.

use crate::core::Vec2;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::config::FluidConfig;

const PRESSURE_FORCE_SCALE: f64 = 80.0;
const VISCOSITY_FORCE_SCALE: f64 = 70.0;
/// Added to the separation distance so coincident particles stay finite.
const SEPARATION_EPSILON: f64 = 1e-7;

/// Density pass: every unordered pair inside the smoothing radius adds
/// `(1 - d/h)^2` to both densities and becomes mutual neighbors.
///
/// Returns the number of interacting pairs.
pub(super) fn accumulate_density(
    positions: &[Vec2],
    smooth_radius: f64,
    density: &mut [f64],
    neighbors: &mut [Vec<usize>],
) -> usize {
    let h2 = smooth_radius * smooth_radius;
    density.iter_mut().for_each(|d| *d = 0.0);
    neighbors.iter_mut().for_each(|n| n.clear());

    let mut pairs = 0;
    for i in 0..positions.len() {
        for j in 0..i {
            let d2 = positions[i].distance_squared(positions[j]);
            if d2 < h2 {
                let weight = (1.0 - d2.sqrt() / smooth_radius).powi(2);
                density[i] += weight;
                density[j] += weight;
                neighbors[i].push(j);
                neighbors[j].push(i);
                pairs += 1;
            }
        }
    }
    pairs
}

/// Pressure pass: clamp density to rest density, then linear equation of state.
pub(super) fn compute_pressure(config: &FluidConfig, density: &mut [f64], pressure: &mut [f64]) {
    for (d, p) in density.iter_mut().zip(pressure.iter_mut()) {
        if *d < config.rest_density {
            *d = config.rest_density;
        }
        *p = (*d - config.rest_density) * config.gas_constant;
    }
}

/// Read-only state the force pass needs.
pub(super) struct ForceInputs<'a> {
    pub positions: &'a [Vec2],
    pub velocities: &'a [Vec2],
    pub density: &'a [f64],
    pub pressure: &'a [f64],
    pub neighbors: &'a [Vec<usize>],
}

/// Pressure + viscosity force on particle `i` from its recorded neighbors.
fn force_on(i: usize, input: &ForceInputs, config: &FluidConfig) -> Vec2 {
    let mut force = Vec2::zero();
    let xi = input.positions[i];
    let vi = input.velocities[i];
    let rho_i = input.density[i];
    let p_i = input.pressure[i];

    for &j in &input.neighbors[i] {
        let xj = input.positions[j];
        let rho_j = input.density[j];

        let d = xi.distance(xj);
        let weight = 1.0 - d / config.smooth_radius;

        let pressure = PRESSURE_FORCE_SCALE * weight * (p_i + input.pressure[j])
            / (2.0 * rho_i * rho_j)
            * config.pressure_multiplier;
        force += (xi - xj) / (d + SEPARATION_EPSILON) * pressure;

        let viscosity = VISCOSITY_FORCE_SCALE * weight / rho_j * config.viscosity;
        force += -(vi - input.velocities[j]) * viscosity;
    }
    force
}

/// Force pass: one force per particle, in particle order.
///
/// With the `parallel` feature each particle's force is computed on the
/// rayon pool; the per-particle sums are identical to the serial path.
pub(super) fn compute_forces(input: &ForceInputs, config: &FluidConfig, out: &mut Vec<Vec2>) {
    let n = input.positions.len();
    out.clear();

    #[cfg(feature = "parallel")]
    {
        out.par_extend((0..n).into_par_iter().map(|i| force_on(i, input, config)));
    }

    #[cfg(not(feature = "parallel"))]
    {
        out.extend((0..n).map(|i| force_on(i, input, config)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_density(positions: &[Vec2], h: f64) -> (Vec<f64>, Vec<Vec<usize>>, usize) {
        let mut density = vec![0.0; positions.len()];
        let mut neighbors = vec![Vec::new(); positions.len()];
        let pairs = accumulate_density(positions, h, &mut density, &mut neighbors);
        (density, neighbors, pairs)
    }

    #[test]
    fn pair_density_is_symmetric() {
        let positions = [Vec2::new(0.0, 0.0), Vec2::new(0.3, 0.4)];
        let (density, neighbors, pairs) = run_density(&positions, 1.0);
        assert_eq!(pairs, 1);
        assert_eq!(density[0], density[1]);
        // d = 0.5 -> (1 - 0.5)^2
        assert!((density[0] - 0.25).abs() < 1e-12);
        assert_eq!(neighbors[0], vec![1]);
        assert_eq!(neighbors[1], vec![0]);
    }

    #[test]
    fn particles_at_radius_do_not_interact() {
        let positions = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)];
        let (density, neighbors, pairs) = run_density(&positions, 1.0);
        assert_eq!(pairs, 0);
        assert_eq!(density, vec![0.0, 0.0]);
        assert!(neighbors.iter().all(|n| n.is_empty()));
    }

    #[test]
    fn stale_neighbors_are_cleared() {
        let mut density = vec![5.0, 5.0];
        let mut neighbors = vec![vec![1, 1, 1], vec![0]];
        let positions = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)];
        accumulate_density(&positions, 1.0, &mut density, &mut neighbors);
        assert_eq!(density, vec![0.0, 0.0]);
        assert!(neighbors.iter().all(|n| n.is_empty()));
    }

    #[test]
    fn pressure_floors_at_rest_density() {
        let config = FluidConfig {
            rest_density: 0.5,
            gas_constant: 2.0,
            ..FluidConfig::default()
        };
        let mut density = vec![0.1, 0.5, 1.5];
        let mut pressure = vec![0.0; 3];
        compute_pressure(&config, &mut density, &mut pressure);
        assert_eq!(density, vec![0.5, 0.5, 1.5]);
        assert_eq!(pressure, vec![0.0, 0.0, 2.0]);
    }

    #[test]
    fn coincident_particles_get_finite_force() {
        let config = FluidConfig::default();
        let positions = vec![Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0)];
        let velocities = vec![Vec2::zero(); 2];
        let mut density = vec![0.0; 2];
        let mut neighbors = vec![Vec::new(); 2];
        accumulate_density(&positions, config.smooth_radius, &mut density, &mut neighbors);
        let mut pressure = vec![0.0; 2];
        compute_pressure(&config, &mut density, &mut pressure);
        assert!(pressure[0] > 0.0);

        let input = ForceInputs {
            positions: &positions,
            velocities: &velocities,
            density: &density,
            pressure: &pressure,
            neighbors: &neighbors,
        };
        let mut forces = Vec::new();
        compute_forces(&input, &config, &mut forces);
        assert_eq!(forces.len(), 2);
        assert!(forces.iter().all(|f| f.is_finite()));
    }

    #[test]
    fn pair_forces_are_opposite() {
        let config = FluidConfig::default();
        let positions = vec![Vec2::new(0.0, 0.0), Vec2::new(0.2, 0.1)];
        let velocities = vec![Vec2::new(1.0, 0.0), Vec2::new(-0.5, 0.25)];
        let mut density = vec![0.0; 2];
        let mut neighbors = vec![Vec::new(); 2];
        accumulate_density(&positions, config.smooth_radius, &mut density, &mut neighbors);
        let mut pressure = vec![0.0; 2];
        compute_pressure(&config, &mut density, &mut pressure);

        let input = ForceInputs {
            positions: &positions,
            velocities: &velocities,
            density: &density,
            pressure: &pressure,
            neighbors: &neighbors,
        };
        let mut forces = Vec::new();
        compute_forces(&input, &config, &mut forces);
        let net = forces[0] + forces[1];
        assert!(net.length() < 1e-9, "net force {net:?}");
        // Pressure pushes 0 away from 1.
        assert!(forces[0].x < 0.0 || forces[0].y < 0.0);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_forces_match_serial_exactly() {
        let config = FluidConfig::default();
        let mut positions = Vec::new();
        let mut velocities = Vec::new();
        for row in 0..6 {
            for col in 0..6 {
                let jitter = ((row * 7 + col * 3) % 5) as f64 * 0.01;
                positions.push(Vec2::new(col as f64 * 0.2 + jitter, row as f64 * 0.2));
                velocities.push(Vec2::new(jitter, -(col as f64) * 0.05));
            }
        }
        let n = positions.len();
        let mut density = vec![0.0; n];
        let mut neighbors = vec![Vec::new(); n];
        accumulate_density(&positions, config.smooth_radius, &mut density, &mut neighbors);
        let mut pressure = vec![0.0; n];
        compute_pressure(&config, &mut density, &mut pressure);

        let input = ForceInputs {
            positions: &positions,
            velocities: &velocities,
            density: &density,
            pressure: &pressure,
            neighbors: &neighbors,
        };
        let mut parallel = Vec::new();
        compute_forces(&input, &config, &mut parallel);
        let serial: Vec<Vec2> = (0..n).map(|i| force_on(i, &input, &config)).collect();
        assert_eq!(parallel, serial);
    }
}
