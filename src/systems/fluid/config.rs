use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::core::{PhysicsError, Result, UnitConversion};

/// Physical constants of one fluid, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluidConfig {
    /// Kernel support radius (simulation units)
    pub smooth_radius: f64,
    /// Equilibrium density; floors computed density
    pub rest_density: f64,
    /// Equation-of-state stiffness
    pub gas_constant: f64,
    pub viscosity: f64,
    pub particle_mass: f64,
    /// Scales the pressure force
    pub pressure_multiplier: f64,
    /// Radius of the circle shape bound to each fluid particle
    pub particle_radius: f64,
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            smooth_radius: 30.0_f64.to_sim_units(),
            rest_density: 0.5,
            gas_constant: 1.0,
            viscosity: 0.075,
            particle_mass: 1.0,
            pressure_multiplier: 2.0,
            particle_radius: 4.0_f64.to_sim_units(),
        }
    }
}

impl FluidConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("smooth_radius", self.smooth_radius),
            ("rest_density", self.rest_density),
            ("particle_mass", self.particle_mass),
            ("particle_radius", self.particle_radius),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(PhysicsError::InvalidFluidConfig(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        let non_negative = [
            ("gas_constant", self.gas_constant),
            ("viscosity", self.viscosity),
            ("pressure_multiplier", self.pressure_multiplier),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(PhysicsError::InvalidFluidConfig(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }

    /// Spacing at which particles sit at rest density in a 3D packing.
    pub fn particle_distance(&self) -> f64 {
        (self.particle_mass / self.rest_density).powf(1.0 / 3.0)
    }
}

/// Normalization constants of the classic SPH kernels for this radius.
///
/// Computed for reference; the force pass uses its own simplified weights.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KernelConstants {
    pub poly6: f64,
    pub spiky: f64,
    pub viscosity: f64,
}

impl KernelConstants {
    pub fn for_radius(h: f64) -> Self {
        Self {
            poly6: 4.0 / (PI * h.powi(8)),
            spiky: -30.0 / (PI * h.powi(5)),
            viscosity: 20.0 / (3.0 * PI * h.powi(5)) / 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = FluidConfig::default();
        assert!(cfg.validate().is_ok());
        assert!((cfg.smooth_radius - 1.0).abs() < 1e-12);
    }

    #[test]
    fn non_positive_radius_rejected() {
        let cfg = FluidConfig {
            smooth_radius: 0.0,
            ..FluidConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("smooth_radius"));
    }

    #[test]
    fn kernel_constants_for_unit_radius() {
        let k = KernelConstants::for_radius(1.0);
        assert!((k.poly6 - 4.0 / PI).abs() < 1e-12);
        assert!((k.spiky + 30.0 / PI).abs() < 1e-12);
        assert!((k.viscosity - 10.0 / (3.0 * PI)).abs() < 1e-12);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: FluidConfig = serde_json::from_str(r#"{ "viscosity": 0.5 }"#).expect("parses");
        assert_eq!(cfg.viscosity, 0.5);
        assert_eq!(cfg.rest_density, 0.5);
    }

    #[test]
    fn particle_distance_matches_rest_packing() {
        let cfg = FluidConfig::default();
        // mass 1, rest density 0.5 -> cube root of 2
        assert!((cfg.particle_distance() - 2.0_f64.cbrt()).abs() < 1e-12);

        let dense = FluidConfig {
            particle_mass: 8.0,
            rest_density: 1.0,
            ..FluidConfig::default()
        };
        assert!((dense.particle_distance() - 2.0).abs() < 1e-12);
    }
}
