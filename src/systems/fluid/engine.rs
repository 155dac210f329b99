use crate::core::{PhysicsError, Result, Vec2};
use crate::domain::{ObjectId, ObjectSet, Particle, Shape};

use super::config::{FluidConfig, KernelConstants};
use super::passes::{accumulate_density, compute_forces, compute_pressure, ForceInputs};

/// Where a fluid particle's body currently lives.
#[derive(Clone, Debug)]
enum Body {
    /// Owned by the fluid until it is attached to a world.
    Detached(Particle),
    /// Registered in the world's object set.
    Attached(ObjectId),
}

impl Body {
    fn get<'a>(&'a self, objects: &'a ObjectSet) -> Option<&'a Particle> {
        match self {
            Body::Detached(p) => Some(p),
            Body::Attached(id) => objects.get(*id),
        }
    }

    fn get_mut<'a>(&'a mut self, objects: &'a mut ObjectSet) -> Option<&'a mut Particle> {
        match self {
            Body::Detached(p) => Some(p),
            Body::Attached(id) => objects.get_mut(*id),
        }
    }
}

/// Per-tick numbers from one `update`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FluidStats {
    pub particles: usize,
    pub neighbor_pairs: usize,
}

/// SPH fluid - density, pressure and pairwise pressure/viscosity forces
/// for a cohort of particles.
///
/// Per-particle SPH state is stored structure-of-arrays, indexed like the
/// particle list. Forces are left in the particles' accumulators; the fluid
/// never integrates.
pub struct Fluid {
    config: FluidConfig,
    kernels: KernelConstants,
    attached: bool,

    bodies: Vec<Body>,
    density: Vec<f64>,
    pressure: Vec<f64>,
    neighbors: Vec<Vec<usize>>,

    // Scratch, reused every tick
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    forces: Vec<Vec2>,
}

impl Fluid {
    pub fn new(config: FluidConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: FluidConfig) -> Self {
        Self {
            kernels: KernelConstants::for_radius(config.smooth_radius),
            config,
            attached: false,
            bodies: Vec::new(),
            density: Vec::new(),
            pressure: Vec::new(),
            neighbors: Vec::new(),
            positions: Vec::new(),
            velocities: Vec::new(),
            forces: Vec::new(),
        }
    }

    pub fn config(&self) -> &FluidConfig {
        &self.config
    }

    pub fn kernels(&self) -> &KernelConstants {
        &self.kernels
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    // === Particles ===

    /// Add a fluid particle built from `template`'s position and velocity.
    ///
    /// The new particle gets the fluid's particle mass, restitution 1 and a
    /// circle shape. It goes into `objects` right away when the fluid is
    /// attached, otherwise it waits for `on_attach`. Returns its index.
    pub fn add(&mut self, template: &Particle, objects: &mut ObjectSet) -> Result<usize> {
        let mut particle =
            Particle::new(template.position, template.velocity, self.config.particle_mass)?;
        particle.restitution = 1.0;
        particle.bind_shape(Shape::circle(self.config.particle_radius));

        let body = if self.attached {
            Body::Attached(objects.insert(particle))
        } else {
            Body::Detached(particle)
        };
        self.bodies.push(body);
        self.density.push(0.0);
        self.pressure.push(0.0);
        self.neighbors.push(Vec::new());
        Ok(self.bodies.len() - 1)
    }

    /// Read-only view of the particles, in index order.
    pub fn particles<'a>(
        &'a self,
        objects: &'a ObjectSet,
    ) -> impl Iterator<Item = &'a Particle> + 'a {
        self.bodies.iter().filter_map(move |b| b.get(objects))
    }

    pub fn particle<'a>(&'a self, index: usize, objects: &'a ObjectSet) -> Option<&'a Particle> {
        self.bodies.get(index)?.get(objects)
    }

    /// Object id of an attached particle.
    pub fn object_id(&self, index: usize) -> Option<ObjectId> {
        match self.bodies.get(index)? {
            Body::Attached(id) => Some(*id),
            Body::Detached(_) => None,
        }
    }

    pub fn object_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.bodies.iter().filter_map(|b| match b {
            Body::Attached(id) => Some(*id),
            Body::Detached(_) => None,
        })
    }

    pub fn density(&self, index: usize) -> Option<f64> {
        self.density.get(index).copied()
    }

    pub fn pressure(&self, index: usize) -> Option<f64> {
        self.pressure.get(index).copied()
    }

    pub fn neighbors(&self, index: usize) -> Option<&[usize]> {
        self.neighbors.get(index).map(Vec::as_slice)
    }

    pub fn densities(&self) -> &[f64] {
        &self.density
    }

    pub fn pressures(&self) -> &[f64] {
        &self.pressure
    }

    // === Lifecycle ===

    /// Register every pending particle into the world.
    pub fn on_attach(&mut self, objects: &mut ObjectSet) -> Result<()> {
        if self.attached {
            return Err(PhysicsError::FluidAlreadyAttached);
        }
        for body in self.bodies.iter_mut() {
            if let Body::Detached(p) = body {
                let id = objects.insert(p.clone());
                *body = Body::Attached(id);
            }
        }
        self.attached = true;
        tracing::info!(particles = self.bodies.len(), "fluid attached");
        Ok(())
    }

    /// Pull every particle back out of the world. Particles already removed
    /// from the world by someone else are dropped.
    pub fn on_detach(&mut self, objects: &mut ObjectSet) -> Result<()> {
        if !self.attached {
            return Err(PhysicsError::FluidNotAttached);
        }
        for body in self.bodies.iter_mut() {
            if let Body::Attached(id) = body {
                if let Some(p) = objects.remove(*id) {
                    *body = Body::Detached(p);
                }
            }
        }
        self.attached = false;
        self.prune_missing(objects);
        tracing::info!(particles = self.bodies.len(), "fluid detached");
        Ok(())
    }

    /// Forget particles whose bodies no longer exist in `objects`.
    fn prune_missing(&mut self, objects: &ObjectSet) {
        let before = self.bodies.len();
        let mut i = 0;
        while i < self.bodies.len() {
            if self.bodies[i].get(objects).is_some() {
                i += 1;
                continue;
            }
            self.bodies.remove(i);
            self.density.remove(i);
            self.pressure.remove(i);
            self.neighbors.remove(i);
        }
        if self.bodies.len() != before {
            tracing::debug!(
                removed = before - self.bodies.len(),
                "pruned fluid particles missing from world"
            );
        }
    }

    // === Tick ===

    /// Density, pressure and force passes for one tick.
    pub fn update(&mut self, objects: &mut ObjectSet, _duration: f64) -> FluidStats {
        self.prune_missing(objects);
        let n = self.bodies.len();
        if n == 0 {
            return FluidStats::default();
        }

        self.positions.clear();
        self.velocities.clear();
        for body in &self.bodies {
            if let Some(p) = body.get(objects) {
                self.positions.push(p.position);
                self.velocities.push(p.velocity);
            }
        }

        let neighbor_pairs = accumulate_density(
            &self.positions,
            self.config.smooth_radius,
            &mut self.density,
            &mut self.neighbors,
        );
        compute_pressure(&self.config, &mut self.density, &mut self.pressure);

        let input = ForceInputs {
            positions: &self.positions,
            velocities: &self.velocities,
            density: &self.density,
            pressure: &self.pressure,
            neighbors: &self.neighbors,
        };
        compute_forces(&input, &self.config, &mut self.forces);

        for (body, force) in self.bodies.iter_mut().zip(self.forces.iter()) {
            if let Some(p) = body.get_mut(objects) {
                p.add_force(*force);
            }
        }

        FluidStats {
            particles: n,
            neighbor_pairs,
        }
    }
}

impl Default for Fluid {
    fn default() -> Self {
        Self::with_config(FluidConfig::default())
    }
}
