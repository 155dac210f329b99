use crate::core::{PhysicsError, Result, Vec2};

use super::shape::{Shape, ShapeType};

/// Particle - point mass with an optional collision shape
///
/// Stores inverse mass so fixed (immovable) particles are simply
/// `inverse_mass == 0`.
#[derive(Clone, Debug)]
pub struct Particle {
    // === Physics State ===
    /// World position (simulation units)
    pub position: Vec2,
    /// Velocity (simulation units per second)
    pub velocity: Vec2,
    /// Bounciness (0.0 = no bounce, 1.0 = full elastic)
    pub restitution: f64,
    inverse_mass: f64,
    force_accum: Vec2,

    // === Shape ===
    shape: Shape,
}

impl Particle {
    /// Create a movable particle.
    ///
    /// Errors if `mass` is not finite and > 0, or the state is not finite.
    pub fn new(position: Vec2, velocity: Vec2, mass: f64) -> Result<Self> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(PhysicsError::InvalidParticle("mass must be finite and > 0".into()));
        }
        if !position.is_finite() || !velocity.is_finite() {
            return Err(PhysicsError::InvalidParticle(
                "position and velocity must be finite".into(),
            ));
        }
        Ok(Self {
            position,
            velocity,
            restitution: 1.0,
            inverse_mass: 1.0 / mass,
            force_accum: Vec2::zero(),
            shape: Shape::Point,
        })
    }

    /// Create a particle with infinite mass (never moves, absorbs impulses).
    pub fn fixed(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::zero(),
            restitution: 1.0,
            inverse_mass: 0.0,
            force_accum: Vec2::zero(),
            shape: Shape::Point,
        }
    }

    #[inline]
    pub fn inverse_mass(&self) -> f64 {
        self.inverse_mass
    }

    #[inline]
    pub fn has_finite_mass(&self) -> bool {
        self.inverse_mass > 0.0
    }

    /// Mass, `f64::INFINITY` for fixed particles.
    pub fn mass(&self) -> f64 {
        if self.inverse_mass > 0.0 {
            1.0 / self.inverse_mass
        } else {
            f64::INFINITY
        }
    }

    pub fn set_mass(&mut self, mass: f64) -> Result<()> {
        if mass.is_nan() || mass <= 0.0 {
            return Err(PhysicsError::InvalidParticle("mass must be > 0".into()));
        }
        self.inverse_mass = if mass.is_infinite() { 0.0 } else { 1.0 / mass };
        Ok(())
    }

    /// Bind a collision shape, replacing any previous one.
    pub fn bind_shape(&mut self, shape: Shape) {
        self.shape = shape;
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn shape_type(&self) -> ShapeType {
        self.shape.shape_type()
    }

    /// Accumulate a force for the current tick.
    #[inline]
    pub fn add_force(&mut self, force: Vec2) {
        self.force_accum += force;
    }

    #[inline]
    pub fn force(&self) -> Vec2 {
        self.force_accum
    }

    #[inline]
    pub fn clear_forces(&mut self) {
        self.force_accum = Vec2::zero();
    }

    /// Apply an impulse at the center of mass.
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse * self.inverse_mass;
    }

    pub fn kinetic_energy(&self) -> f64 {
        if !self.has_finite_mass() {
            return 0.0;
        }
        0.5 * self.mass() * self.velocity.length_squared()
    }

    /// Semi-implicit Euler step. Consumes the force accumulator.
    pub fn integrate(&mut self, duration: f64) {
        if !self.has_finite_mass() {
            self.clear_forces();
            return;
        }
        let acceleration = self.force_accum * self.inverse_mass;
        self.velocity += acceleration * duration;
        self.position += self.velocity * duration;
        self.clear_forces();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_mass_rejected() {
        let err = Particle::new(Vec2::zero(), Vec2::zero(), 0.0).unwrap_err();
        assert!(err.to_string().contains("mass"));
        assert!(Particle::new(Vec2::zero(), Vec2::zero(), f64::NAN).is_err());
    }

    #[test]
    fn fixed_particle_never_moves() {
        let mut p = Particle::fixed(Vec2::new(1.0, 2.0));
        p.add_force(Vec2::new(100.0, 0.0));
        p.apply_impulse(Vec2::new(5.0, 5.0));
        p.integrate(1.0);
        assert_eq!(p.position, Vec2::new(1.0, 2.0));
        assert_eq!(p.mass(), f64::INFINITY);
        assert_eq!(p.force(), Vec2::zero());
    }

    #[test]
    fn integrate_consumes_forces() -> Result<()> {
        let mut p = Particle::new(Vec2::zero(), Vec2::zero(), 2.0)?;
        p.add_force(Vec2::new(4.0, 0.0));
        p.add_force(Vec2::new(0.0, 2.0));
        assert_eq!(p.force(), Vec2::new(4.0, 2.0));
        p.integrate(0.5);
        // a = (2, 1); v = a * 0.5; x = v * 0.5
        assert_eq!(p.velocity, Vec2::new(1.0, 0.5));
        assert_eq!(p.position, Vec2::new(0.5, 0.25));
        assert_eq!(p.force(), Vec2::zero());
        Ok(())
    }

    #[test]
    fn bind_shape_sets_type() -> Result<()> {
        let mut p = Particle::new(Vec2::zero(), Vec2::zero(), 1.0)?;
        assert_eq!(p.shape_type(), ShapeType::Point);
        p.bind_shape(Shape::circle(0.5));
        assert_eq!(p.shape_type(), ShapeType::Circle);
        Ok(())
    }

    #[test]
    fn set_mass_updates_inverse_mass() -> Result<()> {
        let mut p = Particle::new(Vec2::zero(), Vec2::zero(), 1.0)?;
        p.set_mass(4.0)?;
        assert_eq!(p.inverse_mass(), 0.25);
        assert_eq!(p.mass(), 4.0);

        p.set_mass(f64::INFINITY)?;
        assert!(!p.has_finite_mass());
        assert!(p.set_mass(0.0).is_err());
        assert!(p.set_mass(f64::NAN).is_err());
        Ok(())
    }

    #[test]
    fn kinetic_energy_is_half_m_v_squared() -> Result<()> {
        let p = Particle::new(Vec2::zero(), Vec2::new(3.0, 4.0), 2.0)?;
        assert_eq!(p.kinetic_energy(), 25.0);
        let mut pinned = Particle::fixed(Vec2::zero());
        pinned.velocity = Vec2::new(1.0, 0.0);
        assert_eq!(pinned.kinetic_energy(), 0.0);
        Ok(())
    }
}
