//! Ready-made worlds for demos and smoke tests.
//!
//! Scene layouts are written in display units and converted on the way in.

use crate::core::{Result, UnitConversion, Vec2};
use crate::domain::{ObjectId, Particle, Shape};
use crate::systems::fluid::{Fluid, FluidConfig};

use super::{FluidId, PhysicsWorld};

const BALL_COUNT: usize = 5;
const BALL_SPACING: f64 = 40.0;
const BALL_RADIUS: f64 = 20.0;
const BALL_MASS: f64 = 2.0;
const ROPE_LENGTH: f64 = 200.0;
const ANCHOR_X: f64 = 160.0;

/// Timestep the demos are tuned for.
pub const DEMO_TIMESTEP: f64 = 1.0 / 120.0;

/// Handles into a world built by [`contact_demo`].
#[derive(Clone, Debug)]
pub struct ContactDemo {
    pub anchors: Vec<ObjectId>,
    pub balls: Vec<ObjectId>,
}

impl ContactDemo {
    /// Kick the first ball sideways into the row.
    pub fn fire(&self, world: &mut PhysicsWorld) {
        if let Some(ball) = self.balls.first().and_then(|id| world.particle_mut(*id)) {
            ball.velocity = Vec2::new(-10.0, 0.0);
        }
    }
}

/// Newton's cradle: a row of balls hanging on ropes from fixed anchors.
///
/// Also sets gravity and a single contact pass on the world.
pub fn contact_demo(world: &mut PhysicsWorld) -> Result<ContactDemo> {
    world.set_contact_iteration(1)?;
    world.set_gravity(Vec2::new(0.0, 40.0));

    let mut anchors = Vec::with_capacity(BALL_COUNT);
    let mut balls = Vec::with_capacity(BALL_COUNT);
    for i in 0..BALL_COUNT {
        let x = ANCHOR_X + BALL_SPACING * i as f64;
        let anchor = world.create_fixed_particle(Vec2::new(x, 0.0).to_sim_units());

        let position = Vec2::new(x, ROPE_LENGTH).to_sim_units();
        let mut ball = Particle::new(position, Vec2::zero(), BALL_MASS)?;
        ball.bind_shape(Shape::circle(BALL_RADIUS.to_sim_units()));
        let ball = world.add_object(ball);

        world.create_rope(ROPE_LENGTH.to_sim_units(), 0.0, anchor, ball)?;
        anchors.push(anchor);
        balls.push(ball);
    }

    // A shapeless drifter; never collides
    world.create_particle(Vec2::zero(), Vec2::new(1.0, 0.0), 1.0)?;

    tracing::info!(balls = balls.len(), "contact demo built");
    Ok(ContactDemo { anchors, balls })
}

/// A `columns` x `rows` block of fluid particles at rest, top-left corner at
/// `origin` (display units). Uses the world's fluid config.
pub fn fluid_block(
    world: &mut PhysicsWorld,
    origin: Vec2,
    columns: usize,
    rows: usize,
) -> Result<FluidId> {
    let config: FluidConfig = world.settings().fluid;
    let spacing = config.particle_radius * 2.0;
    let origin = origin.to_sim_units();

    let id = world.add_fluid(Fluid::new(config)?)?;
    for row in 0..rows {
        for col in 0..columns {
            let position = origin + Vec2::new(col as f64 * spacing, row as f64 * spacing);
            let template = Particle::new(position, Vec2::zero(), config.particle_mass)?;
            world.add_fluid_particle(id, &template)?;
        }
    }

    tracing::info!(particles = columns * rows, "fluid block built");
    Ok(id)
}
