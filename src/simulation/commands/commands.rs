use std::sync::Arc;

use crate::core::{PhysicsError, Result, Vec2};
use crate::domain::{ObjectId, Particle};
use crate::systems::contact::{ContactGenerator, ParticleRod, ParticleRope};
use crate::systems::fluid::Fluid;

use super::{FluidId, PhysicsWorld};

pub(super) fn add_object(world: &mut PhysicsWorld, particle: Particle) -> ObjectId {
    world.objects.insert(particle)
}

pub(super) fn remove_object(world: &mut PhysicsWorld, id: ObjectId) -> Result<Particle> {
    world.objects.remove(id).ok_or(PhysicsError::UnknownObject(id))
}

pub(super) fn create_particle(
    world: &mut PhysicsWorld,
    position: Vec2,
    velocity: Vec2,
    mass: f64,
) -> Result<ObjectId> {
    let particle = Particle::new(position, velocity, mass)?;
    Ok(world.objects.insert(particle))
}

pub(super) fn create_fixed_particle(world: &mut PhysicsWorld, position: Vec2) -> ObjectId {
    world.objects.insert(Particle::fixed(position))
}

pub(super) fn clear(world: &mut PhysicsWorld) {
    world.objects.clear();
    world.fluids.clear();
    world.registry = Default::default();
    world.frame = 0;
    world.last_report = Default::default();
    world.perf_stats.reset();
}

fn require_object(world: &PhysicsWorld, id: ObjectId) -> Result<()> {
    if world.objects.contains(id) {
        Ok(())
    } else {
        Err(PhysicsError::UnknownObject(id))
    }
}

fn require_length(length: f64) -> Result<()> {
    if length.is_finite() && length >= 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::InvalidSettings("link length must be finite and >= 0".into()))
    }
}

pub(super) fn create_rope(
    world: &mut PhysicsWorld,
    max_length: f64,
    restitution: f64,
    a: ObjectId,
    b: ObjectId,
) -> Result<Arc<dyn ContactGenerator>> {
    require_object(world, a)?;
    require_object(world, b)?;
    require_length(max_length)?;
    let rope: Arc<dyn ContactGenerator> =
        Arc::new(ParticleRope::new(max_length, restitution, a, b));
    world.registry.add(rope.clone());
    Ok(rope)
}

pub(super) fn create_rod(
    world: &mut PhysicsWorld,
    length: f64,
    a: ObjectId,
    b: ObjectId,
) -> Result<Arc<dyn ContactGenerator>> {
    require_object(world, a)?;
    require_object(world, b)?;
    require_length(length)?;
    let rod: Arc<dyn ContactGenerator> = Arc::new(ParticleRod::new(length, a, b));
    world.registry.add(rod.clone());
    Ok(rod)
}

pub(super) fn add_fluid(world: &mut PhysicsWorld, mut fluid: Fluid) -> Result<FluidId> {
    fluid.on_attach(&mut world.objects)?;
    let id = FluidId(world.next_fluid_id);
    world.next_fluid_id += 1;
    world.fluids.push((id, fluid));
    Ok(id)
}

pub(super) fn remove_fluid(world: &mut PhysicsWorld, id: FluidId) -> Result<Fluid> {
    let idx = world
        .fluids
        .iter()
        .position(|(fid, _)| *fid == id)
        .ok_or(PhysicsError::UnknownFluid(id.0))?;
    let (_, mut fluid) = world.fluids.remove(idx);
    fluid.on_detach(&mut world.objects)?;
    Ok(fluid)
}

pub(super) fn add_fluid_particle(
    world: &mut PhysicsWorld,
    id: FluidId,
    template: &Particle,
) -> Result<ObjectId> {
    let PhysicsWorld { fluids, objects, .. } = world;
    let fluid = fluids
        .iter_mut()
        .find(|(fid, _)| *fid == id)
        .map(|(_, f)| f)
        .ok_or(PhysicsError::UnknownFluid(id.0))?;
    let index = fluid.add(template, objects)?;
    fluid.object_id(index).ok_or(PhysicsError::FluidNotAttached)
}
