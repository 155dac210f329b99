use crate::core::Vec2;

use super::{PerfTimer, PhysicsWorld};

pub(super) fn step(world: &mut PhysicsWorld, duration: f64) {
    let perf_on = world.perf_enabled;
    if perf_on {
        world.perf_stats.reset();
        world.perf_stats.object_count = world.objects.len() as u32;
    }
    let step_start = PerfTimer::start_if(perf_on);

    // === GRAVITY ===
    // Applied before resolution so resting contacts see the acceleration.
    let gravity = world.settings.gravity;
    if gravity != Vec2::ZERO {
        for (_, particle) in world.objects.iter_mut() {
            if particle.has_finite_mass() {
                let weight = gravity * particle.mass();
                particle.add_force(weight);
            }
        }
    }

    // === CONTACTS ===
    let t0 = PerfTimer::start_if(perf_on);
    let report = world
        .registry
        .resolve_contacts(&mut world.objects, &world.settings.contacts, duration);
    world.last_report = report;
    if let Some(t0) = t0 {
        world.perf_stats.contacts_ms = t0.elapsed_ms();
        world.perf_stats.passes = report.passes as u32;
        world.perf_stats.resolver_calls = report.resolver_calls as u32;
        world.perf_stats.contacts_resolved = report.contacts_resolved as u32;
        world.perf_stats.cap_hits = u32::from(report.cap_reached);
    }

    // === FLUIDS ===
    let t0 = PerfTimer::start_if(perf_on);
    let mut neighbor_pairs = 0;
    let mut fluid_particles = 0;
    for (_, fluid) in world.fluids.iter_mut() {
        let stats = fluid.update(&mut world.objects, duration);
        neighbor_pairs += stats.neighbor_pairs;
        fluid_particles += stats.particles;
    }
    if let Some(t0) = t0 {
        world.perf_stats.fluid_ms = t0.elapsed_ms();
        world.perf_stats.neighbor_pairs = neighbor_pairs as u32;
        world.perf_stats.fluid_particles = fluid_particles as u32;
    }

    // === INTEGRATE ===
    let t0 = PerfTimer::start_if(perf_on);
    for (_, particle) in world.objects.iter_mut() {
        particle.integrate(duration);
    }
    if let Some(t0) = t0 {
        world.perf_stats.integrate_ms = t0.elapsed_ms();
    }

    world.frame += 1;
    if let Some(t) = step_start {
        world.perf_stats.step_ms = t.elapsed_ms();
    }
}
