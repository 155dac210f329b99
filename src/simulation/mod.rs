//! Simulation - world orchestration
//!
//! `PhysicsWorld` owns the object set, the contact registry, the attached
//! fluids and the settings. It only orchestrates; detection, resolution and
//! SPH live in `systems/`.
//!
//! Per step:
//! - gravity into every movable particle's force accumulator
//! - bounded contact resolution
//! - fluid density/pressure/force passes
//! - integration (consumes forces)

use std::sync::Arc;

use crate::core::{Result, Vec2};
use crate::domain::{ObjectId, ObjectSet, Particle};
use crate::systems::contact::{ContactGenerator, ContactRegistry, ResolveReport};
use crate::systems::fluid::Fluid;

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "init/settings.rs"]
mod settings;
#[path = "commands/commands.rs"]
mod commands;
#[path = "step/step.rs"]
mod step;
#[path = "scenes/scenes.rs"]
pub mod scenes;
mod facade;

pub use facade::Simulation;
pub use perf_stats::PerfStats;
pub use settings::Settings;

use perf_timer::PerfTimer;

/// Handle of a fluid owned by a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FluidId(pub usize);

/// The simulation world
pub struct PhysicsWorld {
    objects: ObjectSet,
    registry: ContactRegistry,
    fluids: Vec<(FluidId, Fluid)>,
    next_fluid_id: usize,

    settings: Settings,

    // State
    frame: u64,
    last_report: ResolveReport,

    // Perf metrics
    perf_enabled: bool,
    perf_stats: PerfStats,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            objects: ObjectSet::new(),
            registry: ContactRegistry::new(),
            fluids: Vec::new(),
            next_fluid_id: 0,
            settings: Settings::default(),
            frame: 0,
            last_report: ResolveReport::default(),
            perf_enabled: false,
            perf_stats: PerfStats::default(),
        }
    }

    pub fn with_settings(settings: Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            ..Self::new()
        })
    }

    // === Accessors ===

    pub fn objects(&self) -> &ObjectSet {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectSet {
        &mut self.objects
    }

    pub fn particle(&self, id: ObjectId) -> Option<&Particle> {
        self.objects.get(id)
    }

    pub fn particle_mut(&mut self, id: ObjectId) -> Option<&mut Particle> {
        self.objects.get_mut(id)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn registry(&self) -> &ContactRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ContactRegistry {
        &mut self.registry
    }

    pub fn fluid(&self, id: FluidId) -> Option<&Fluid> {
        self.fluids.iter().find(|(fid, _)| *fid == id).map(|(_, f)| f)
    }

    pub fn fluid_count(&self) -> usize {
        self.fluids.len()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Report of the contact resolution done by the last step.
    pub fn last_resolve_report(&self) -> ResolveReport {
        self.last_report
    }

    // === Settings ===

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn load_settings_json(&mut self, json: &str) -> Result<()> {
        settings::load_settings_json(self, json)
    }

    pub fn settings_json(&self) -> Result<String> {
        self.settings.to_json()
    }

    pub fn set_max_contacts(&mut self, max_contacts: usize) {
        settings::set_max_contacts(self, max_contacts);
    }

    pub fn set_contact_iteration(&mut self, contact_iteration: usize) -> Result<()> {
        settings::set_contact_iteration(self, contact_iteration)
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        settings::set_gravity(self, gravity);
    }

    /// Enable or disable per-step perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        settings::enable_perf_metrics(self, enabled);
    }

    /// Last step perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        settings::get_perf_stats(self)
    }

    // === Objects ===

    pub fn add_object(&mut self, particle: Particle) -> ObjectId {
        commands::add_object(self, particle)
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Result<Particle> {
        commands::remove_object(self, id)
    }

    pub fn create_particle(
        &mut self,
        position: Vec2,
        velocity: Vec2,
        mass: f64,
    ) -> Result<ObjectId> {
        commands::create_particle(self, position, velocity, mass)
    }

    pub fn create_fixed_particle(&mut self, position: Vec2) -> ObjectId {
        commands::create_fixed_particle(self, position)
    }

    /// Drop every object, generator and fluid. Settings are kept.
    pub fn clear(&mut self) {
        commands::clear(self)
    }

    // === Generators ===

    pub fn add_generator(&mut self, generator: Arc<dyn ContactGenerator>) -> bool {
        self.registry.add(generator)
    }

    pub fn remove_generator(&mut self, generator: &Arc<dyn ContactGenerator>) -> bool {
        self.registry.remove(generator)
    }

    /// Link two particles with a rope that only pulls once `max_length` is exceeded.
    pub fn create_rope(
        &mut self,
        max_length: f64,
        restitution: f64,
        a: ObjectId,
        b: ObjectId,
    ) -> Result<Arc<dyn ContactGenerator>> {
        commands::create_rope(self, max_length, restitution, a, b)
    }

    /// Link two particles with a rigid rod of fixed `length`.
    pub fn create_rod(
        &mut self,
        length: f64,
        a: ObjectId,
        b: ObjectId,
    ) -> Result<Arc<dyn ContactGenerator>> {
        commands::create_rod(self, length, a, b)
    }

    // === Fluids ===

    /// Take ownership of `fluid` and attach it to this world.
    pub fn add_fluid(&mut self, fluid: Fluid) -> Result<FluidId> {
        commands::add_fluid(self, fluid)
    }

    /// Detach a fluid and hand it back with its particles.
    pub fn remove_fluid(&mut self, id: FluidId) -> Result<Fluid> {
        commands::remove_fluid(self, id)
    }

    pub fn add_fluid_particle(&mut self, id: FluidId, template: &Particle) -> Result<ObjectId> {
        commands::add_fluid_particle(self, id, template)
    }

    // === Step ===

    /// Advance the world by `duration` seconds.
    pub fn step(&mut self, duration: f64) {
        step::step(self, duration);
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
