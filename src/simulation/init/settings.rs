use serde::{Deserialize, Serialize};

use crate::core::{PhysicsError, Result, Vec2};
use crate::systems::contact::ContactSettings;
use crate::systems::fluid::FluidConfig;

use super::perf_stats::PerfStats;
use super::PhysicsWorld;

/// World tunables, loadable from JSON.
///
/// Contact tunables sit at the top level of the JSON document:
///
/// ```json
/// { "max_contacts": 200, "contact_iteration": 1, "gravity": { "x": 0, "y": 40 } }
/// ```
///
/// Missing keys keep their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(flatten)]
    pub contacts: ContactSettings,
    /// Acceleration applied to every movable particle (simulation units / s^2)
    pub gravity: Vec2,
    /// Config for fluids built by the world's scenes
    pub fluid: FluidConfig,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.contacts.validate()?;
        self.fluid.validate()?;
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidSettings("gravity must be finite".into()));
        }
        Ok(())
    }
}

pub(super) fn load_settings_json(world: &mut PhysicsWorld, json: &str) -> Result<()> {
    let settings = Settings::from_json(json)?;
    tracing::info!(
        max_contacts = settings.contacts.max_contacts,
        contact_iteration = settings.contacts.contact_iteration,
        "settings loaded"
    );
    world.settings = settings;
    Ok(())
}

pub(super) fn set_max_contacts(world: &mut PhysicsWorld, max_contacts: usize) {
    world.settings.contacts.max_contacts = max_contacts;
}

pub(super) fn set_contact_iteration(
    world: &mut PhysicsWorld,
    contact_iteration: usize,
) -> Result<()> {
    let contacts = ContactSettings {
        contact_iteration,
        ..world.settings.contacts
    };
    contacts.validate()?;
    world.settings.contacts = contacts;
    Ok(())
}

pub(super) fn set_gravity(world: &mut PhysicsWorld, gravity: Vec2) {
    world.settings.gravity = gravity;
}

pub(super) fn enable_perf_metrics(world: &mut PhysicsWorld, enabled: bool) {
    world.perf_enabled = enabled;
    if !enabled {
        world.perf_stats.reset();
    }
}

pub(super) fn get_perf_stats(world: &PhysicsWorld) -> PerfStats {
    world.perf_stats.clone()
}
