use wasm_bindgen::prelude::*;

use crate::core::{PhysicsError, UnitConversion, Vec2};
use crate::domain::{ObjectId, Particle, Shape};
use crate::systems::fluid::Fluid;

use super::perf_stats::PerfStats;
use super::scenes::{self, ContactDemo};
use super::{FluidId, PhysicsWorld};

fn js_err(e: PhysicsError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// JS-facing world. Positions, velocities and radii are in display units.
#[wasm_bindgen]
pub struct Simulation {
    core: PhysicsWorld,
    demo: Option<ContactDemo>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Simulation {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            core: PhysicsWorld::new(),
            demo: None,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn object_count(&self) -> u32 { self.core.object_count() as u32 }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 { self.core.frame() }

    // === Settings ===

    pub fn load_settings(&mut self, json: String) -> Result<(), JsValue> {
        self.core.load_settings_json(&json).map_err(js_err)
    }

    pub fn settings_json(&self) -> Result<String, JsValue> {
        self.core.settings_json().map_err(js_err)
    }

    pub fn set_max_contacts(&mut self, max_contacts: u32) {
        self.core.set_max_contacts(max_contacts as usize);
    }

    pub fn set_contact_iteration(&mut self, contact_iteration: u32) -> Result<(), JsValue> {
        self.core.set_contact_iteration(contact_iteration as usize).map_err(js_err)
    }

    /// Gravity in simulation units per second squared
    pub fn set_gravity(&mut self, x: f64, y: f64) {
        self.core.set_gravity(Vec2::new(x, y));
    }

    /// Enable or disable per-step perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.core.enable_perf_metrics(enabled);
    }

    /// Get last step perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        self.core.get_perf_stats()
    }

    // === Objects ===

    /// Create a movable particle; `radius` of 0 leaves it a point.
    pub fn create_particle(
        &mut self,
        x: f64,
        y: f64,
        vx: f64,
        vy: f64,
        mass: f64,
        radius: f64,
    ) -> Result<u32, JsValue> {
        let mut particle = Particle::new(
            Vec2::new(x, y).to_sim_units(),
            Vec2::new(vx, vy).to_sim_units(),
            mass,
        )
        .map_err(js_err)?;
        if radius > 0.0 {
            particle.bind_shape(Shape::circle(radius.to_sim_units()));
        }
        Ok(self.core.add_object(particle).0)
    }

    pub fn create_fixed_particle(&mut self, x: f64, y: f64) -> u32 {
        self.core.create_fixed_particle(Vec2::new(x, y).to_sim_units()).0
    }

    pub fn remove_particle(&mut self, id: u32) -> Result<(), JsValue> {
        self.core.remove_object(ObjectId(id)).map(|_| ()).map_err(js_err)
    }

    pub fn create_rope(
        &mut self,
        a: u32,
        b: u32,
        max_length: f64,
        restitution: f64,
    ) -> Result<(), JsValue> {
        self.core
            .create_rope(max_length.to_sim_units(), restitution, ObjectId(a), ObjectId(b))
            .map(|_| ())
            .map_err(js_err)
    }

    pub fn create_rod(&mut self, a: u32, b: u32, length: f64) -> Result<(), JsValue> {
        self.core
            .create_rod(length.to_sim_units(), ObjectId(a), ObjectId(b))
            .map(|_| ())
            .map_err(js_err)
    }

    /// Drop every object, generator and fluid
    pub fn clear(&mut self) {
        self.core.clear();
        self.demo = None;
    }

    // === Fluids ===

    /// Attach a new fluid using the current settings' fluid config.
    pub fn add_fluid(&mut self) -> Result<u32, JsValue> {
        let fluid = Fluid::new(self.core.settings().fluid).map_err(js_err)?;
        self.core.add_fluid(fluid).map(|id| id.0 as u32).map_err(js_err)
    }

    pub fn remove_fluid(&mut self, fluid: u32) -> Result<(), JsValue> {
        self.core.remove_fluid(FluidId(fluid as usize)).map(|_| ()).map_err(js_err)
    }

    pub fn add_fluid_particle(
        &mut self,
        fluid: u32,
        x: f64,
        y: f64,
        vx: f64,
        vy: f64,
    ) -> Result<u32, JsValue> {
        let mass = self.core.settings().fluid.particle_mass;
        let template = Particle::new(
            Vec2::new(x, y).to_sim_units(),
            Vec2::new(vx, vy).to_sim_units(),
            mass,
        )
        .map_err(js_err)?;
        self.core
            .add_fluid_particle(FluidId(fluid as usize), &template)
            .map(|id| id.0)
            .map_err(js_err)
    }

    // === Scenes ===

    pub fn load_contact_demo(&mut self) -> Result<(), JsValue> {
        self.clear();
        self.demo = Some(scenes::contact_demo(&mut self.core).map_err(js_err)?);
        Ok(())
    }

    /// Kick the first ball of the contact demo (no-op for other scenes)
    pub fn fire(&mut self) {
        if let Some(demo) = &self.demo {
            demo.fire(&mut self.core);
        }
    }

    pub fn load_fluid_block(
        &mut self,
        x: f64,
        y: f64,
        columns: u32,
        rows: u32,
    ) -> Result<u32, JsValue> {
        self.clear();
        scenes::fluid_block(&mut self.core, Vec2::new(x, y), columns as usize, rows as usize)
            .map(|id| id.0 as u32)
            .map_err(js_err)
    }

    // === Step ===

    pub fn step(&mut self, duration: f64) {
        self.core.step(duration);
    }

    // === Readback ===

    /// Object ids in iteration order, matching `positions` and `velocities`
    pub fn ids(&self) -> Vec<u32> {
        self.core.objects().ids().iter().map(|id| id.0).collect()
    }

    /// Interleaved `[x0, y0, x1, y1, ...]`
    pub fn positions(&self) -> Vec<f64> {
        self.core
            .objects()
            .iter()
            .flat_map(|(_, p)| {
                let v = p.position.to_display_units();
                [v.x, v.y]
            })
            .collect()
    }

    /// Interleaved `[vx0, vy0, vx1, vy1, ...]`
    pub fn velocities(&self) -> Vec<f64> {
        self.core
            .objects()
            .iter()
            .flat_map(|(_, p)| {
                let v = p.velocity.to_display_units();
                [v.x, v.y]
            })
            .collect()
    }

    /// Collision radius per object, 0 for points
    pub fn radii(&self) -> Vec<f64> {
        self.core
            .objects()
            .iter()
            .map(|(_, p)| match p.shape() {
                Shape::Circle { radius } => radius.to_display_units(),
                _ => 0.0,
            })
            .collect()
    }
}

impl Simulation {
    pub fn world(&self) -> &PhysicsWorld {
        &self.core
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.core
    }
}
