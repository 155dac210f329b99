//! Physics2D Engine - particle contacts and SPH fluids in WASM
//!
//! Architecture:
//! - core/          - math, unit conversion, errors
//! - domain/        - shapes, particles, contacts, object set
//! - systems/       - contact registry and fluid engine
//! - simulation/    - world orchestration, settings, perf, scenes, JS facade

pub mod core;
pub mod domain;
pub mod systems;
pub mod simulation;

use wasm_bindgen::prelude::*;

// Re-export wasm-bindgen-rayon for thread pool initialization
#[cfg(feature = "parallel")]
pub use wasm_bindgen_rayon::init_thread_pool;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&format!("physics2d engine {} initialized", version()).into());
    #[cfg(not(target_arch = "wasm32"))]
    tracing::info!(version = %version(), "physics2d engine initialized");
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use crate::core::{PhysicsError, Result, UnitConversion, Vec2};
pub use domain::{ObjectId, ObjectSet, Particle, ParticleContact, Shape};
pub use simulation::{FluidId, PerfStats, PhysicsWorld, Settings, Simulation};
pub use systems::contact::{ContactGenerator, ContactRegistry, ContactSettings, ResolveReport};
pub use systems::fluid::{Fluid, FluidConfig};
