//! Fluid system - smoothed-particle hydrodynamics over a particle cohort
//!
//! Each tick runs three passes in order:
//! - density: `(1 - d/h)^2` per neighbor pair, mutual neighbor lists
//! - pressure: density floored at rest density, linear equation of state
//! - forces: pressure and viscosity per recorded neighbor, added to each
//!   particle's force accumulator
//!
//! A fluid created before it joins a world keeps its particles to itself;
//! `Fluid::on_attach` registers them with the world's objects.

mod config;
mod engine;
mod passes;

pub use config::{FluidConfig, KernelConstants};
pub use engine::{Fluid, FluidStats};
