//! Core - math, units and errors shared by every system

pub mod error;
pub mod units;
mod vec2;

pub use error::{PhysicsError, Result};
pub use units::UnitConversion;
pub use vec2::Vec2;
