use thiserror::Error;

use crate::domain::objects::ObjectId;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, PhysicsError>;

/// Errors from construction, configuration and lifecycle calls.
///
/// The per-tick paths (contact resolution, fluid update) never return these:
/// hitting the contact cap is a soft limit, and detector/generator panics
/// propagate and abort the tick.
#[derive(Debug, Error)]
pub enum PhysicsError {
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("invalid fluid config: {0}")]
    InvalidFluidConfig(String),

    #[error("invalid particle: {0}")]
    InvalidParticle(String),

    #[error("unknown object {0:?}")]
    UnknownObject(ObjectId),

    #[error("fluid is already attached to a world")]
    FluidAlreadyAttached,

    #[error("fluid is not attached to a world")]
    FluidNotAttached,

    #[error("unknown fluid {0}")]
    UnknownFluid(usize),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
