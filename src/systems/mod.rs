//! Systems - per-step processes over the world's objects

pub mod contact;
pub mod fluid;
