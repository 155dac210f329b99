//! Domain - shapes, particles, contacts and the object set they live in

pub mod contact;
pub mod objects;
pub mod particle;
pub mod shape;

pub use contact::ParticleContact;
pub use objects::{ObjectId, ObjectSet};
pub use particle::Particle;
pub use shape::{contact_type, ContactType, Shape, ShapeType};
