//! Contact generators - pluggable sources of extra contacts
//!
//! Generators hand out contacts lazily; the registry stops pulling as soon
//! as the per-call contact cap is reached.

use crate::core::Vec2;
use crate::domain::{ObjectId, ObjectSet, ParticleContact};

/// Lazily pulled sequence of contacts.
pub trait ContactGenerator: Send + Sync {
    fn contacts<'a>(
        &'a self,
        objects: &'a ObjectSet,
    ) -> Box<dyn Iterator<Item = ParticleContact> + 'a>;
}

/// Fixed list of contacts, handed out in order every pass.
#[derive(Clone, Debug, Default)]
pub struct ContactList {
    contacts: Vec<ParticleContact>,
}

impl ContactList {
    pub fn new(contacts: Vec<ParticleContact>) -> Self {
        Self { contacts }
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

impl ContactGenerator for ContactList {
    fn contacts<'a>(
        &'a self,
        _objects: &'a ObjectSet,
    ) -> Box<dyn Iterator<Item = ParticleContact> + 'a> {
        Box::new(self.contacts.iter().copied())
    }
}

/// Current separation of two linked particles, `None` if either is gone.
fn link_state(objects: &ObjectSet, a: ObjectId, b: ObjectId) -> Option<(Vec2, f64)> {
    let pa = objects.get(a)?;
    let pb = objects.get(b)?;
    let delta = pb.position - pa.position;
    Some((delta, delta.length()))
}

/// Rope: slack below `max_length`, pulls the ends back together when
/// overstretched.
#[derive(Clone, Debug)]
pub struct ParticleRope {
    pub a: ObjectId,
    pub b: ObjectId,
    pub max_length: f64,
    pub restitution: f64,
}

impl ParticleRope {
    pub fn new(max_length: f64, restitution: f64, a: ObjectId, b: ObjectId) -> Self {
        Self { a, b, max_length, restitution }
    }

    fn contact(&self, objects: &ObjectSet) -> Option<ParticleContact> {
        let (delta, length) = link_state(objects, self.a, self.b)?;
        if length < self.max_length {
            return None;
        }
        Some(ParticleContact::new(
            self.a,
            Some(self.b),
            delta.normalize(),
            length - self.max_length,
            self.restitution,
        ))
    }
}

impl ContactGenerator for ParticleRope {
    fn contacts<'a>(
        &'a self,
        objects: &'a ObjectSet,
    ) -> Box<dyn Iterator<Item = ParticleContact> + 'a> {
        Box::new(self.contact(objects).into_iter())
    }
}

/// Rod: holds the ends at exactly `length`, pushing or pulling.
#[derive(Clone, Debug)]
pub struct ParticleRod {
    pub a: ObjectId,
    pub b: ObjectId,
    pub length: f64,
}

impl ParticleRod {
    pub fn new(length: f64, a: ObjectId, b: ObjectId) -> Self {
        Self { a, b, length }
    }

    fn contact(&self, objects: &ObjectSet) -> Option<ParticleContact> {
        let (delta, current) = link_state(objects, self.a, self.b)?;
        if current == self.length {
            return None;
        }
        let normal = delta.normalize();
        let contact = if current > self.length {
            ParticleContact::new(self.a, Some(self.b), normal, current - self.length, 0.0)
        } else {
            ParticleContact::new(self.a, Some(self.b), -normal, self.length - current, 0.0)
        };
        Some(contact)
    }
}

impl ContactGenerator for ParticleRod {
    fn contacts<'a>(
        &'a self,
        objects: &'a ObjectSet,
    ) -> Box<dyn Iterator<Item = ParticleContact> + 'a> {
        Box::new(self.contact(objects).into_iter())
    }
}
