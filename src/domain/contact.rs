use crate::core::Vec2;

use super::objects::{ObjectId, ObjectSet};

/// A detected overlap or constraint between two particles, or between one
/// particle and the immovable world (`b == None`).
///
/// `normal` points from `b` towards `a`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleContact {
    pub a: ObjectId,
    pub b: Option<ObjectId>,
    pub restitution: f64,
    pub normal: Vec2,
    pub penetration: f64,
}

impl ParticleContact {
    pub fn new(
        a: ObjectId,
        b: Option<ObjectId>,
        normal: Vec2,
        penetration: f64,
        restitution: f64,
    ) -> Self {
        Self { a, b, restitution, normal, penetration }
    }

    /// Velocity along the normal; negative while the pair is closing.
    pub fn separating_velocity(&self, objects: &ObjectSet) -> f64 {
        let Some(pa) = objects.get(self.a) else {
            return 0.0;
        };
        let mut relative = pa.velocity;
        if let Some(pb) = self.b.and_then(|b| objects.get(b)) {
            relative -= pb.velocity;
        }
        relative.dot(self.normal)
    }
}
