//! Narrow phase - per-category detector table
//!
//! Each contact category maps to an optional detector function. A category
//! with no detector yields no contact; new shape pairs are supported by
//! registering a function, not by touching the registry.

use crate::domain::{ContactType, ObjectId, Particle, ParticleContact, Shape};
use crate::domain::shape::CONTACT_TYPE_COUNT;

/// Detector signature. Receives the pair ordered so that
/// `a.shape_type() <= b.shape_type()`.
pub type Detector =
    fn(a: (ObjectId, &Particle), b: (ObjectId, &Particle)) -> Option<ParticleContact>;

#[derive(Clone)]
pub struct DetectorTable {
    detectors: [Option<Detector>; CONTACT_TYPE_COUNT],
}

impl DetectorTable {
    /// Table with no detectors at all.
    pub fn empty() -> Self {
        Self {
            detectors: [None; CONTACT_TYPE_COUNT],
        }
    }

    /// Table with every built-in detector registered.
    pub fn with_defaults() -> Self {
        let mut table = Self::empty();
        table.register(ContactType::CircleAndCircle, circle_and_circle);
        table
    }

    /// Install (or replace) the detector for a category.
    pub fn register(&mut self, category: ContactType, detector: Detector) {
        self.detectors[category.index()] = Some(detector);
    }

    pub fn unregister(&mut self, category: ContactType) {
        self.detectors[category.index()] = None;
    }

    pub fn get(&self, category: ContactType) -> Option<Detector> {
        self.detectors[category.index()]
    }

    /// Run the detector for `category` on a pair.
    ///
    /// The pair is put in shape-type order first, so the ordering contract
    /// holds no matter how the caller passes it in.
    pub fn dispatch(
        &self,
        category: ContactType,
        a: (ObjectId, &Particle),
        b: (ObjectId, &Particle),
    ) -> Option<ParticleContact> {
        let detector = self.get(category)?;
        if a.1.shape_type() <= b.1.shape_type() {
            detector(a, b)
        } else {
            detector(b, a)
        }
    }
}

impl Default for DetectorTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Circle vs circle: overlap when center distance < sum of radii.
pub fn circle_and_circle(
    a: (ObjectId, &Particle),
    b: (ObjectId, &Particle),
) -> Option<ParticleContact> {
    let (id_a, pa) = a;
    let (id_b, pb) = b;
    let (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) = (pa.shape(), pb.shape())
    else {
        return None;
    };

    let delta = pa.position - pb.position;
    let dist_sq = delta.length_squared();
    let reach = ra + rb;
    if dist_sq >= reach * reach {
        return None;
    }

    let dist = dist_sq.sqrt();
    // Coincident centers have no defined direction; push apart along +y.
    let normal = if dist > 1e-12 {
        delta / dist
    } else {
        crate::core::Vec2::new(0.0, 1.0)
    };

    Some(ParticleContact::new(
        id_a,
        Some(id_b),
        normal,
        reach - dist,
        pa.restitution.min(pb.restitution),
    ))
}
