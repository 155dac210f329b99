//! ObjectSet - the world's live collection of particles
//!
//! Ids are stable for the lifetime of an object and never reused. Iteration
//! follows insertion order, which keeps the pairwise contact scan
//! reproducible across runs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::particle::Particle;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

#[derive(Default)]
pub struct ObjectSet {
    ids: Vec<ObjectId>,
    particles: Vec<Particle>,
    index: HashMap<ObjectId, usize>,
    next_id: u32,
}

impl ObjectSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, particle: Particle) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.index.insert(id, self.particles.len());
        self.ids.push(id);
        self.particles.push(particle);
        id
    }

    /// Remove an object, keeping the relative order of the rest.
    pub fn remove(&mut self, id: ObjectId) -> Option<Particle> {
        let idx = self.index.remove(&id)?;
        self.ids.remove(idx);
        let particle = self.particles.remove(idx);
        for (i, shifted) in self.ids.iter().enumerate().skip(idx) {
            self.index.insert(*shifted, i);
        }
        Some(particle)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.particles.clear();
        self.index.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&Particle> {
        self.index.get(&id).map(|&i| &self.particles[i])
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Particle> {
        let i = *self.index.get(&id)?;
        self.particles.get_mut(i)
    }

    /// Two distinct objects borrowed mutably at once.
    pub fn pair_mut(&mut self, a: ObjectId, b: ObjectId) -> Option<(&mut Particle, &mut Particle)> {
        let ia = *self.index.get(&a)?;
        let ib = *self.index.get(&b)?;
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (lo, hi) = self.particles.split_at_mut(ib);
            Some((&mut lo[ia], &mut hi[0]))
        } else {
            let (lo, hi) = self.particles.split_at_mut(ia);
            Some((&mut hi[0], &mut lo[ib]))
        }
    }

    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Particle)> {
        self.ids.iter().copied().zip(self.particles.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ObjectId, &mut Particle)> {
        self.ids.iter().copied().zip(self.particles.iter_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Vec2;

    fn at(x: f64) -> Particle {
        Particle::fixed(Vec2::new(x, 0.0))
    }

    #[test]
    fn ids_are_stable_across_removal() {
        let mut set = ObjectSet::new();
        let a = set.insert(at(0.0));
        let b = set.insert(at(1.0));
        let c = set.insert(at(2.0));

        assert!(set.remove(b).is_some());
        assert!(set.remove(b).is_none());
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(a).map(|p| p.position.x), Some(0.0));
        assert_eq!(set.get(c).map(|p| p.position.x), Some(2.0));
        assert_eq!(set.ids(), &[a, c]);

        let d = set.insert(at(3.0));
        assert_ne!(d, b);
    }

    #[test]
    fn pair_mut_returns_requested_order() {
        let mut set = ObjectSet::new();
        let a = set.insert(at(0.0));
        let b = set.insert(at(1.0));

        let (pb, pa) = set.pair_mut(b, a).expect("both present");
        assert_eq!(pb.position.x, 1.0);
        assert_eq!(pa.position.x, 0.0);
        assert!(set.pair_mut(a, a).is_none());
    }
}
