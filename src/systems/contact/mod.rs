//! Contact system - bounded detection, generation and resolution
//!
//! One `resolve_contacts` call runs up to `contact_iteration` passes. Each
//! pass rebuilds the contact list from the pairwise scan plus every
//! registered generator, then hands the list to the resolver with an
//! iteration budget of twice the contact count.
//!
//! The contact cap is a soft limit:
//! - pairwise scan: further contacts are dropped, but every pair is visited
//! - generators: the first rejected contact skips straight to resolution

mod detector;
mod generator;
mod registry;
mod resolver;

pub use detector::{circle_and_circle, Detector, DetectorTable};
pub use generator::{ContactGenerator, ContactList, ParticleRope, ParticleRod};
pub use registry::{ContactRegistry, ResolveReport};
pub use resolver::{ContactResolver, ParticleContactResolver};

use serde::{Deserialize, Serialize};

use crate::core::{PhysicsError, Result};

/// Tunables read by the registry at the start of every resolve call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSettings {
    /// Upper bound on contacts recorded per resolve call.
    pub max_contacts: usize,
    /// Pass budget per resolve call.
    pub contact_iteration: usize,
}

impl ContactSettings {
    pub const DEFAULT_MAX_CONTACTS: usize = 1000;
    pub const DEFAULT_CONTACT_ITERATION: usize = 2;

    pub fn validate(&self) -> Result<()> {
        if self.contact_iteration == 0 {
            return Err(PhysicsError::InvalidSettings("contact_iteration must be > 0".into()));
        }
        Ok(())
    }
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            max_contacts: Self::DEFAULT_MAX_CONTACTS,
            contact_iteration: Self::DEFAULT_CONTACT_ITERATION,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::sync::Arc;

    use super::*;
    use crate::core::Vec2;
    use crate::domain::{ContactType, ObjectId, ObjectSet, Particle, ParticleContact, Shape};

    /// Records every contact it is asked to resolve; touches nothing.
    #[derive(Default)]
    struct RecordingResolver {
        iterations: usize,
        calls: Vec<(usize, Vec<ParticleContact>)>,
    }

    impl ContactResolver for RecordingResolver {
        fn iterations(&self) -> usize {
            self.iterations
        }

        fn set_iterations(&mut self, iterations: usize) {
            self.iterations = iterations;
        }

        fn resolve_contacts(
            &mut self,
            contacts: &mut [ParticleContact],
            _objects: &mut ObjectSet,
            _duration: f64,
        ) {
            self.calls.push((self.iterations, contacts.to_vec()));
        }
    }

    impl RecordingResolver {
        fn seen(&self) -> usize {
            self.calls.iter().map(|(_, c)| c.len()).sum()
        }
    }

    /// Never runs out of contacts.
    struct Endless;

    impl ContactGenerator for Endless {
        fn contacts<'a>(
        &'a self,
        _objects: &'a ObjectSet,
    ) -> Box<dyn Iterator<Item = ParticleContact> + 'a> {
            Box::new(std::iter::repeat(contact(0)))
        }
    }

    fn contact(n: u32) -> ParticleContact {
        ParticleContact::new(ObjectId(n), None, Vec2::new(0.0, 1.0), 0.1, 0.5)
    }

    fn settings(max_contacts: usize, contact_iteration: usize) -> ContactSettings {
        ContactSettings { max_contacts, contact_iteration }
    }

    fn recording_registry() -> ContactRegistry<RecordingResolver> {
        ContactRegistry::with_resolver(RecordingResolver::default())
    }

    fn overlapping_balls(objects: &mut ObjectSet, count: usize) {
        for i in 0..count {
            let mut p = Particle::fixed(Vec2::new(i as f64 * 0.5, 0.0));
            p.bind_shape(Shape::circle(1.0));
            objects.insert(p);
        }
    }

    #[test]
    fn empty_world_runs_exactly_one_pass() {
        let mut registry = recording_registry();
        let mut objects = ObjectSet::new();
        let report = registry.resolve_contacts(&mut objects, &settings(10, 5), 0.016);

        assert_eq!(report.passes, 1);
        assert_eq!(report.resolver_calls, 0);
        assert_eq!(report.contacts_resolved, 0);
        assert!(!report.cap_reached);
        assert!(registry.resolver().calls.is_empty());
    }

    #[test]
    fn cap_of_one_with_two_generators() {
        let mut registry = recording_registry();
        registry.add(Arc::new(ContactList::new(vec![contact(1), contact(2)])));
        registry.add(Arc::new(ContactList::new(vec![contact(3), contact(4)])));

        let mut objects = ObjectSet::new();
        let report = registry.resolve_contacts(&mut objects, &settings(1, 1), 0.016);

        assert_eq!(report.contacts_resolved, 1);
        assert!(report.cap_reached);
        let resolver = registry.resolver();
        assert_eq!(resolver.seen(), 1);
        assert_eq!(resolver.calls[0].1, vec![contact(1)]);
        assert_eq!(resolver.calls[0].0, 2);
    }

    #[test]
    fn cap_holds_across_passes() {
        let mut registry = recording_registry();
        registry.add(Arc::new(ContactList::new(vec![contact(1), contact(2)])));
        registry.add(Arc::new(ContactList::new(vec![contact(3), contact(4)])));

        let mut objects = ObjectSet::new();
        let report = registry.resolve_contacts(&mut objects, &settings(1, 4), 0.016);

        // Cap reached in pass one; later passes resolve empty lists.
        assert_eq!(report.passes, 4);
        assert_eq!(report.contacts_resolved, 1);
        assert_eq!(registry.resolver().seen(), 1);
    }

    #[test]
    fn unbounded_generator_terminates_within_budget() {
        let mut registry = recording_registry();
        registry.add(Arc::new(Endless));

        let mut objects = ObjectSet::new();
        let report = registry.resolve_contacts(&mut objects, &settings(50, 3), 0.016);

        assert_eq!(report.passes, 3);
        assert!(report.cap_reached);
        for (_, contacts) in &registry.resolver().calls {
            assert!(contacts.len() <= 50);
        }
        assert_eq!(registry.resolver().seen(), 50);
    }

    #[test]
    fn generator_cap_skips_remaining_generators() {
        let mut registry = recording_registry();
        registry.add(Arc::new(ContactList::new(vec![contact(1), contact(2), contact(3)])));
        registry.add(Arc::new(ContactList::new(vec![contact(9)])));

        let mut objects = ObjectSet::new();
        registry.resolve_contacts(&mut objects, &settings(2, 1), 0.016);

        let seen = &registry.resolver().calls[0].1;
        assert_eq!(seen, &vec![contact(1), contact(2)]);
    }

    #[test]
    fn pairwise_scan_records_at_most_the_cap() {
        // 4 mutually overlapping circles -> 6 pairs, cap 2.
        let mut registry = recording_registry();
        let mut objects = ObjectSet::new();
        overlapping_balls(&mut objects, 4);

        let report = registry.resolve_contacts(&mut objects, &settings(2, 1), 0.016);
        assert!(report.cap_reached);
        assert_eq!(report.contacts_resolved, 2);
        assert_eq!(registry.resolver().calls[0].0, 4);
    }

    thread_local! {
        static DETECTOR_CALLS: Cell<usize> = const { Cell::new(0) };
    }

    /// Reports a contact for every pair it sees, touching or not.
    fn counting_detector(
        a: (ObjectId, &Particle),
        _b: (ObjectId, &Particle),
    ) -> Option<ParticleContact> {
        DETECTOR_CALLS.with(|calls| calls.set(calls.get() + 1));
        Some(ParticleContact::new(a.0, None, Vec2::new(0.0, 1.0), 0.1, 0.5))
    }

    #[test]
    fn pairwise_scan_continues_past_the_cap() {
        DETECTOR_CALLS.with(|calls| calls.set(0));
        let mut registry = recording_registry();
        registry
            .detectors_mut()
            .register(ContactType::CircleAndCircle, counting_detector);

        // 5 circles far apart -> 10 pairs, only the custom detector reports them.
        let mut objects = ObjectSet::new();
        for i in 0..5 {
            let mut p = Particle::fixed(Vec2::new(i as f64 * 10.0, 0.0));
            p.bind_shape(Shape::circle(1.0));
            objects.insert(p);
        }

        let report = registry.resolve_contacts(&mut objects, &settings(2, 1), 0.016);
        assert_eq!(DETECTOR_CALLS.with(Cell::get), 10);
        assert_eq!(report.contacts_resolved, 2);
        assert!(report.cap_reached);
    }

    #[test]
    fn detection_cap_still_lets_generators_hit_the_cap() {
        // Scan fills the cap, the generator then trips it and jumps to resolve.
        let mut registry = recording_registry();
        registry.add(Arc::new(ContactList::new(vec![contact(7)])));
        let mut objects = ObjectSet::new();
        overlapping_balls(&mut objects, 2);

        let report = registry.resolve_contacts(&mut objects, &settings(1, 2), 0.016);
        assert_eq!(report.passes, 2);
        assert_eq!(report.resolver_calls, 2);
        assert_eq!(registry.resolver().seen(), 1);
    }

    #[test]
    fn point_objects_are_not_scanned() {
        let mut registry = recording_registry();
        let mut objects = ObjectSet::new();
        objects.insert(Particle::fixed(Vec2::zero()));
        objects.insert(Particle::fixed(Vec2::zero()));

        let report = registry.resolve_contacts(&mut objects, &settings(10, 3), 0.016);
        assert_eq!(report.passes, 1);
        assert_eq!(report.contacts_resolved, 0);
    }

    #[test]
    fn generator_registration_has_set_semantics() {
        let mut registry = ContactRegistry::new();
        let g: Arc<dyn ContactGenerator> = Arc::new(ContactList::default());
        let other: Arc<dyn ContactGenerator> = Arc::new(ContactList::default());

        assert!(registry.add(g.clone()));
        assert!(!registry.add(g.clone()));
        assert_eq!(registry.generator_count(), 1);

        assert!(!registry.remove(&other));
        assert!(registry.remove(&g));
        assert!(!registry.remove(&g));
        assert_eq!(registry.generator_count(), 0);
    }

    #[test]
    fn settings_are_read_every_call() {
        let mut registry = recording_registry();
        registry.add(Arc::new(Endless));
        let mut objects = ObjectSet::new();

        let mut tunables = settings(3, 1);
        registry.resolve_contacts(&mut objects, &tunables, 0.016);
        tunables.max_contacts = 5;
        registry.resolve_contacts(&mut objects, &tunables, 0.016);

        let calls = &registry.resolver().calls;
        assert_eq!(calls[0].1.len(), 3);
        assert_eq!(calls[1].1.len(), 5);
    }

    #[test]
    fn default_resolver_separates_overlapping_balls() {
        let mut registry = ContactRegistry::new();
        let mut objects = ObjectSet::new();
        let mut a = Particle::new(Vec2::zero(), Vec2::zero(), 1.0).expect("valid");
        a.bind_shape(Shape::circle(1.0));
        let mut b = Particle::new(Vec2::new(1.0, 0.0), Vec2::zero(), 1.0).expect("valid");
        b.bind_shape(Shape::circle(1.0));
        let ia = objects.insert(a);
        let ib = objects.insert(b);

        let report = registry.resolve_contacts(&mut objects, &ContactSettings::default(), 0.016);
        assert!(report.contacts_resolved >= 1);

        let pa = objects.get(ia).map(|p| p.position).expect("a");
        let pb = objects.get(ib).map(|p| p.position).expect("b");
        assert!(pa.distance(pb) >= 2.0 - 1e-9);
    }

    #[test]
    fn zero_pass_budget_is_rejected() {
        assert!(settings(10, 0).validate().is_err());
        assert!(ContactSettings::default().validate().is_ok());
    }
}
