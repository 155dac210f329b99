use std::sync::Arc;

use crate::domain::{contact_type, ObjectId, ObjectSet, ParticleContact};

use super::detector::DetectorTable;
use super::generator::ContactGenerator;
use super::resolver::{ContactResolver, ParticleContactResolver};
use super::ContactSettings;

/// Summary of one `resolve_contacts` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveReport {
    /// Passes started (including the one that found nothing).
    pub passes: usize,
    /// Resolver invocations.
    pub resolver_calls: usize,
    /// Contacts handed to the resolver, summed over passes.
    pub contacts_resolved: usize,
    /// The contact cap was hit at some point during the call.
    pub cap_reached: bool,
}

/// Orchestrates contact generation and resolution for one simulation step.
///
/// Owns the generator sequence, the detector table and the resolver. The
/// world's objects are passed in on every call so objects added between
/// ticks are always seen.
pub struct ContactRegistry<R: ContactResolver = ParticleContactResolver> {
    generators: Vec<Arc<dyn ContactGenerator>>,
    detectors: DetectorTable,
    resolver: R,
    contacts: Vec<ParticleContact>,
    candidates: Vec<ObjectId>,
    contact_counter: usize,
    cap_reached: bool,
}

impl ContactRegistry<ParticleContactResolver> {
    pub fn new() -> Self {
        Self::with_resolver(ParticleContactResolver::new(0))
    }
}

impl Default for ContactRegistry<ParticleContactResolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ContactResolver> ContactRegistry<R> {
    pub fn with_resolver(resolver: R) -> Self {
        Self {
            generators: Vec::new(),
            detectors: DetectorTable::with_defaults(),
            resolver,
            contacts: Vec::new(),
            candidates: Vec::new(),
            contact_counter: 0,
            cap_reached: false,
        }
    }

    // === Generator registration ===

    /// Register a generator. Returns `false` if it was already registered.
    ///
    /// Generators run in registration order.
    pub fn add(&mut self, generator: Arc<dyn ContactGenerator>) -> bool {
        if self.contains(&generator) {
            return false;
        }
        self.generators.push(generator);
        true
    }

    /// Unregister a generator. Returns `false` if it was not registered.
    pub fn remove(&mut self, generator: &Arc<dyn ContactGenerator>) -> bool {
        match self.generators.iter().position(|g| Arc::ptr_eq(g, generator)) {
            Some(idx) => {
                self.generators.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, generator: &Arc<dyn ContactGenerator>) -> bool {
        self.generators.iter().any(|g| Arc::ptr_eq(g, generator))
    }

    pub fn generator_count(&self) -> usize {
        self.generators.len()
    }

    // === Accessors ===

    pub fn detectors(&self) -> &DetectorTable {
        &self.detectors
    }

    pub fn detectors_mut(&mut self) -> &mut DetectorTable {
        &mut self.detectors
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut R {
        &mut self.resolver
    }

    /// Contacts gathered by the last pass of the last call.
    pub fn contacts(&self) -> &[ParticleContact] {
        &self.contacts
    }

    // === Resolution ===

    /// Detect, generate and resolve contacts for one step.
    ///
    /// `settings` is read on every call; the counter is shared by all passes
    /// of the call and never exceeds `settings.max_contacts`.
    pub fn resolve_contacts(
        &mut self,
        objects: &mut ObjectSet,
        settings: &ContactSettings,
        duration: f64,
    ) -> ResolveReport {
        let max_contacts = settings.max_contacts;
        let mut report = ResolveReport::default();
        self.contact_counter = 0;
        self.cap_reached = false;

        for pass in 0..settings.contact_iteration {
            self.contacts.clear();
            report.passes += 1;

            self.detect_pairs(objects, max_contacts);
            let generators_capped = self.run_generators(objects, max_contacts);

            if generators_capped {
                tracing::debug!(pass, max_contacts, "contact cap reached by generators");
            } else if self.contacts.is_empty() {
                tracing::trace!(pass, "no contacts left");
                break;
            }

            self.resolver.set_iterations(self.contacts.len() * 2);
            self.resolver.resolve_contacts(&mut self.contacts, objects, duration);
            report.resolver_calls += 1;
            report.contacts_resolved += self.contacts.len();
            tracing::trace!(pass, contacts = self.contacts.len(), "pass resolved");
        }

        report.cap_reached = self.cap_reached;
        report
    }

    /// Pairwise scan over every non-point object. Hitting the cap only drops
    /// further contacts; every pair is still visited.
    fn detect_pairs(&mut self, objects: &ObjectSet, max_contacts: usize) {
        self.candidates.clear();
        self.candidates.extend(
            objects
                .iter()
                .filter(|(_, p)| !p.shape().is_point())
                .map(|(id, _)| id),
        );

        for i in 0..self.candidates.len() {
            let id_a = self.candidates[i];
            let Some(pa) = objects.get(id_a) else {
                continue;
            };
            for &id_b in &self.candidates[i + 1..] {
                let Some(pb) = objects.get(id_b) else {
                    continue;
                };
                let (first, second) = if pa.shape_type() <= pb.shape_type() {
                    ((id_a, pa), (id_b, pb))
                } else {
                    ((id_b, pb), (id_a, pa))
                };
                let Some(category) = contact_type(first.1.shape_type(), second.1.shape_type())
                else {
                    continue;
                };
                if let Some(contact) = self.detectors.dispatch(category, first, second) {
                    let counter = &mut self.contact_counter;
                    if !push_capped(&mut self.contacts, counter, max_contacts, contact) {
                        self.cap_reached = true;
                    }
                }
            }
        }
    }

    /// Pull generator contacts until exhausted or capped. Returns `true` when
    /// the cap cut generation short, skipping the remaining generators.
    fn run_generators(&mut self, objects: &ObjectSet, max_contacts: usize) -> bool {
        for generator in &self.generators {
            for contact in generator.contacts(objects) {
                let counter = &mut self.contact_counter;
                if !push_capped(&mut self.contacts, counter, max_contacts, contact) {
                    self.cap_reached = true;
                    return true;
                }
            }
        }
        false
    }
}

/// Append while the counter is below the cap. Returns `false` once full.
#[inline]
fn push_capped(
    contacts: &mut Vec<ParticleContact>,
    counter: &mut usize,
    max_contacts: usize,
    contact: ParticleContact,
) -> bool {
    if *counter < max_contacts {
        *counter += 1;
        contacts.push(contact);
        true
    } else {
        false
    }
}
