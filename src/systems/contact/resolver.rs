//! ParticleContactResolver - iterative impulse solver
//!
//! Each iteration picks the most urgent contact (most negative separating
//! velocity among contacts that are closing or interpenetrating), resolves
//! its velocity and interpenetration, then corrects the penetration of every
//! other contact sharing a moved particle.

use crate::core::Vec2;
use crate::domain::{ObjectSet, ParticleContact};

/// Black-box solver driven by the contact registry.
pub trait ContactResolver {
    fn iterations(&self) -> usize;
    fn set_iterations(&mut self, iterations: usize);
    fn resolve_contacts(
        &mut self,
        contacts: &mut [ParticleContact],
        objects: &mut ObjectSet,
        duration: f64,
    );
}

#[derive(Clone, Debug, Default)]
pub struct ParticleContactResolver {
    iterations: usize,
    iterations_used: usize,
}

impl ParticleContactResolver {
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            iterations_used: 0,
        }
    }

    /// Iterations actually spent by the last `resolve_contacts` call.
    pub fn iterations_used(&self) -> usize {
        self.iterations_used
    }
}

impl ContactResolver for ParticleContactResolver {
    fn iterations(&self) -> usize {
        self.iterations
    }

    fn set_iterations(&mut self, iterations: usize) {
        self.iterations = iterations;
    }

    fn resolve_contacts(
        &mut self,
        contacts: &mut [ParticleContact],
        objects: &mut ObjectSet,
        duration: f64,
    ) {
        self.iterations_used = 0;
        while self.iterations_used < self.iterations {
            let mut max = f64::MAX;
            let mut max_index = None;
            for (i, contact) in contacts.iter().enumerate() {
                let sep = contact.separating_velocity(objects);
                if sep < max && (sep < 0.0 || contact.penetration > 0.0) {
                    max = sep;
                    max_index = Some(i);
                }
            }
            let Some(index) = max_index else {
                break;
            };

            let resolved = contacts[index];
            resolve_velocity(&resolved, objects, duration);
            let (move_a, move_b) = resolve_interpenetration(&resolved, objects);

            for contact in contacts.iter_mut() {
                if contact.a == resolved.a {
                    contact.penetration -= move_a.dot(contact.normal);
                } else if Some(contact.a) == resolved.b {
                    contact.penetration -= move_b.dot(contact.normal);
                }
                if let Some(b) = contact.b {
                    if b == resolved.a {
                        contact.penetration += move_a.dot(contact.normal);
                    } else if Some(b) == resolved.b {
                        contact.penetration += move_b.dot(contact.normal);
                    }
                }
            }
            self.iterations_used += 1;
        }
    }
}

fn inverse_masses(contact: &ParticleContact, objects: &ObjectSet) -> (f64, f64) {
    let inv_a = objects.get(contact.a).map_or(0.0, |p| p.inverse_mass());
    let inv_b = contact
        .b
        .and_then(|b| objects.get(b))
        .map_or(0.0, |p| p.inverse_mass());
    (inv_a, inv_b)
}

/// Velocity change (read through the force accumulators) built up over
/// `duration`, projected on the normal.
fn acc_caused_separation(contact: &ParticleContact, objects: &ObjectSet, duration: f64) -> f64 {
    let acc = |id| {
        objects
            .get(id)
            .map_or(Vec2::zero(), |p| p.force() * p.inverse_mass())
    };
    let mut relative = acc(contact.a);
    if let Some(b) = contact.b {
        relative -= acc(b);
    }
    relative.dot(contact.normal) * duration
}

fn resolve_velocity(contact: &ParticleContact, objects: &mut ObjectSet, duration: f64) {
    let separating = contact.separating_velocity(objects);
    if separating > 0.0 {
        return;
    }

    let mut new_sep = -separating * contact.restitution;

    // Cancel velocity that only came from this tick's acceleration, so
    // resting contacts do not jitter.
    let acc_sep = acc_caused_separation(contact, objects, duration);
    if acc_sep < 0.0 {
        new_sep += contact.restitution * acc_sep;
        if new_sep < 0.0 {
            new_sep = 0.0;
        }
    }

    let delta = new_sep - separating;
    let (inv_a, inv_b) = inverse_masses(contact, objects);
    let total_inverse_mass = inv_a + inv_b;
    if total_inverse_mass <= 0.0 {
        return;
    }

    let impulse_per_inv_mass = contact.normal * (delta / total_inverse_mass);
    match contact.b {
        Some(b) => {
            if let Some((pa, pb)) = objects.pair_mut(contact.a, b) {
                pa.velocity += impulse_per_inv_mass * inv_a;
                pb.velocity -= impulse_per_inv_mass * inv_b;
            }
        }
        None => {
            if let Some(pa) = objects.get_mut(contact.a) {
                pa.velocity += impulse_per_inv_mass * inv_a;
            }
        }
    }
}

fn resolve_interpenetration(contact: &ParticleContact, objects: &mut ObjectSet) -> (Vec2, Vec2) {
    if contact.penetration <= 0.0 {
        return (Vec2::zero(), Vec2::zero());
    }
    let (inv_a, inv_b) = inverse_masses(contact, objects);
    let total_inverse_mass = inv_a + inv_b;
    if total_inverse_mass <= 0.0 {
        return (Vec2::zero(), Vec2::zero());
    }

    let move_per_inv_mass = contact.normal * (contact.penetration / total_inverse_mass);
    let move_a = move_per_inv_mass * inv_a;
    let move_b = -(move_per_inv_mass * inv_b);

    match contact.b {
        Some(b) => {
            if let Some((pa, pb)) = objects.pair_mut(contact.a, b) {
                pa.position += move_a;
                pb.position += move_b;
            }
        }
        None => {
            if let Some(pa) = objects.get_mut(contact.a) {
                pa.position += move_a;
            }
        }
    }
    (move_a, move_b)
}
