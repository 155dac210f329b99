use wasm_bindgen::prelude::*;

/// Timings and counters of the last step.
#[wasm_bindgen]
#[derive(Clone, Debug, Default)]
pub struct PerfStats {
    pub(super) step_ms: f64,
    pub(super) contacts_ms: f64,
    pub(super) fluid_ms: f64,
    pub(super) integrate_ms: f64,

    pub(super) passes: u32,
    pub(super) resolver_calls: u32,
    pub(super) contacts_resolved: u32,
    pub(super) cap_hits: u32,
    pub(super) neighbor_pairs: u32,
    pub(super) fluid_particles: u32,
    pub(super) object_count: u32,
}

impl PerfStats {
    pub(crate) fn reset(&mut self) {
        *self = PerfStats::default();
    }
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 { self.step_ms }
    #[wasm_bindgen(getter)]
    pub fn contacts_ms(&self) -> f64 { self.contacts_ms }
    #[wasm_bindgen(getter)]
    pub fn fluid_ms(&self) -> f64 { self.fluid_ms }
    #[wasm_bindgen(getter)]
    pub fn integrate_ms(&self) -> f64 { self.integrate_ms }
    #[wasm_bindgen(getter)]
    pub fn passes(&self) -> u32 { self.passes }
    #[wasm_bindgen(getter)]
    pub fn resolver_calls(&self) -> u32 { self.resolver_calls }
    #[wasm_bindgen(getter)]
    pub fn contacts_resolved(&self) -> u32 { self.contacts_resolved }
    #[wasm_bindgen(getter)]
    pub fn cap_hits(&self) -> u32 { self.cap_hits }
    #[wasm_bindgen(getter)]
    pub fn neighbor_pairs(&self) -> u32 { self.neighbor_pairs }
    #[wasm_bindgen(getter)]
    pub fn fluid_particles(&self) -> u32 { self.fluid_particles }
    #[wasm_bindgen(getter)]
    pub fn object_count(&self) -> u32 { self.object_count }
}
