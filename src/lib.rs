// Copyright 2026 Bastion Systems. All rights reserved.
// Bastion Mesh Defense Simulator

pub mod types;
pub mod topology;
pub mod lifecycle;
pub mod packets;
pub mod attack;
pub mod frequency;
pub mod eventlog;
pub mod advisory;
pub mod simulation;

pub use types::*;
pub use simulation::DefenseSimulation;

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl DefenseSimulation {
    /// Construct the fixed 15-node mesh. The seed keeps a session
    /// replayable; the renderer usually passes `Date.now()`.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Self {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        Self::with_seed(seed)
    }

    /// Advance one animation frame and hand the renderer its snapshot.
    pub fn tick(&mut self, dt_ms: f64) -> JsValue {
        let snapshot = self.tick_core(dt_ms);
        serde_wasm_bindgen::to_value(&snapshot).unwrap_or(JsValue::NULL)
    }

    /// Control surface: 0 = NONE, 1 = SNIFFING, 2 = MITM, 3 = HIJACKING.
    /// Selecting the active mode again deactivates it.
    pub fn select_attack_mode(&mut self, mode: u8) {
        self.select_mode(AttackMode::from_index(mode));
    }

    pub fn get_nodes(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.nodes).unwrap_or(JsValue::NULL)
    }

    pub fn get_links(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.links).unwrap_or(JsValue::NULL)
    }

    pub fn get_log(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.log_entries()).unwrap_or(JsValue::NULL)
    }

    pub fn get_state(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.state).unwrap_or(JsValue::NULL)
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.state.viewport_width = width;
        self.state.viewport_height = height;
    }

    /// Run N frames without returning snapshots (fast batch mode).
    pub fn run_batch(&mut self, frames: u32, dt_ms: f64) {
        for _ in 0..frames {
            self.tick_core(dt_ms);
        }
    }

    /// Reset to a fresh session with the same seed; the advisory provider
    /// is carried over.
    pub fn reset(&mut self) {
        let advisory = std::mem::replace(
            &mut self.advisory,
            Box::new(advisory::NullAdvisory::new()),
        );
        let seed = self.seed;
        let viewport = (self.state.viewport_width, self.state.viewport_height);
        *self = DefenseSimulation::with_seed(seed);
        self.advisory = advisory;
        self.state.viewport_width = viewport.0;
        self.state.viewport_height = viewport.1;
    }
}
