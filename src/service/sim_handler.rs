use serde_wasm_bindgen;
use wasm_bindgen::prelude::*;

use crate::config::FlightConfig;
use crate::error::FlightError;
use crate::logic::FlightLogic;

fn to_js_error(err: FlightError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Browser-facing handle. Single-threaded: the host calls `update` from its
/// own frame or interval loop.
#[wasm_bindgen]
pub struct FlightHandler {
    logic: FlightLogic,
}

impl Default for FlightHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl FlightHandler {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            logic: FlightLogic::default(),
        }
    }

    #[wasm_bindgen]
    pub fn init(max_drones: usize, tick_period_ms: u32) -> Result<FlightHandler, JsValue> {
        let config = FlightConfig {
            max_drones,
            tick_period_ms: u64::from(tick_period_ms),
            ..FlightConfig::default()
        };
        config.validate().map_err(to_js_error)?;
        Ok(Self {
            logic: FlightLogic::new(config),
        })
    }

    /// Expects an array of equal-length number arrays.
    #[wasm_bindgen]
    pub fn build_grid(&mut self, matrix: JsValue) -> Result<(), JsValue> {
        let matrix: Vec<Vec<i32>> = serde_wasm_bindgen::from_value(matrix)?;
        self.logic.build_grid(&matrix).map_err(to_js_error)
    }

    /// Row-major values split into rows of `width`. Returns false when the
    /// values do not fill whole rows.
    #[wasm_bindgen]
    pub fn build_grid_flat(&mut self, width: usize, values: Vec<i32>) -> bool {
        if width == 0 || values.len() % width != 0 {
            return false;
        }
        let matrix: Vec<Vec<i32>> = values.chunks(width).map(<[i32]>::to_vec).collect();
        self.logic.build_grid(&matrix).is_ok()
    }

    #[wasm_bindgen]
    pub fn register_drone(&mut self, name: &str, x: i32, y: i32) -> Result<(), JsValue> {
        self.logic
            .register_drone(name, x, y)
            .map(|_| ())
            .map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn record_position(&mut self, name: &str, x: i32, y: i32) -> bool {
        self.logic.record_position(name, x, y)
    }

    #[wasm_bindgen]
    pub fn go_back(&mut self, name: &str) -> bool {
        self.logic.go_back(name).is_some()
    }

    #[wasm_bindgen]
    pub fn get_path(&self, name: &str) -> JsValue {
        serde_wasm_bindgen::to_value(&self.logic.path_for(name)).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen]
    pub fn get_snapshot(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.logic.snapshot()).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen]
    pub fn get_colors(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.logic.colors()).unwrap_or(JsValue::NULL)
    }

    #[cfg(target_arch = "wasm32")]
    #[wasm_bindgen]
    pub fn get_flat_snapshot(&mut self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.logic.flat_snapshot())
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.logic.reset_all();
    }

    #[wasm_bindgen]
    pub fn start(&mut self) {
        self.logic.start();
    }

    #[wasm_bindgen]
    pub fn pause(&mut self) {
        self.logic.pause();
    }

    #[wasm_bindgen]
    pub fn is_running(&self) -> bool {
        self.logic.running()
    }

    #[wasm_bindgen]
    pub fn step(&mut self) {
        self.logic.step();
    }

    #[wasm_bindgen]
    pub fn update(&mut self) {
        self.logic.update();
    }

    #[wasm_bindgen]
    pub fn get_tick(&self) -> u64 {
        self.logic.tick()
    }

    #[wasm_bindgen]
    pub fn get_tick_period(&self) -> u32 {
        u32::try_from(self.logic.config().tick_period_ms).unwrap_or(u32::MAX)
    }

    #[wasm_bindgen]
    pub fn get_drone_count(&self) -> usize {
        self.logic.drone_count()
    }

    #[wasm_bindgen]
    pub fn get_last_tick_duration(&self) -> f64 {
        self.logic.last_tick_duration()
    }

    #[wasm_bindgen]
    pub fn get_restart_count(&self) -> u64 {
        self.logic.restart_count()
    }
}

#[cfg(test)]
impl FlightHandler {
    pub fn logic(&self) -> &FlightLogic {
        &self.logic
    }
}
