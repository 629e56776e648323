//! WebAssembly bindings for Toroidal Life.
//!
//! Provides a thin wrapper around the `Universe` backends for browser
//! renderers. The renderer reads cells straight out of linear memory:
//! `new Uint8Array(universe.getBuffer(), universe.cells(), universe.byteLength())`.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::{
    compute::{Universe, create_universe},
    schema::{Backend, Seed, UniverseConfig},
};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    // Initialize WASM logger
    wasm_logger::init(wasm_logger::Config::default());
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WebAssembly wrapper for a Game of Life universe.
#[wasm_bindgen]
pub struct WasmUniverse {
    universe: Box<dyn Universe>,
}

#[wasm_bindgen]
impl WasmUniverse {
    /// Create a universe from JSON configuration.
    ///
    /// # Arguments
    /// * `config_json` - JSON string containing UniverseConfig
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmUniverse, JsValue> {
        let config = UniverseConfig::from_json(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?;
        let universe = create_universe(&config).map_err(js_error)?;
        Ok(WasmUniverse { universe })
    }

    /// Advance exactly one generation.
    #[wasm_bindgen]
    pub fn tick(&mut self) -> Result<(), JsValue> {
        self.universe.tick().map_err(js_error)
    }

    /// Advance the given number of generations.
    #[wasm_bindgen]
    pub fn run(&mut self, ticks: u32) -> Result<(), JsValue> {
        self.universe.run(u64::from(ticks)).map_err(js_error)
    }

    /// Byte offset of the packed generation in the buffer returned by
    /// `getBuffer`. Valid until the next `tick`.
    #[wasm_bindgen]
    pub fn cells(&self) -> Result<usize, JsValue> {
        let buffer = self.universe.buffer().map_err(js_error)?;
        let offset = self.universe.cells().map_err(js_error)?;
        Ok(buffer.as_ptr() as usize + offset)
    }

    /// The module's linear memory as an `ArrayBuffer`.
    #[wasm_bindgen(js_name = getBuffer)]
    pub fn get_buffer(&self) -> js_sys::ArrayBuffer {
        wasm_bindgen::memory()
            .unchecked_into::<js_sys::WebAssembly::Memory>()
            .buffer()
            .unchecked_into()
    }

    /// Length in bytes of the packed generation.
    #[wasm_bindgen(js_name = byteLength)]
    pub fn byte_length(&self) -> Result<usize, JsValue> {
        Ok(self.universe.view().map_err(js_error)?.bytes().len())
    }

    /// Whether the cell at `(row, col)` is alive.
    #[wasm_bindgen(js_name = isAlive)]
    pub fn is_alive(&self, row: usize, col: usize) -> Result<bool, JsValue> {
        let view = self.universe.view().map_err(js_error)?;
        if row >= view.height() || col >= view.width() {
            return Err(JsValue::from_str(&format!(
                "Cell ({row}, {col}) outside {}x{} grid",
                view.width(),
                view.height()
            )));
        }
        Ok(view.is_alive(row, col))
    }

    /// Mark cells alive from a flat `[row0, col0, row1, col1, ...]` array.
    #[wasm_bindgen(js_name = setCells)]
    pub fn set_cells(&mut self, flat: &[u32]) -> Result<(), JsValue> {
        if flat.len() % 2 != 0 {
            return Err(JsValue::from_str(&format!(
                "Cell array has odd length {}, expected row/col pairs",
                flat.len()
            )));
        }
        let cells: Vec<(usize, usize)> = flat
            .chunks_exact(2)
            .map(|pair| (pair[0] as usize, pair[1] as usize))
            .collect();
        self.universe.set_cells(&cells).map_err(js_error)
    }

    /// Reset every cell to dead.
    #[wasm_bindgen]
    pub fn clear(&mut self) -> Result<(), JsValue> {
        self.universe.clear().map_err(js_error)
    }

    /// Reinitialize with a new seed, keeping dimensions and backend.
    #[wasm_bindgen]
    pub fn reset(&mut self, seed_json: &str) -> Result<(), JsValue> {
        let seed: Seed = serde_json::from_str(seed_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid seed JSON: {e}")))?;
        let width = self.universe.width().map_err(js_error)?;
        let height = self.universe.height().map_err(js_error)?;
        self.universe.init(width, height, &seed).map_err(js_error)
    }

    /// Get universe statistics as a JS object.
    #[wasm_bindgen(js_name = getStats)]
    pub fn get_stats(&self) -> Result<JsValue, JsValue> {
        let stats = self.universe.stats().map_err(js_error)?;
        serde_wasm_bindgen::to_value(&stats)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Get grid width.
    #[wasm_bindgen(js_name = getWidth)]
    pub fn width(&self) -> Result<usize, JsValue> {
        self.universe.width().map_err(js_error)
    }

    /// Get grid height.
    #[wasm_bindgen(js_name = getHeight)]
    pub fn height(&self) -> Result<usize, JsValue> {
        self.universe.height().map_err(js_error)
    }

    /// Get generation count since init.
    #[wasm_bindgen(js_name = getGeneration)]
    pub fn get_generation(&self) -> u64 {
        self.universe.generation()
    }
}

/// Create a randomly seeded universe.
///
/// `backend` is `"kernel"` (default) or `"scalar"`.
#[wasm_bindgen(js_name = createUniverse)]
pub async fn create_universe_js(
    width: usize,
    height: usize,
    backend: Option<String>,
) -> Result<WasmUniverse, JsValue> {
    let backend = match backend.as_deref() {
        None | Some("kernel") => Backend::Kernel,
        Some("scalar") => Backend::Scalar,
        Some(other) => {
            return Err(JsValue::from_str(&format!("Unknown backend: {other}")));
        }
    };

    let config = UniverseConfig {
        width,
        height,
        backend,
        seed: Seed::default(),
    };
    let universe = create_universe(&config).map_err(js_error)?;
    Ok(WasmUniverse { universe })
}
