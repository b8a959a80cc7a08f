#![cfg(target_arch = "wasm32")]

use crate::config::{FlockConfig, UpdateOrder};
use crate::flock::Flock;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn flock_defaults() -> JsValue {
    let config = FlockConfig::default();
    serde_wasm_bindgen::to_value(&config).unwrap_or(JsValue::NULL)
}

/// Names accepted by the `update_order` config field.
#[wasm_bindgen]
pub fn update_orders() -> js_sys::Array {
    let out = js_sys::Array::new();
    for order in UpdateOrder::ALL {
        out.push(&JsValue::from_str(order.name()));
    }
    out
}

/// Flock handle for a JavaScript scene graph. The host calls `update()` once
/// per animation frame and copies `positions()` / `orientations()` into its
/// meshes.
#[wasm_bindgen]
pub struct WasmFlock {
    flock: Flock,
}

#[wasm_bindgen]
impl WasmFlock {
    /// `seed` is a `u32` so it stays a plain JS number.
    #[wasm_bindgen(constructor)]
    pub fn new(population: usize, seed: u32) -> Result<WasmFlock, JsValue> {
        let config = FlockConfig { population, seed: seed.into(), ..FlockConfig::default() };
        let flock = Flock::new(config).map_err(to_js)?;
        Ok(WasmFlock { flock })
    }

    /// Build from a config object; missing fields take defaults:
    /// {
    ///   population?: number, seed?: number,
    ///   boid?: {
    ///     max_force, max_speed, view_distance, spawn_speed,
    ///     bounds: { width, height, depth }
    ///   },
    ///   steering?: { base_strength, separation_factor, alignment_factor, cohesion_factor, fov },
    ///   wrap?: { width, height },
    ///   update_order?: "sequential" | "snapshot",
    ///   acceleration?: "carry" | "reset"
    /// }
    #[wasm_bindgen(js_name = "newFromConfig")]
    pub fn new_from_config(config: JsValue) -> Result<WasmFlock, JsValue> {
        let config = parse_config(config)?;
        let flock = Flock::new(config).map_err(to_js)?;
        Ok(WasmFlock { flock })
    }

    /// Build from packed `[x, y, z, vx, vy, vz]*` states and an optional
    /// config object (`undefined` / `null` for defaults).
    #[wasm_bindgen(js_name = "newFromStates")]
    pub fn new_from_states(states: Vec<f64>, config: JsValue) -> Result<WasmFlock, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            FlockConfig::default()
        } else {
            parse_config(config)?
        };
        let flock = Flock::from_states(&states, config).map_err(to_js)?;
        Ok(WasmFlock { flock })
    }

    pub fn len(&self) -> usize { self.flock.len() }

    #[wasm_bindgen(js_name = "isEmpty")]
    pub fn is_empty(&self) -> bool { self.flock.is_empty() }

    pub fn update(&mut self) { self.flock.update(); }

    /// Tick count as a JS number; exact up to 2^53 ticks.
    pub fn ticks(&self) -> f64 { self.flock.ticks() as f64 }

    pub fn positions(&self) -> Vec<f32> { self.flock.positions_flat() }

    pub fn orientations(&self) -> Vec<f32> { self.flock.orientations_flat() }

    pub fn states(&self) -> Vec<f32> {
        self.flock
            .state_matrix()
            .iter()
            .flat_map(|row| row.iter().map(|&c| c as f32))
            .collect()
    }

    /// `{ boids, ticks, search, update_order }` for a debug overlay.
    pub fn info(&self) -> js_sys::Object {
        let order = self.flock.config().update_order.name();
        let obj = js_sys::Object::new();
        set_field(&obj, "boids", &JsValue::from_f64(self.flock.len() as f64));
        set_field(&obj, "ticks", &JsValue::from_f64(self.ticks()));
        set_field(&obj, "search", &JsValue::from_str(self.flock.search_name()));
        set_field(&obj, "update_order", &JsValue::from_str(order));
        obj
    }

    pub fn snapshots(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.flock.snapshots()).unwrap_or(JsValue::NULL)
    }
}

fn set_field(obj: &js_sys::Object, key: &str, value: &JsValue) {
    let _ = js_sys::Reflect::set(obj, &JsValue::from_str(key), value);
}

fn parse_config(config: JsValue) -> Result<FlockConfig, JsValue> {
    let config: FlockConfig = serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("invalid config: {}", e)))?;
    config.validate().map_err(to_js)?;
    Ok(config)
}

fn to_js(err: crate::error::FlockError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
