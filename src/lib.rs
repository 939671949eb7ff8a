pub mod assets;
pub mod config;
pub mod control;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod mixer;

use crate::config::MixerConfig;
use crate::control::ControlPort;
use crate::engine::ToneEngine;
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the chromaloop-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed handle around a [`ToneEngine`], driven from an
/// AudioWorklet: load the twelve loops, `start`, then call `control` from
/// UI events and `render` from the audio callback.
#[wasm_bindgen]
pub struct ToneMixerHandle {
    engine: ToneEngine,
}

#[wasm_bindgen]
impl ToneMixerHandle {
    /// `config` is a `MixerConfig` object; `undefined`/`null` selects the
    /// default fade policy.
    #[wasm_bindgen(constructor)]
    pub fn new(sample_rate: f64, config: JsValue) -> Result<ToneMixerHandle, JsValue> {
        let config: MixerConfig = if config.is_undefined() || config.is_null() {
            MixerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("{e}")))?
        };
        let engine = ToneEngine::new(sample_rate, config)
            .map_err(|e| JsValue::from_str(&format!("{e}")))?;
        Ok(ToneMixerHandle { engine })
    }

    /// Decode a WAV file and assign it to pitch class `index`.
    #[wasm_bindgen(js_name = loadChannel)]
    pub fn load_channel(&mut self, index: usize, wav_bytes: &[u8]) -> Result<(), JsValue> {
        let buffer = assets::decode_wav(wav_bytes)
            .map_err(|e| JsValue::from_str(&format!("{}", e.for_channel(index))))?;
        self.engine
            .load_channel(index, buffer)
            .map_err(|e| JsValue::from_str(&format!("{e}")))
    }

    /// Start all loops. Pitch classes that were never loaded stay silent.
    pub fn start(&mut self) {
        self.engine.start();
    }

    /// Apply a control payload: `[index, audible]` or twelve booleans.
    /// Malformed payloads are ignored.
    pub fn control(&mut self, payload: JsValue) {
        match serde_wasm_bindgen::from_value::<serde_json::Value>(payload) {
            Ok(value) => self.engine.handle_value(&value),
            Err(e) => log::debug!("dropping control payload: {e}"),
        }
    }

    /// Render `frames` mono samples.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        self.engine.render(frames)
    }
}
