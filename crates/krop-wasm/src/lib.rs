//! Krop WASM - WebAssembly bindings for the krop crop engine
//!
//! This crate exposes the krop-core controller to JavaScript/TypeScript
//! applications.
//!
//! # Module Structure
//!
//! - `cropper` - The `JsCropper` controller wrapper
//!
//! Engine logs go through `log` to the browser console via `console_log`.
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropper } from '@krop/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const cropper = new JsCropper();
//! cropper.set_image(bytes);
//! cropper.update_container(width, height);
//! ```

use wasm_bindgen::prelude::*;

mod cropper;

pub use cropper::JsCropper;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Errors only when a logger is already installed.
    console_log::init_with_level(log::Level::Info).ok();
    log::debug!("krop-wasm {} ready", version());
}

/// Change how much the engine logs to the console.
///
/// Accepts `off`, `error`, `warn`, `info`, `debug` or `trace`.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> bool {
    match level.parse::<log::LevelFilter>() {
        Ok(filter) => {
            log::set_max_level(filter);
            true
        }
        Err(_) => false,
    }
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
