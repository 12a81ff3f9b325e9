//! In-browser engine for tourfolio sites
//!
//! This crate provides the panorama viewer and the shader-effect portfolio
//! grid. The engine modules are plain Rust and testable natively; the WebGPU
//! renderers and the JavaScript bindings are enabled with the `webgpu` feature.

pub mod camera;
pub mod effects;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod hotspot;
pub mod hover;
pub mod scene;
pub mod texture_data;
pub mod tour;
pub mod tour_types;
pub mod transition;

#[cfg(feature = "webgpu")]
mod bindings;
#[cfg(feature = "webgpu")]
pub mod webgpu;

#[cfg(feature = "webgpu")]
pub use bindings::{PanoramaViewer, PortfolioGrid};

pub use error::ViewerError;

use wasm_bindgen::prelude::*;

/// Initialize WASM panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Check if WebGPU is exposed by the current browser
#[wasm_bindgen]
pub fn check_webgpu_support() -> bool {
    web_sys::window()
        .map(|w| js_sys::Reflect::has(&w.navigator(), &JsValue::from_str("gpu")).unwrap_or(false))
        .unwrap_or(false)
}
