#![forbid(unsafe_code)]

//! Browser host for kinetype.
//!
//! On `wasm32` this crate exports `KinetypePage` through `wasm-bindgen`: it
//! wraps the live DOM as a [`kinetype_core::Document`], reports viewport
//! entry through an `IntersectionObserver`, forwards `mouseenter` /
//! `mouseleave` to the hover listeners and drives frames with
//! `requestAnimationFrame` only while a scramble is running.

pub mod error;
pub mod handles;

#[cfg(target_arch = "wasm32")]
mod wasm;
#[cfg(target_arch = "wasm32")]
mod web_dom;

pub use error::{WebHostError, parse_options};
pub use handles::HandleTable;

#[cfg(target_arch = "wasm32")]
pub use wasm::KinetypePage;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets. The stub still validates options.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct KinetypePage {
    config: kinetype_fx::EffectsConfig,
}

#[cfg(not(target_arch = "wasm32"))]
impl KinetypePage {
    pub fn new(options: Option<&str>) -> Result<Self, WebHostError> {
        let config = parse_options(options)?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &kinetype_fx::EffectsConfig {
        &self.config
    }
}
