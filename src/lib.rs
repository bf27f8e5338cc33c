mod utils;

pub mod animation;
pub mod browser;
pub mod color;
pub mod completion;
pub mod config;
pub mod error;
pub mod field;
pub mod page;
pub mod particle;
pub mod relay;
pub mod speech;
pub mod surface;

extern crate nalgebra_glm as glm;

use log::LevelFilter;
use wasm_bindgen::prelude::*;

pub use crate::config::AppConfig;
pub use crate::error::{Error, Result};
pub use crate::page::ClimatePage;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
    utils::init_logging(LevelFilter::Info);
}

/// Turns on per-frame timing and request tracing in the console.
#[wasm_bindgen]
pub fn set_verbose(verbose: bool) {
    utils::init_logging(if verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    });
}

/// Mounts the particle background and the chat controls.
///
/// `config_json` is an optional [`AppConfig`] document; missing fields keep
/// their defaults. The returned handle keeps everything alive until `stop()`.
#[wasm_bindgen]
pub fn start(config_json: Option<String>) -> std::result::Result<ClimatePage, JsValue> {
    let config = match config_json {
        Some(json) => AppConfig::from_json(&json)?,
        None => AppConfig::default(),
    };
    Ok(ClimatePage::mount(config)?)
}
