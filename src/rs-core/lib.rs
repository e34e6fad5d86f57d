use wasm_bindgen::prelude::*;

mod analytics;
mod bindings;
mod config;
mod content;
pub mod dispatcher;
mod host;
mod input;
mod media_source;
mod overlays;
mod parser;
mod playback;
mod preferences;
mod tracks;
mod utils;

#[cfg(test)]
mod testing;

pub use utils::logger::Logger;
