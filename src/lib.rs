pub mod colormap;
pub mod config;
pub mod core;
pub mod interaction;
pub mod layout;
pub mod mesh;
pub mod render;
pub mod runtime;
pub mod scale;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("unknown colormap: {0}")]
    UnknownColormap(String),

    #[error("invalid function expression: {0}")]
    Expression(String),

    #[error("invalid plot configuration: {0}")]
    Config(String),

    #[error("height map is empty")]
    EmptyHeightMap,

    #[error("height map row {row} does not have {expected} columns")]
    RaggedHeightMap { row: usize, expected: usize },
}

pub type Result<T> = std::result::Result<T, error_stack::Report<PlotError>>;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

pub mod prelude {
    pub use crate::colormap::*;
    pub use crate::config::*;
    pub use crate::core::*;
    pub use crate::interaction::*;
    pub use crate::layout::*;
    pub use crate::render::*;
    pub use crate::runtime::*;
    pub use crate::scale::*;
    pub use crate::{PlotError, Result};
}
