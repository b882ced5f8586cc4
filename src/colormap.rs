//! Named color gradients sampled into fixed-size tables.

use crate::core::Color;
use crate::{PlotError, Result};
use colorous::Gradient;
use error_stack::Report;

const GRADIENTS: &[(&str, Gradient)] = &[
    ("viridis", colorous::VIRIDIS),
    ("inferno", colorous::INFERNO),
    ("magma", colorous::MAGMA),
    ("plasma", colorous::PLASMA),
    ("cividis", colorous::CIVIDIS),
    ("turbo", colorous::TURBO),
    ("warm", colorous::WARM),
    ("cool", colorous::COOL),
    ("cubehelix", colorous::CUBEHELIX),
    ("rainbow", colorous::RAINBOW),
    ("sinebow", colorous::SINEBOW),
    ("greys", colorous::GREYS),
    ("blues", colorous::BLUES),
    ("greens", colorous::GREENS),
    ("oranges", colorous::ORANGES),
    ("purples", colorous::PURPLES),
    ("reds", colorous::REDS),
    ("spectral", colorous::SPECTRAL),
    ("rdbu", colorous::RED_BLUE),
    ("rdylbu", colorous::RED_YELLOW_BLUE),
    ("rdylgn", colorous::RED_YELLOW_GREEN),
];

pub fn names() -> impl Iterator<Item = &'static str> {
    GRADIENTS.iter().map(|(name, _)| *name)
}

pub fn gradient(name: &str) -> Result<Gradient> {
    let key = name.trim().to_ascii_lowercase();
    GRADIENTS
        .iter()
        .find(|(n, _)| *n == key)
        .map(|(_, g)| *g)
        .ok_or_else(|| Report::new(PlotError::UnknownColormap(name.to_string())))
}

/// `shades` evenly spaced colors from the named gradient, low end first.
pub fn lookup(name: &str, shades: usize) -> Result<Vec<Color>> {
    let gradient = gradient(name)?;
    Ok(sample(gradient, shades))
}

pub fn sample(gradient: Gradient, shades: usize) -> Vec<Color> {
    match shades {
        0 => Vec::new(),
        1 => vec![convert(gradient.eval_continuous(0.0))],
        n => (0..n)
            .map(|i| convert(gradient.eval_continuous(i as f64 / (n - 1) as f64)))
            .collect(),
    }
}

/// Table entry for a value already normalized to `[0, 1]`.
pub fn shade(table: &[Color], t: f32) -> Color {
    if table.is_empty() {
        return Color::WHITE;
    }
    let n = table.len();
    let idx = (t.clamp(0.0, 1.0) * n as f32).round() as usize;
    table[idx.min(n - 1)]
}

fn convert(c: colorous::Color) -> Color {
    Color::rgb(c.r as f32 / 255.0, c.g as f32 / 255.0, c.b as f32 / 255.0)
}
