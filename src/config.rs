//! Tunable constants for layout, labels, rendering and gestures.

use crate::core::Color;
use crate::{PlotError, Result};
use error_stack::Report;
use serde::{Deserialize, Serialize};

/// Layout and label constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Longest axis may be at most this multiple of the shortest.
    pub aspect_threshold: f32,
    /// Target tick count handed to the scales.
    pub tick_count: usize,
    /// Label insets are divided by this and by the graph scale factor.
    pub label_offset_divisor: f32,
    /// Billboards are scaled by `1 / (label_size_divisor * scale_factor)`.
    pub label_size_divisor: f32,
    /// Inset of y labels on the side faces.
    pub side_inset: f32,
    /// Inset of x/z labels on the top and bottom faces.
    pub cap_inset: f32,
    pub font_size: f32,
    pub tooltip_font_size: f32,
    /// Device pixel ratio of the viewer window. Text keeps its logical size and
    /// is rasterized at this many physical pixels per logical pixel.
    pub pixel_ratio: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            aspect_threshold: 1.5,
            tick_count: 4,
            label_offset_divisor: 7.0,
            label_size_divisor: 11.0,
            side_inset: 0.4,
            cap_inset: 0.3,
            font_size: 23.0,
            tooltip_font_size: 12.0,
            pixel_ratio: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub face_color: Color,
    pub face_opacity: f32,
    pub grid_color: Color,
    pub label_color: Color,
    pub sphere_radius: f32,
    pub sphere_color: Color,
    pub point_color: Color,
    pub colormap: String,
    pub colormap_shades: usize,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            face_color: Color::hex(0x0074D9),
            face_opacity: 0.3,
            grid_color: Color::WHITE,
            label_color: Color::WHITE,
            sphere_radius: 0.015,
            sphere_color: Color::hex(0xd3d3d3),
            point_color: Color::hex(0x7FDBFF),
            colormap: "viridis".to_string(),
            colormap_shades: 72,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub zoom_in: f32,
    pub zoom_out: f32,
    /// Degrees of rotation for a drag across the full viewport width.
    pub rotate_degrees: f32,
    /// Vertical translation for a drag across the full viewport height.
    pub translate_units: f32,
    /// Height of a point tooltip above its sphere.
    pub tooltip_lift: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            zoom_in: 1.05,
            zoom_out: 0.95,
            rotate_degrees: 100.0,
            translate_units: 1.0,
            tooltip_lift: 0.2,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub layout: LayoutConfig,
    pub style: StyleConfig,
    pub gestures: GestureConfig,
}

impl PlotConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Report::new(PlotError::Config(e.to_string())))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Report::new(PlotError::Config(e.to_string())))
    }

    pub fn with_pixel_ratio(mut self, ratio: f32) -> Self {
        self.layout.pixel_ratio = ratio;
        self
    }
}
