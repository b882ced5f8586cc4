use super::cube::DisplayGraph;
use super::faces::{AnchorGroup, AnchorSlot, FaceKind};
use crate::config::LayoutConfig;
use crate::core::Axis;
use crate::scale::format_tick;
use bevy::prelude::Vec3;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A camera-facing text label.
#[derive(Clone, Debug, PartialEq)]
pub struct Billboard {
    pub text: String,
    /// Position in the space of the node it is attached to.
    pub position: Vec3,
    /// Uniform local scale.
    pub scale: f32,
    pub font_size: f32,
    pub depth_test: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelParams {
    pub font_size: f32,
    pub scale_factor: f32,
    pub depth_test: bool,
}

impl LabelParams {
    pub fn axis(cfg: &LayoutConfig, scale_factor: f32) -> Self {
        Self {
            font_size: cfg.font_size,
            scale_factor,
            depth_test: true,
        }
    }

    pub fn tooltip(cfg: &LayoutConfig, scale_factor: f32) -> Self {
        Self {
            font_size: cfg.tooltip_font_size,
            scale_factor,
            depth_test: false,
        }
    }
}

/// Billboard at the origin, sized inversely to the graph scale factor so its
/// on-screen size does not depend on the plotted extent.
pub fn make_label(text: impl Into<String>, params: LabelParams, cfg: &LayoutConfig) -> Billboard {
    Billboard {
        text: text.into(),
        position: Vec3::ZERO,
        scale: 1.0 / (cfg.label_size_divisor * params.scale_factor),
        font_size: params.font_size,
        depth_test: params.depth_test,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisTitles {
    pub x: String,
    pub y: String,
    pub z: String,
}

impl Default for AxisTitles {
    fn default() -> Self {
        Self {
            x: "x".to_string(),
            y: "y".to_string(),
            z: "z".to_string(),
        }
    }
}

impl AxisTitles {
    pub fn for_axis(&self, axis: Axis) -> &str {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

pub struct AxisLabeler;

impl AxisLabeler {
    /// Label every anchor group of the graph. Existing labels are replaced.
    pub fn label(graph: &mut DisplayGraph, titles: &AxisTitles, cfg: &LayoutConfig) {
        let sf = graph.scale_factor;
        Self::add_y_axis(graph, &FaceKind::SIDES, sf, &titles.y, cfg);
        Self::add_xz_axis(graph, [FaceKind::Top, FaceKind::Bottom], sf, titles, cfg);
    }

    /// Tick labels and a title for `yleft`/`yright` on each side face, pushed
    /// out along the face-local x axis.
    pub fn add_y_axis(
        graph: &mut DisplayGraph,
        faces: &[FaceKind],
        scale_factor: f32,
        title: &str,
        cfg: &LayoutConfig,
    ) {
        let invert = 1.0 / cfg.label_offset_divisor / scale_factor;
        let params = LabelParams::axis(cfg, scale_factor);
        for &kind in faces {
            let face = graph.face_mut(kind);
            for (slot, sign) in [(AnchorSlot::YLeft, -1.0), (AnchorSlot::YRight, 1.0)] {
                let inset = Vec3::new(sign * cfg.side_inset, 0.0, 0.0) * invert;
                match face.anchors.get_mut(slot) {
                    Some(group) => attach(group, inset, title, params, cfg),
                    None => trace!(?kind, slot = slot.name(), "no anchor group to label"),
                }
            }
        }
    }

    /// Tick labels and titles for all four anchor groups of the top and bottom
    /// faces. The first face pushes its labels toward negative face-local z and
    /// the second toward positive z, so each set sits outside its own face.
    /// Titles follow the data axis each group carries.
    pub fn add_xz_axis(
        graph: &mut DisplayGraph,
        faces: [FaceKind; 2],
        scale_factor: f32,
        titles: &AxisTitles,
        cfg: &LayoutConfig,
    ) {
        let invert = 1.0 / cfg.label_offset_divisor / scale_factor;
        let params = LabelParams::axis(cfg, scale_factor);
        let c = cfg.cap_inset;
        for (kind, direction) in faces.into_iter().zip([-1.0, 1.0]) {
            let face = graph.face_mut(kind);
            let insets = [
                (AnchorSlot::XTop, Vec3::new(0.0, c, c * direction)),
                (AnchorSlot::XBottom, Vec3::new(0.0, -c, c * direction)),
                (AnchorSlot::YLeft, Vec3::new(-c, 0.0, c * direction)),
                (AnchorSlot::YRight, Vec3::new(c, 0.0, c * direction)),
            ];
            for (slot, offset) in insets {
                match face.anchors.get_mut(slot) {
                    Some(group) => {
                        // Display x runs along data z, so on the caps `xtop` and
                        // `xbottom` carry the z title and `yleft`/`yright` the x title.
                        let title = titles.for_axis(group.axis).to_string();
                        attach(group, offset * invert, &title, params, cfg);
                    }
                    None => trace!(?kind, slot = slot.name(), "no anchor group to label"),
                }
            }
        }
    }
}

/// One label per tick at `point + inset`, then the title at the mean label
/// position pushed out by the inset once more.
fn attach(group: &mut AnchorGroup, inset: Vec3, title: &str, params: LabelParams, cfg: &LayoutConfig) {
    group.labels.clear();
    if group.points.is_empty() {
        return;
    }

    let mut sum = Vec3::ZERO;
    for (point, tick) in group.points.iter().zip(&group.ticks) {
        let mut label = make_label(format_tick(*tick), params, cfg);
        label.position = *point + inset;
        sum += label.position;
        group.labels.push(label);
    }

    let mut heading = make_label(title, params, cfg);
    heading.position = sum / group.points.len() as f32 + inset;
    group.labels.push(heading);
}
