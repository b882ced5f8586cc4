//! Pointer picking and touch/drag gestures, independent of any input backend.

use crate::config::GestureConfig;
use bevy::prelude::{Transform, Vec2, Vec3};
use tracing::trace;

/// Index of the sphere nearest to `origin` hit by the ray, if any.
pub fn pick_point(origin: Vec3, direction: Vec3, centers: &[Vec3], radius: f32) -> Option<usize> {
    let dir = direction.normalize_or_zero();
    if dir == Vec3::ZERO {
        return None;
    }
    let r2 = radius * radius;
    let mut best: Option<(usize, f32)> = None;
    for (i, &c) in centers.iter().enumerate() {
        let oc = origin - c;
        let b = oc.dot(dir);
        let disc = b * b - (oc.length_squared() - r2);
        if disc < 0.0 {
            continue;
        }
        let sq = disc.sqrt();
        let t = if -b - sq >= 0.0 { -b - sq } else { -b + sq };
        if t < 0.0 {
            continue;
        }
        if best.is_none_or(|(_, bt)| t < bt) {
            best = Some((i, t));
        }
    }
    best.map(|(i, _)| i)
}

pub fn tooltip_text(p: Vec3) -> String {
    format!("x:{}, y:{}, z:{}", p.x, p.y, p.z)
}

/// Where a point's tooltip sits, in the same space as `position`.
pub fn tooltip_anchor(position: Vec3, cfg: &GestureConfig) -> Vec3 {
    position + Vec3::Y * cfg.tooltip_lift
}

/// Tooltips to hide and show after a pick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PickTransition<T> {
    pub hide: Option<T>,
    pub show: Option<T>,
}

impl<T> Default for PickTransition<T> {
    fn default() -> Self {
        Self { hide: None, show: None }
    }
}

/// The currently labelled point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PickState<T> {
    pub selected: Option<T>,
}

impl<T> Default for PickState<T> {
    fn default() -> Self {
        Self { selected: None }
    }
}

impl<T: Copy + PartialEq> PickState<T> {
    /// Any pick hides the current tooltip. A new point gets shown; picking the
    /// labelled point again only clears the selection, so taps toggle it.
    pub fn pick(&mut self, hit: Option<T>) -> PickTransition<T> {
        let prev = self.selected;
        let show = if prev.is_some() && prev == hit { None } else { hit };
        self.selected = show;
        PickTransition { hide: prev, show }
    }
}

/// Transform change produced by one gesture step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureDelta {
    /// Radians about the local Y axis.
    pub rotate_y: f32,
    pub translate_y: f32,
    pub scale: f32,
}

impl Default for GestureDelta {
    fn default() -> Self {
        Self {
            rotate_y: 0.0,
            translate_y: 0.0,
            scale: 1.0,
        }
    }
}

impl GestureDelta {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, transform: &mut Transform) {
        if self.rotate_y != 0.0 {
            transform.rotate_local_y(self.rotate_y);
        }
        transform.translation.y += self.translate_y;
        transform.scale *= self.scale;
    }
}

/// One-finger drag rotates and lifts, two-finger pinch zooms.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureState {
    prev_pos: Option<Vec2>,
    prev_spread: Option<f32>,
}

impl GestureState {
    pub fn touch_start(&mut self, touches: &[Vec2]) {
        match touches {
            [p] => {
                self.prev_pos = Some(*p);
                self.prev_spread = None;
            }
            _ => {
                self.prev_pos = None;
                self.prev_spread = None;
            }
        }
    }

    pub fn touch_end(&mut self) {
        *self = Self::default();
    }

    pub fn touch_move(&mut self, touches: &[Vec2], viewport: Vec2, cfg: &GestureConfig) -> GestureDelta {
        match touches {
            [p] => {
                let Some(prev) = self.prev_pos.replace(*p) else {
                    return GestureDelta::default();
                };
                let d = *p - prev;
                let width = viewport.x.max(1.0);
                let height = viewport.y.max(1.0);
                GestureDelta {
                    rotate_y: d.x.signum() * cfg.rotate_degrees.to_radians() * d.x.abs() / width,
                    // screen y grows downward
                    translate_y: -d.y / height * cfg.translate_units,
                    scale: 1.0,
                }
            }
            [a, b] => {
                let spread = a.distance_squared(*b);
                let prev = self.prev_spread.replace(spread);
                self.prev_pos = None;
                let scale = match prev {
                    Some(prev) if spread > prev => cfg.zoom_in,
                    Some(prev) if spread < prev => cfg.zoom_out,
                    _ => 1.0,
                };
                trace!(spread, scale, "pinch");
                GestureDelta {
                    scale,
                    ..GestureDelta::default()
                }
            }
            _ => GestureDelta::default(),
        }
    }
}
