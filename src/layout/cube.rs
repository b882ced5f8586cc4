use super::faces::{Face, FaceKind, PlaneSpec, generate_plane};
use super::visibility::VisibilityState;
use crate::config::LayoutConfig;
use crate::core::{Axis, SampleSet};
use crate::scale::LinearScale;
use bevy::prelude::{Quat, Transform, Vec3};
use std::f32::consts::FRAC_PI_2;
use tracing::debug;

/// The built display structure: root placement, per-axis extents and scales,
/// the six faces and the current visibility of faces and anchors.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayGraph {
    /// World placement of the graph root. Starts as the uniform `scale_factor`.
    pub root: Transform,
    /// Display extent per data axis, `[x, y, z]`.
    pub deltas: [f32; 3],
    /// Integer-snapped and rebalanced bounds per data axis.
    pub bounds: [[f32; 2]; 3],
    /// Data -> display maps per data axis, range `[-delta / 2, delta / 2]`.
    pub scales: [LinearScale; 3],
    /// Indexed by [`FaceKind::index`].
    pub faces: [Face; 6],
    pub scale_factor: f32,
    pub visibility: VisibilityState,
}

impl DisplayGraph {
    #[inline]
    pub fn face(&self, kind: FaceKind) -> &Face {
        &self.faces[kind.index()]
    }

    #[inline]
    pub fn face_mut(&mut self, kind: FaceKind) -> &mut Face {
        &mut self.faces[kind.index()]
    }

    #[inline]
    pub fn delta(&self, axis: Axis) -> f32 {
        self.deltas[axis.index()]
    }

    #[inline]
    pub fn scale(&self, axis: Axis) -> &LinearScale {
        &self.scales[axis.index()]
    }

    /// Root-space position of a data point. Data x runs along display z and
    /// data z along display x.
    pub fn normalized_point(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            self.scales[2].apply(p.z),
            self.scales[1].apply(p.y),
            self.scales[0].apply(p.x),
        )
    }

    pub fn normalized_points(&self, points: &[Vec3]) -> Vec<Vec3> {
        points.iter().map(|&p| self.normalized_point(p)).collect()
    }

    pub fn to_world(&self, root_space: Vec3) -> Vec3 {
        self.root.transform_point(root_space)
    }
}

pub struct BoundingCube;

impl BoundingCube {
    pub fn build(samples: &SampleSet) -> DisplayGraph {
        Self::build_with(samples, &LayoutConfig::default())
    }

    pub fn build_with(samples: &SampleSet, cfg: &LayoutConfig) -> DisplayGraph {
        let mut low = [0.0f32; 3];
        let mut high = [0.0f32; 3];
        for axis in Axis::ALL {
            let i = axis.index();
            low[i] = samples.low(axis).floor();
            high[i] = samples.high(axis).ceil();
            if low[i] == high[i] {
                low[i] -= 1.0;
                high[i] += 1.0;
            }
        }

        let mut scales = [LinearScale::default(); 3];
        for i in 0..3 {
            scales[i] = LinearScale::default().domain([low[i], high[i]]);
        }

        // Compress the long axes toward the shortest one. The bound values
        // themselves are multiplied, which is not a recentering.
        let threshold = cfg.aspect_threshold;
        let mut deltas = [high[0] - low[0], high[1] - low[1], high[2] - low[2]];
        let shortest = deltas.iter().copied().fold(f32::INFINITY, f32::min);
        let cap = shortest * threshold;
        for i in 0..3 {
            if deltas[i] > cap {
                let ratio = cap / deltas[i];
                low[i] *= ratio;
                high[i] *= ratio;
                deltas[i] = cap;
            }
        }
        for i in 0..3 {
            deltas[i] = high[i] - low[i];
        }
        let [dx, dy, dz] = deltas;

        let [sx, sy, sz] = scales;
        let [left, right] = generate_plane(&PlaneSpec {
            len_a: dx,
            len_b: dy,
            scale_a: sx,
            scale_b: sy,
            axis_a: Axis::X,
            axis_b: Axis::Y,
            back: (FaceKind::Left, Vec3::new(-dz / 2.0, 0.0, 0.0)),
            front: (FaceKind::Right, Vec3::new(dz / 2.0, 0.0, 0.0)),
            rotation: Quat::from_rotation_y(-FRAC_PI_2),
            top_bottom_anchors: false,
            tick_count: cfg.tick_count,
        });
        let [top, bottom] = generate_plane(&PlaneSpec {
            len_a: dz,
            len_b: dx,
            scale_a: sz,
            scale_b: sx,
            axis_a: Axis::Z,
            axis_b: Axis::X,
            back: (FaceKind::Top, Vec3::new(0.0, dy / 2.0, 0.0)),
            front: (FaceKind::Bottom, Vec3::new(0.0, -dy / 2.0, 0.0)),
            rotation: Quat::from_rotation_x(FRAC_PI_2),
            top_bottom_anchors: true,
            tick_count: cfg.tick_count,
        });
        let [back, front] = generate_plane(&PlaneSpec {
            len_a: dz,
            len_b: dy,
            scale_a: sz,
            scale_b: sy,
            axis_a: Axis::Z,
            axis_b: Axis::Y,
            back: (FaceKind::Back, Vec3::new(0.0, 0.0, -dx / 2.0)),
            front: (FaceKind::Front, Vec3::new(0.0, 0.0, dx / 2.0)),
            rotation: Quat::IDENTITY,
            top_bottom_anchors: false,
            tick_count: cfg.tick_count,
        });

        let longest = deltas.iter().copied().fold(0.0f32, f32::max);
        let divisor = if longest == 0.0 { 1.0 } else { longest };
        let scale_factor = 0.5 / divisor;

        let scales = [
            sx.range([-dx / 2.0, dx / 2.0]),
            sy.range([-dy / 2.0, dy / 2.0]),
            sz.range([-dz / 2.0, dz / 2.0]),
        ];

        debug!(?deltas, scale_factor, "display cube");

        DisplayGraph {
            root: Transform::from_scale(Vec3::splat(scale_factor)),
            deltas,
            bounds: [[low[0], high[0]], [low[1], high[1]], [low[2], high[2]]],
            scales,
            faces: [top, bottom, left, right, front, back],
            scale_factor,
            visibility: VisibilityState::default(),
        }
    }
}
