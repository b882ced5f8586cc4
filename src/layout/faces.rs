use super::labels::Billboard;
use crate::core::Axis;
use crate::scale::LinearScale;
use bevy::prelude::{Quat, Transform, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// The six bounding faces, in the order used by every per-face array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceKind {
    Top,
    Bottom,
    Left,
    Right,
    Front,
    Back,
}

impl FaceKind {
    pub const ALL: [FaceKind; 6] = [
        FaceKind::Top,
        FaceKind::Bottom,
        FaceKind::Left,
        FaceKind::Right,
        FaceKind::Front,
        FaceKind::Back,
    ];

    /// Opposing pairs; the first of each pair wins ties.
    pub const PAIRS: [(FaceKind, FaceKind); 3] = [
        (FaceKind::Top, FaceKind::Bottom),
        (FaceKind::Left, FaceKind::Right),
        (FaceKind::Front, FaceKind::Back),
    ];

    /// Faces whose anchors carry y ticks.
    pub const SIDES: [FaceKind; 4] = [
        FaceKind::Back,
        FaceKind::Front,
        FaceKind::Left,
        FaceKind::Right,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            FaceKind::Top => 0,
            FaceKind::Bottom => 1,
            FaceKind::Left => 2,
            FaceKind::Right => 3,
            FaceKind::Front => 4,
            FaceKind::Back => 5,
        }
    }

    pub fn twin(self) -> FaceKind {
        match self {
            FaceKind::Top => FaceKind::Bottom,
            FaceKind::Bottom => FaceKind::Top,
            FaceKind::Left => FaceKind::Right,
            FaceKind::Right => FaceKind::Left,
            FaceKind::Front => FaceKind::Back,
            FaceKind::Back => FaceKind::Front,
        }
    }
}

/// Named anchor groups on a face. `X*` groups run along the face's first axis,
/// `Y*` groups along its second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorSlot {
    XTop,
    XBottom,
    YLeft,
    YRight,
}

impl AnchorSlot {
    pub const ALL: [AnchorSlot; 4] = [
        AnchorSlot::XTop,
        AnchorSlot::XBottom,
        AnchorSlot::YLeft,
        AnchorSlot::YRight,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            AnchorSlot::XTop => 0,
            AnchorSlot::XBottom => 1,
            AnchorSlot::YLeft => 2,
            AnchorSlot::YRight => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AnchorSlot::XTop => "xtop",
            AnchorSlot::XBottom => "xbottom",
            AnchorSlot::YLeft => "yleft",
            AnchorSlot::YRight => "yright",
        }
    }
}

/// Tick positions along one edge of a face, never rendered themselves.
#[derive(Clone, Debug, PartialEq)]
pub struct AnchorGroup {
    pub slot: AnchorSlot,
    /// Data axis the tick values belong to.
    pub axis: Axis,
    /// Face-local positions, one per tick.
    pub points: Vec<Vec3>,
    pub ticks: Vec<f32>,
    /// Face-local billboards attached by the labeler.
    pub labels: Vec<Billboard>,
}

impl AnchorGroup {
    fn new(slot: AnchorSlot, axis: Axis, ticks: &[f32]) -> Self {
        Self {
            slot,
            axis,
            points: Vec::with_capacity(ticks.len()),
            ticks: ticks.to_vec(),
            labels: Vec::new(),
        }
    }

    pub fn first_point(&self) -> Option<Vec3> {
        self.points.first().copied()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FaceAnchors {
    pub xtop: Option<AnchorGroup>,
    pub xbottom: Option<AnchorGroup>,
    pub yleft: Option<AnchorGroup>,
    pub yright: Option<AnchorGroup>,
}

impl FaceAnchors {
    pub fn get(&self, slot: AnchorSlot) -> Option<&AnchorGroup> {
        match slot {
            AnchorSlot::XTop => self.xtop.as_ref(),
            AnchorSlot::XBottom => self.xbottom.as_ref(),
            AnchorSlot::YLeft => self.yleft.as_ref(),
            AnchorSlot::YRight => self.yright.as_ref(),
        }
    }

    pub fn get_mut(&mut self, slot: AnchorSlot) -> Option<&mut AnchorGroup> {
        match slot {
            AnchorSlot::XTop => self.xtop.as_mut(),
            AnchorSlot::XBottom => self.xbottom.as_mut(),
            AnchorSlot::YLeft => self.yleft.as_mut(),
            AnchorSlot::YRight => self.yright.as_mut(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnchorGroup> {
        AnchorSlot::ALL.into_iter().filter_map(|s| self.get(s))
    }
}

/// One bounding face: a translucent quad, its grid and its anchor groups.
#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    pub kind: FaceKind,
    /// Placement relative to the graph root.
    pub transform: Transform,
    /// Extent along the face-local x and y axes.
    pub size: Vec2,
    /// Face-local grid line segments.
    pub grid: Vec<[Vec3; 2]>,
    pub anchors: FaceAnchors,
}

impl Face {
    /// Root-space position of a face-local point.
    #[inline]
    pub fn to_root(&self, local: Vec3) -> Vec3 {
        self.transform.transform_point(local)
    }

    /// World-space position of a face-local point, given the root placement.
    #[inline]
    pub fn to_world(&self, root: &Transform, local: Vec3) -> Vec3 {
        root.transform_point(self.to_root(local))
    }

    pub fn world_center(&self, root: &Transform) -> Vec3 {
        root.transform_point(self.transform.translation)
    }
}

/// Inputs for one opposing pair of faces.
#[derive(Clone, Copy, Debug)]
pub struct PlaneSpec {
    pub len_a: f32,
    pub len_b: f32,
    pub scale_a: LinearScale,
    pub scale_b: LinearScale,
    pub axis_a: Axis,
    pub axis_b: Axis,
    /// Kind and position of the face built first.
    pub back: (FaceKind, Vec3),
    /// Kind and position of its clone.
    pub front: (FaceKind, Vec3),
    pub rotation: Quat,
    /// Add `xtop`/`xbottom` anchors as well as `yleft`/`yright`.
    pub top_bottom_anchors: bool,
    pub tick_count: usize,
}

/// Build an opposing face pair. The back face is built at its position and the
/// front face is a full copy of it (anchors and tick values included) moved to
/// the front position. Returned as `[back, front]`.
pub fn generate_plane(spec: &PlaneSpec) -> [Face; 2] {
    let (la, lb) = (spec.len_a, spec.len_b);
    let range_a = spec.scale_a.range([-la / 2.0, la / 2.0]);
    let range_b = spec.scale_b.range([-lb / 2.0, lb / 2.0]);

    let ticks_a = range_a.ticks(spec.tick_count);
    let ticks_b = range_b.ticks(spec.tick_count);

    let mut grid = Vec::with_capacity(ticks_a.len() + ticks_b.len());
    let mut xtop = AnchorGroup::new(AnchorSlot::XTop, spec.axis_a, &ticks_a);
    let mut xbottom = AnchorGroup::new(AnchorSlot::XBottom, spec.axis_a, &ticks_a);
    let mut yleft = AnchorGroup::new(AnchorSlot::YLeft, spec.axis_b, &ticks_b);
    let mut yright = AnchorGroup::new(AnchorSlot::YRight, spec.axis_b, &ticks_b);

    for &t in &ticks_a {
        let a = range_a.apply(t);
        let bottom = Vec3::new(a, -lb / 2.0, 0.0);
        let top = Vec3::new(a, lb / 2.0, 0.0);
        grid.push([bottom, top]);
        xtop.points.push(top);
        xbottom.points.push(bottom);
    }
    for &t in &ticks_b {
        let b = range_b.apply(t);
        let left = Vec3::new(-la / 2.0, b, 0.0);
        let right = Vec3::new(la / 2.0, b, 0.0);
        grid.push([left, right]);
        yleft.points.push(left);
        yright.points.push(right);
    }

    let anchors = FaceAnchors {
        xtop: spec.top_bottom_anchors.then_some(xtop),
        xbottom: spec.top_bottom_anchors.then_some(xbottom),
        yleft: Some(yleft),
        yright: Some(yright),
    };

    let back = Face {
        kind: spec.back.0,
        transform: Transform::from_translation(spec.back.1).with_rotation(spec.rotation),
        size: Vec2::new(la, lb),
        grid,
        anchors,
    };

    let mut front = back.clone();
    front.kind = spec.front.0;
    front.transform.translation = spec.front.1;

    [back, front]
}
