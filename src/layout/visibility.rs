use super::cube::DisplayGraph;
use super::faces::{AnchorSlot, Face, FaceKind};
use bevy::prelude::{Mat4, Vec3, Visibility};
use tracing::trace;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Shown {
    #[default]
    Visible,
    Hidden,
}

impl Shown {
    #[inline]
    pub fn from_bool(visible: bool) -> Self {
        if visible { Shown::Visible } else { Shown::Hidden }
    }

    #[inline]
    pub fn is_visible(self) -> bool {
        self == Shown::Visible
    }
}

impl From<Shown> for Visibility {
    fn from(shown: Shown) -> Self {
        match shown {
            Shown::Visible => Visibility::Inherited,
            Shown::Hidden => Visibility::Hidden,
        }
    }
}

/// Visibility of every face and every anchor slot, indexed by
/// [`FaceKind::index`] and [`AnchorSlot::index`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisibilityState {
    pub faces: [Shown; 6],
    pub anchors: [[Shown; 4]; 6],
}

impl VisibilityState {
    #[inline]
    pub fn face(&self, kind: FaceKind) -> Shown {
        self.faces[kind.index()]
    }

    #[inline]
    pub fn anchor(&self, kind: FaceKind, slot: AnchorSlot) -> Shown {
        self.anchors[kind.index()][slot.index()]
    }

    pub fn visible_faces(&self) -> usize {
        self.faces.iter().filter(|s| s.is_visible()).count()
    }
}

/// What the selector needs from a camera.
pub trait ViewCamera {
    fn position(&self) -> Vec3;
    /// Normalized device coordinates of a world-space point.
    fn project(&self, world: Vec3) -> Vec3;
}

/// A camera as a world position plus a clip-from-world matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub clip_from_world: Mat4,
}

impl CameraPose {
    pub fn new(position: Vec3, clip_from_world: Mat4) -> Self {
        Self {
            position,
            clip_from_world,
        }
    }

    /// Perspective camera at `eye` looking at `target` with +Y up.
    pub fn look_at(eye: Vec3, target: Vec3, fov_y: f32, aspect: f32) -> Self {
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let proj = Mat4::perspective_rh(fov_y, aspect, 0.01, 1000.0);
        Self::new(eye, proj * view)
    }
}

impl ViewCamera for CameraPose {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn project(&self, world: Vec3) -> Vec3 {
        self.clip_from_world.project_point3(world)
    }
}

pub struct VisibilitySelector;

impl VisibilitySelector {
    /// Recompute face and anchor visibility from scratch and store it on the graph.
    pub fn update(graph: &mut DisplayGraph, camera: &impl ViewCamera) -> VisibilityState {
        let state = Self::compute(graph, camera);
        graph.visibility = state;
        state
    }

    pub fn compute(graph: &DisplayGraph, camera: &impl ViewCamera) -> VisibilityState {
        let faces = Self::hide_plane(graph, camera);
        let anchors = Self::hide_axis(graph, camera, &faces);
        VisibilityState { faces, anchors }
    }

    /// In each opposing pair the face farther from the camera stays visible and
    /// the nearer one is hidden. Ties keep the first face of the pair.
    pub fn hide_plane(graph: &DisplayGraph, camera: &impl ViewCamera) -> [Shown; 6] {
        let eye = camera.position();
        let mut out = [Shown::Hidden; 6];
        for (a, b) in FaceKind::PAIRS {
            let da = eye.distance(graph.face(a).world_center(&graph.root));
            let db = eye.distance(graph.face(b).world_center(&graph.root));
            let first = da >= db;
            out[a.index()] = Shown::from_bool(first);
            out[b.index()] = Shown::from_bool(!first);
        }
        trace!(?out, "face visibility");
        out
    }

    /// Anchor visibility given the face visibility:
    /// - on the visible top/bottom face, the farther of `xtop`/`xbottom` and the
    ///   farther of `yleft`/`yright` are shown;
    /// - over the y anchors of the side faces, only the one whose first tick is
    ///   leftmost on screen is shown.
    ///
    /// Every other slot, and every slot of a hidden face, is hidden.
    pub fn hide_axis(
        graph: &DisplayGraph,
        camera: &impl ViewCamera,
        faces: &[Shown; 6],
    ) -> [[Shown; 4]; 6] {
        let mut out = [[Shown::Hidden; 4]; 6];

        let cap = [FaceKind::Top, FaceKind::Bottom]
            .into_iter()
            .find(|k| faces[k.index()].is_visible());
        if let Some(kind) = cap {
            let face = graph.face(kind);
            for (a, b) in [
                (AnchorSlot::XTop, AnchorSlot::XBottom),
                (AnchorSlot::YLeft, AnchorSlot::YRight),
            ] {
                let row = &mut out[kind.index()];
                match (
                    first_world(graph, face, a),
                    first_world(graph, face, b),
                ) {
                    (Some(pa), Some(pb)) => {
                        let eye = camera.position();
                        let first = eye.distance(pa) >= eye.distance(pb);
                        row[a.index()] = Shown::from_bool(first);
                        row[b.index()] = Shown::from_bool(!first);
                    }
                    (Some(_), None) => row[a.index()] = Shown::Visible,
                    (None, Some(_)) => row[b.index()] = Shown::Visible,
                    (None, None) => trace!(?kind, "no anchor pair to toggle"),
                }
            }
        }

        let visible_sides: Vec<FaceKind> = FaceKind::SIDES
            .into_iter()
            .filter(|k| faces[k.index()].is_visible())
            .collect();
        let sides: &[FaceKind] = if visible_sides.is_empty() {
            &FaceKind::SIDES
        } else {
            &visible_sides
        };

        let mut best: Option<(FaceKind, AnchorSlot, f32)> = None;
        for &kind in sides {
            let face = graph.face(kind);
            for slot in [AnchorSlot::YLeft, AnchorSlot::YRight] {
                let Some(world) = first_world(graph, face, slot) else {
                    continue;
                };
                let x = camera.project(world).x;
                if !x.is_finite() {
                    continue;
                }
                if best.is_none_or(|(_, _, bx)| x < bx) {
                    best = Some((kind, slot, x));
                }
            }
        }
        if let Some((kind, slot, _)) = best {
            out[kind.index()][slot.index()] = Shown::Visible;
        }

        out
    }
}

fn first_world(graph: &DisplayGraph, face: &Face, slot: AnchorSlot) -> Option<Vec3> {
    let local = face.anchors.get(slot)?.first_point()?;
    Some(face.to_world(&graph.root, local))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SampleSet;
    use crate::layout::BoundingCube;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::f32::consts::FRAC_PI_4;

    fn graph() -> DisplayGraph {
        BoundingCube::build(&SampleSet::new(&[Vec3::ZERO, Vec3::new(2.0, 3.0, 4.0)]))
    }

    fn camera(eye: Vec3) -> CameraPose {
        CameraPose::look_at(eye, Vec3::ZERO, FRAC_PI_4, 1.0)
    }

    fn y_anchor_visible_count(state: &VisibilityState) -> usize {
        FaceKind::SIDES
            .iter()
            .flat_map(|&k| [AnchorSlot::YLeft, AnchorSlot::YRight].map(|s| state.anchor(k, s)))
            .filter(|s| s.is_visible())
            .count()
    }

    #[test]
    fn camera_above_hides_top() {
        let g = graph();
        let faces = VisibilitySelector::hide_plane(&g, &camera(Vec3::new(0.2, 5.0, 0.3)));
        assert_eq!(faces[FaceKind::Top.index()], Shown::Hidden);
        assert_eq!(faces[FaceKind::Bottom.index()], Shown::Visible);
    }

    #[test]
    fn ties_keep_first_of_pair() {
        let g = graph();
        // equidistant from every face centre
        let faces = VisibilitySelector::hide_plane(&g, &CameraPose::new(Vec3::ZERO, Mat4::IDENTITY));
        assert_eq!(faces[FaceKind::Top.index()], Shown::Visible);
        assert_eq!(faces[FaceKind::Left.index()], Shown::Visible);
        assert_eq!(faces[FaceKind::Front.index()], Shown::Visible);
    }

    #[rstest]
    #[case(Vec3::new(3.0, 2.0, 1.0))]
    #[case(Vec3::new(-3.0, -2.0, 1.5))]
    #[case(Vec3::new(0.5, 4.0, -3.0))]
    #[case(Vec3::new(-2.0, 0.3, -2.5))]
    fn exactly_one_face_per_pair(#[case] eye: Vec3) {
        let mut g = graph();
        let state = VisibilitySelector::update(&mut g, &camera(eye));
        assert_eq!(g.visibility, state);
        assert_eq!(state.visible_faces(), 3);
        for (a, b) in FaceKind::PAIRS {
            assert_ne!(state.face(a), state.face(b));
        }
    }

    #[rstest]
    #[case(Vec3::new(3.0, 2.0, 1.0))]
    #[case(Vec3::new(-3.0, -2.0, 1.5))]
    #[case(Vec3::new(0.5, 4.0, -3.0))]
    #[case(Vec3::new(-2.0, 0.3, -2.5))]
    fn exactly_one_y_anchor(#[case] eye: Vec3) {
        let g = graph();
        let state = VisibilitySelector::compute(&g, &camera(eye));
        assert_eq!(y_anchor_visible_count(&state), 1);
    }

    #[test]
    fn chosen_y_anchor_is_leftmost_on_screen() {
        let g = graph();
        let cam = camera(Vec3::new(2.0, 1.0, 3.0));
        let state = VisibilitySelector::compute(&g, &cam);
        let (kind, slot) = FaceKind::SIDES
            .iter()
            .flat_map(|&k| [AnchorSlot::YLeft, AnchorSlot::YRight].map(move |s| (k, s)))
            .find(|&(k, s)| state.anchor(k, s).is_visible())
            .unwrap();
        assert!(state.face(kind).is_visible());
        let x = cam.project(first_world(&g, g.face(kind), slot).unwrap()).x;
        for &k in &FaceKind::SIDES {
            if !state.face(k).is_visible() {
                continue;
            }
            for s in [AnchorSlot::YLeft, AnchorSlot::YRight] {
                let other = cam.project(first_world(&g, g.face(k), s).unwrap()).x;
                assert!(x <= other);
            }
        }
    }

    #[test]
    fn cap_anchors_show_the_farther_twin() {
        let g = graph();
        let cam = camera(Vec3::new(1.0, 3.0, 2.0));
        let state = VisibilitySelector::compute(&g, &cam);
        assert_eq!(state.face(FaceKind::Bottom), Shown::Visible);
        let bottom = g.face(FaceKind::Bottom);
        for (a, b) in [
            (AnchorSlot::XTop, AnchorSlot::XBottom),
            (AnchorSlot::YLeft, AnchorSlot::YRight),
        ] {
            assert_ne!(state.anchor(FaceKind::Bottom, a), state.anchor(FaceKind::Bottom, b));
            let shown = if state.anchor(FaceKind::Bottom, a).is_visible() { a } else { b };
            let hidden = if shown == a { b } else { a };
            let ds = cam.position.distance(first_world(&g, bottom, shown).unwrap());
            let dh = cam.position.distance(first_world(&g, bottom, hidden).unwrap());
            assert!(ds >= dh);
        }
        for slot in AnchorSlot::ALL {
            assert_eq!(state.anchor(FaceKind::Top, slot), Shown::Hidden);
        }
    }

    #[test]
    fn missing_cap_anchor_is_skipped() {
        let mut g = graph();
        g.face_mut(FaceKind::Bottom).anchors.xtop = None;
        let cam = camera(Vec3::new(1.0, 3.0, 2.0));
        let state = VisibilitySelector::compute(&g, &cam);
        assert_eq!(state.anchor(FaceKind::Bottom, AnchorSlot::XTop), Shown::Hidden);
        assert_eq!(state.anchor(FaceKind::Bottom, AnchorSlot::XBottom), Shown::Visible);
    }

    #[test]
    fn follows_root_transform() {
        let mut g = graph();
        let eye = Vec3::new(0.2, 5.0, 0.3);
        assert_eq!(
            VisibilitySelector::compute(&g, &camera(eye)).face(FaceKind::Top),
            Shown::Hidden
        );
        // flipped upside down, the top face now sits below the camera
        g.root.rotate_x(std::f32::consts::PI);
        assert_eq!(
            VisibilitySelector::compute(&g, &camera(eye)).face(FaceKind::Top),
            Shown::Visible
        );
    }
}
