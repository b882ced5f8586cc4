use argraph::prelude::*;
use bevy::prelude::{Mat4, Vec3};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::f32::consts::FRAC_PI_4;

fn scattered() -> Vec<Vec3> {
    vec![
        Vec3::new(-3.2, 0.5, 12.0),
        Vec3::new(7.9, -4.0, 2.5),
        Vec3::new(0.0, 9.5, -1.0),
        Vec3::new(2.2, 1.1, 4.4),
    ]
}

fn y_anchor_count(state: &VisibilityState) -> usize {
    FaceKind::SIDES
        .iter()
        .flat_map(|&k| [AnchorSlot::YLeft, AnchorSlot::YRight].map(|s| state.anchor(k, s)))
        .filter(|s| s.is_visible())
        .count()
}

#[rstest]
#[case(vec![Vec3::ZERO, Vec3::ONE])]
#[case(vec![Vec3::splat(5.0)])]
#[case(scattered())]
#[case(vec![Vec3::new(-100.0, 0.0, 0.0), Vec3::new(100.0, 0.1, 0.2), Vec3::new(3.0, 0.05, 0.1)])]
fn limits_contain_every_point(#[case] points: Vec<Vec3>) {
    let samples = SampleSet::new(&points);
    let [lx, hx, ly, hy, lz, hz] = samples.limits();
    for p in &points {
        assert!(lx <= p.x && p.x <= hx);
        assert!(ly <= p.y && p.y <= hy);
        assert!(lz <= p.z && p.z <= hz);
    }
}

#[test]
fn normalize_spans_unit_interval() {
    let samples = SampleSet::new(&scattered());
    assert_eq!(samples.normalize(-3.2, Axis::X), 0.0);
    assert_eq!(samples.normalize(7.9, Axis::X), 1.0);
    assert_eq!(samples.normalize(-4.0, Axis::Y), 0.0);
    assert_eq!(samples.normalize(12.0, Axis::Z), 1.0);
}

#[rstest]
#[case(scattered())]
#[case(vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(40.0, 1.0, 3.0)])]
#[case(vec![Vec3::new(-0.5, -250.0, 0.0), Vec3::new(0.5, 250.0, 0.9)])]
fn cube_stays_within_aspect_threshold(#[case] points: Vec<Vec3>) {
    let graph = BoundingCube::build(&SampleSet::new(&points));
    let max = graph.deltas.iter().copied().fold(f32::MIN, f32::max);
    let min = graph.deltas.iter().copied().fold(f32::MAX, f32::min);
    assert!(max <= 1.5 * min + 1e-4, "{:?}", graph.deltas);
}

#[test]
fn unit_cube_scenario() {
    let samples = SampleSet::new(&[Vec3::ZERO, Vec3::ONE]);
    assert_eq!(samples.limits(), [0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
    let graph = BoundingCube::build(&samples);
    assert_eq!(graph.deltas, [1.0, 1.0, 1.0]);
    assert_eq!(graph.scale_factor, 0.5);
}

#[test]
fn single_point_scenario() {
    let samples = SampleSet::new(&[Vec3::splat(5.0)]);
    assert_eq!(samples.limits(), [4.0, 6.0, 4.0, 6.0, 4.0, 6.0]);
    assert_eq!(BoundingCube::build(&samples).deltas, [2.0, 2.0, 2.0]);
}

#[test]
fn height_map_scenario() {
    let heights = vec![vec![0.5, 1.5, 2.5], vec![3.0, 4.0, 5.0]];
    let surface = SurfaceSamples::new(&heights).unwrap();
    let points = surface.samples.points();
    assert_eq!(points.len(), 6);
    assert_eq!(points[4], Vec3::new(1.0, 4.0, 1.0));
    let [lx, hx, _, _, lz, hz] = surface.samples.limits();
    assert_eq!([lx, hx, lz, hz], [0.0, 2.0, 0.0, 1.0]);

    let ragged = SurfaceSamples::new(&[vec![1.0, 2.0], vec![1.0]]).unwrap_err();
    assert!(matches!(
        ragged.current_context(),
        PlotError::RaggedHeightMap { row: 1, expected: 2 }
    ));
}

#[test]
fn opposing_twins_share_ticks() {
    let graph = BoundingCube::build(&SampleSet::new(&scattered()));
    for (a, b) in FaceKind::PAIRS {
        let ta = &graph.face(a).anchors.yleft.as_ref().unwrap().ticks;
        let tb = &graph.face(b).anchors.yleft.as_ref().unwrap().ticks;
        assert_eq!(ta, tb);
    }
}

#[test]
fn normalized_points_preserve_order() {
    let points = scattered();
    let graph = BoundingCube::build(&SampleSet::new(&points));
    let out = graph.normalized_points(&points);
    for i in 0..points.len() {
        for j in 0..points.len() {
            assert_eq!(points[i].x < points[j].x, out[i].z < out[j].z);
            assert_eq!(points[i].y < points[j].y, out[i].y < out[j].y);
            assert_eq!(points[i].z < points[j].z, out[i].x < out[j].x);
        }
    }
}

#[rstest]
#[case(Vec3::new(1.5, 1.0, 1.2))]
#[case(Vec3::new(-1.5, 0.4, 1.0))]
#[case(Vec3::new(0.3, -1.8, -0.9))]
#[case(Vec3::new(-0.8, 1.1, -1.6))]
#[case(Vec3::new(2.0, 0.0, 0.1))]
fn every_view_shows_three_faces_and_one_y_axis(#[case] eye: Vec3) {
    let mut graph = BoundingCube::build(&SampleSet::new(&scattered()));
    AxisLabeler::label(&mut graph, &AxisTitles::default(), &LayoutConfig::default());
    let camera = CameraPose::look_at(eye, Vec3::ZERO, FRAC_PI_4, 16.0 / 9.0);
    let state = VisibilitySelector::update(&mut graph, &camera);

    assert_eq!(state.visible_faces(), 3);
    for (a, b) in FaceKind::PAIRS {
        assert_ne!(state.face(a).is_visible(), state.face(b).is_visible());
    }
    assert_eq!(y_anchor_count(&state), 1);

    let cap = if state.face(FaceKind::Top).is_visible() {
        FaceKind::Top
    } else {
        FaceKind::Bottom
    };
    let shown = AnchorSlot::ALL
        .iter()
        .filter(|&&s| state.anchor(cap, s).is_visible())
        .count();
    assert_eq!(shown, 2);
}

#[test]
fn rotating_the_root_moves_the_visible_faces() {
    let mut graph = BoundingCube::build(&SampleSet::new(&[Vec3::ZERO, Vec3::ONE]));
    let camera = CameraPose::new(Vec3::new(0.0, 0.0, 3.0), Mat4::IDENTITY);
    let before = VisibilitySelector::update(&mut graph, &camera);
    assert_eq!(before.face(FaceKind::Back), Shown::Visible);

    graph.root.rotate_y(std::f32::consts::PI);
    let after = VisibilitySelector::update(&mut graph, &camera);
    assert_eq!(after.face(FaceKind::Front), Shown::Visible);
    assert_eq!(after.face(FaceKind::Back), Shown::Hidden);
}

#[test]
fn labels_shrink_as_the_cube_grows() {
    let cfg = LayoutConfig::default();
    let mut small = BoundingCube::build(&SampleSet::new(&[Vec3::ZERO, Vec3::ONE]));
    let mut large = BoundingCube::build(&SampleSet::new(&[Vec3::ZERO, Vec3::splat(10.0)]));
    AxisLabeler::label(&mut small, &AxisTitles::default(), &cfg);
    AxisLabeler::label(&mut large, &AxisTitles::default(), &cfg);
    let first = |g: &DisplayGraph| g.face(FaceKind::Left).anchors.yleft.as_ref().unwrap().labels[0].scale;
    // the root scale shrinks by the same factor the label scale grows
    assert!((first(&large) * large.scale_factor - first(&small) * small.scale_factor).abs() < 1e-6);
}
