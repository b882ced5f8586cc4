use super::components::*;
use super::resources::{GestureRes, PickRes, PlotSettings};
use super::spawn::spawn_billboard;
use crate::interaction::{GestureDelta, pick_point, tooltip_anchor, tooltip_text};
use crate::layout::{CameraPose, LabelParams, VisibilitySelector, VisibilityState, make_label};
use bevy::input::mouse::MouseWheel;
use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use std::collections::HashMap;
use tracing::trace;

/// View of a Bevy camera as seen by the visibility selector.
pub fn camera_pose(camera: &Camera, transform: &GlobalTransform) -> CameraPose {
    let world_from_view = Mat4::from(transform.affine());
    CameraPose::new(transform.translation(), camera.clip_from_view() * world_from_view.inverse())
}

/// Pointer positions this frame: active touches, else the cursor while the left
/// button is held.
fn pointer_positions(touches: &Touches, mouse: &ButtonInput<MouseButton>, window: &Window) -> Vec<Vec2> {
    let touch: Vec<Vec2> = touches.iter().map(|t| t.position()).collect();
    if !touch.is_empty() {
        return touch;
    }
    match window.cursor_position() {
        Some(p) if mouse.pressed(MouseButton::Left) => vec![p],
        _ => Vec::new(),
    }
}

/// Drag to rotate and lift, pinch or wheel to zoom. Applies to every plot root.
pub fn handle_gestures(
    touches: Res<Touches>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut wheel: MessageReader<MouseWheel>,
    settings: Res<PlotSettings>,
    mut gestures: ResMut<GestureRes>,
    mut roots: Query<&mut Transform, With<PlotRoot>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let cfg = &settings.0.gestures;

    let pointers = pointer_positions(&touches, &mouse, window);
    let mut delta = GestureDelta::default();
    if pointers.len() != gestures.touch_count {
        gestures.touch_count = pointers.len();
        if pointers.is_empty() {
            gestures.state.touch_end();
        } else {
            gestures.state.touch_start(&pointers);
        }
    } else if !pointers.is_empty() {
        let viewport = Vec2::new(window.width(), window.height());
        delta = gestures.state.touch_move(&pointers, viewport, cfg);
    }

    for event in wheel.read() {
        if event.y > 0.0 {
            delta.scale *= cfg.zoom_in;
        } else if event.y < 0.0 {
            delta.scale *= cfg.zoom_out;
        }
    }

    if delta.is_identity() {
        return;
    }
    for mut transform in roots.iter_mut() {
        delta.apply(&mut transform);
    }
}

/// Tap or click a sphere to show its coordinates. Tapping elsewhere clears
/// the tooltip.
pub fn pick_points(
    mut commands: Commands,
    touches: Res<Touches>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<PlotCamera>>,
    points: Query<(Entity, &DataPoint, &Transform, &GlobalTransform)>,
    graphs: Query<&PlotGraph>,
    mut tooltips: Query<&mut Visibility, With<PointTooltip>>,
    settings: Res<PlotSettings>,
    mut pick: ResMut<PickRes>,
) {
    let tap = if mouse.just_pressed(MouseButton::Left) {
        windows.single().ok().and_then(Window::cursor_position)
    } else if touches.iter().count() == 1 {
        touches.iter_just_pressed().next().map(|t| t.position())
    } else {
        None
    };
    let Some(cursor) = tap else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        return;
    };

    let candidates: Vec<(Entity, Vec3)> = points
        .iter()
        .map(|(entity, _, _, global)| (entity, global.translation()))
        .collect();
    let radius = points
        .iter()
        .next()
        .map(|(_, point, _, global)| point.radius * global.scale().x)
        .unwrap_or(0.0);
    let centers: Vec<Vec3> = candidates.iter().map(|(_, c)| *c).collect();
    let hit = pick_point(ray.origin, *ray.direction, &centers, radius).map(|i| candidates[i].0);

    let change = pick.state.pick(hit);
    trace!(?change, "pick");

    if let Some(hidden) = change.hide.and_then(|p| pick.tooltips.get(&p).copied()) {
        if let Ok(mut visibility) = tooltips.get_mut(hidden) {
            *visibility = Visibility::Hidden;
        }
    }

    let Some(shown) = change.show else {
        return;
    };
    if let Some(&tooltip) = pick.tooltips.get(&shown) {
        if let Ok(mut visibility) = tooltips.get_mut(tooltip) {
            *visibility = Visibility::Inherited;
        }
        return;
    }

    let Ok((_, point, transform, _)) = points.get(shown) else {
        return;
    };
    let Ok(graph) = graphs.get(point.root) else {
        return;
    };
    let cfg = &settings.0;
    let mut label = make_label(
        tooltip_text(point.original),
        LabelParams::tooltip(&cfg.layout, graph.0.scale_factor),
        &cfg.layout,
    );
    label.position = tooltip_anchor(transform.translation, &cfg.gestures);
    let tooltip = spawn_billboard(&mut commands, point.root, &label, cfg.style.label_color.into());
    commands.entity(tooltip).insert(PointTooltip { point: shown });
    pick.tooltips.insert(shown, tooltip);
}

/// Re-run face and anchor selection against the plot camera and push the
/// result onto the scene.
pub fn update_axis_visibility(
    cameras: Query<(&Camera, &GlobalTransform), With<PlotCamera>>,
    mut roots: Query<(Entity, &GlobalTransform, &mut PlotGraph), With<PlotRoot>>,
    mut faces: Query<(&FaceNode, &mut Visibility), Without<AnchorNode>>,
    mut anchors: Query<(&AnchorNode, &mut Visibility), Without<FaceNode>>,
) {
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let pose = camera_pose(camera, camera_transform);

    let mut states: HashMap<Entity, VisibilityState> = HashMap::new();
    for (entity, global, mut graph) in roots.iter_mut() {
        graph.0.root = global.compute_transform();
        states.insert(entity, VisibilitySelector::update(&mut graph.0, &pose));
    }

    for (node, mut visibility) in faces.iter_mut() {
        if let Some(state) = states.get(&node.root) {
            visibility.set_if_neq(state.face(node.kind).into());
        }
    }
    for (node, mut visibility) in anchors.iter_mut() {
        if let Some(state) = states.get(&node.root) {
            visibility.set_if_neq(state.anchor(node.face, node.slot).into());
        }
    }
}

/// Move each billboard's text to the screen position of its scene node.
pub fn place_billboards(
    cameras: Query<(&Camera, &GlobalTransform), With<PlotCamera>>,
    nodes: Query<(&BillboardNode, &GlobalTransform, &InheritedVisibility)>,
    mut texts: Query<(&mut Node, &mut Visibility), With<BillboardText>>,
) {
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    for (billboard, global, inherited) in nodes.iter() {
        let Ok((mut node, mut visibility)) = texts.get_mut(billboard.text) else {
            continue;
        };
        let screen = inherited
            .get()
            .then(|| camera.world_to_viewport(camera_transform, global.translation()).ok())
            .flatten();
        match screen {
            Some(pos) => {
                node.left = Val::Px(pos.x);
                node.top = Val::Px(pos.y);
                visibility.set_if_neq(Visibility::Inherited);
            }
            None => {
                visibility.set_if_neq(Visibility::Hidden);
            }
        }
    }
}
