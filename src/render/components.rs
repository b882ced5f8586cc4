use super::resources::PickRes;
use crate::layout::{AnchorSlot, DisplayGraph, FaceKind};
use bevy::ecs::lifecycle::HookContext;
use bevy::ecs::world::DeferredWorld;
use bevy::prelude::*;

/// Root of one injected plot. Its `Transform` is the graph root placement.
#[derive(Component)]
pub struct PlotRoot;

/// Layout state of a plot, kept on the root entity.
#[derive(Component, Clone, Debug)]
pub struct PlotGraph(pub DisplayGraph);

#[derive(Component, Clone, Copy, Debug)]
pub struct FaceNode {
    pub root: Entity,
    pub kind: FaceKind,
}

#[derive(Component, Clone, Copy, Debug)]
pub struct AnchorNode {
    pub root: Entity,
    pub face: FaceKind,
    pub slot: AnchorSlot,
}

/// World-space position of a label whose text is drawn by a UI node. The text
/// is a top-level UI entity and goes away with this node.
#[derive(Component, Clone, Copy, Debug)]
#[component(on_remove = despawn_billboard_text)]
pub struct BillboardNode {
    pub text: Entity,
}

/// Marker for the screen-space text of a [`BillboardNode`]
#[derive(Component)]
pub struct BillboardText;

/// A pickable sample sphere.
#[derive(Component, Clone, Copy, Debug)]
#[component(on_remove = forget_data_point)]
pub struct DataPoint {
    pub root: Entity,
    pub original: Vec3,
    /// Root-space radius.
    pub radius: f32,
}

/// Tooltip billboard shown over a picked [`DataPoint`].
#[derive(Component, Clone, Copy, Debug)]
#[component(on_remove = forget_tooltip)]
pub struct PointTooltip {
    pub point: Entity,
}

fn despawn_billboard_text(mut world: DeferredWorld<'_>, context: HookContext) {
    let Some(text) = world.get::<BillboardNode>(context.entity).map(|b| b.text) else {
        return;
    };
    world.commands().entity(text).try_despawn();
}

fn forget_data_point(mut world: DeferredWorld<'_>, context: HookContext) {
    let point = context.entity;
    let tooltip = {
        let Some(mut pick) = world.get_resource_mut::<PickRes>() else {
            return;
        };
        if pick.state.selected == Some(point) {
            pick.state.selected = None;
        }
        pick.tooltips.remove(&point)
    };
    if let Some(tooltip) = tooltip {
        world.commands().entity(tooltip).try_despawn();
    }
}

fn forget_tooltip(mut world: DeferredWorld<'_>, context: HookContext) {
    let Some(point) = world.get::<PointTooltip>(context.entity).map(|t| t.point) else {
        return;
    };
    let Some(mut pick) = world.get_resource_mut::<PickRes>() else {
        return;
    };
    if pick.tooltips.get(&point) == Some(&context.entity) {
        pick.tooltips.remove(&point);
        if pick.state.selected == Some(point) {
            pick.state.selected = None;
        }
    }
}

/// Camera whose view drives face and anchor visibility.
#[derive(Component)]
pub struct PlotCamera;
