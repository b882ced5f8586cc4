//! Turning a laid-out graph and its content into entities.

use super::components::*;
use super::resources::PlotMaterials;
use crate::Result;
use crate::colormap::lookup;
use crate::config::PlotConfig;
use crate::core::PlotContent;
use crate::layout::{AxisLabeler, AxisTitles, Billboard, BoundingCube, DisplayGraph};
use crate::mesh::{
    face_quad_mesh, function_geometry, grid_lines_mesh, point_cloud_mesh, sphere_points, sphere_radius,
    surface_geometry,
};
use bevy::prelude::*;
use tracing::debug;

/// Lay out `content`, label the axes and spawn everything under a new root.
pub fn spawn_plot(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &PlotMaterials,
    content: &PlotContent,
    titles: &AxisTitles,
    config: &PlotConfig,
) -> Result<Entity> {
    // Fail before anything is spawned.
    let colors = match content {
        PlotContent::Surface(_) | PlotContent::Function(_) => {
            lookup(&config.style.colormap, config.style.colormap_shades)?
        }
        _ => Vec::new(),
    };

    let mut graph = BoundingCube::build_with(content.samples(), &config.layout);
    AxisLabeler::label(&mut graph, titles, &config.layout);

    let root = graph.inject_into(commands, meshes, materials, config);
    let geometry = match content {
        PlotContent::Spheres(samples) => {
            let radius = sphere_radius(&graph, &config.style);
            let mesh = meshes.add(Sphere::new(radius));
            for sp in sphere_points(&graph, samples) {
                let point = commands
                    .spawn((
                        DataPoint {
                            root,
                            original: sp.original,
                            radius,
                        },
                        Mesh3d(mesh.clone()),
                        MeshMaterial3d(materials.sphere.clone()),
                        Transform::from_translation(sp.position),
                    ))
                    .id();
                commands.entity(root).add_child(point);
            }
            None
        }
        PlotContent::Points(samples) => Some((point_cloud_mesh(&graph, samples), materials.points.clone())),
        PlotContent::Surface(surface) => Some((
            surface_geometry(&graph, surface, &colors).into_mesh(),
            materials.surface.clone(),
        )),
        PlotContent::Function(function) => Some((
            function_geometry(&graph, function, &colors).into_mesh(),
            materials.surface.clone(),
        )),
    };

    if let Some((mesh, material)) = geometry {
        let entity = commands
            .spawn((Mesh3d(meshes.add(mesh)), MeshMaterial3d(material), Transform::IDENTITY))
            .id();
        commands.entity(root).add_child(entity);
    }

    Ok(root)
}

impl DisplayGraph {
    /// Spawn the root, the six faces with their quad and grid, the anchor
    /// groups and their labels. The returned root carries a copy of the graph.
    pub fn inject_into(
        &self,
        commands: &mut Commands,
        meshes: &mut Assets<Mesh>,
        materials: &PlotMaterials,
        config: &PlotConfig,
    ) -> Entity {
        let root = commands
            .spawn((PlotRoot, PlotGraph(self.clone()), self.root, Visibility::default()))
            .id();
        let label_color: Color = config.style.label_color.into();

        for face in &self.faces {
            let face_entity = commands
                .spawn((
                    FaceNode {
                        root,
                        kind: face.kind,
                    },
                    face.transform,
                    Visibility::from(self.visibility.face(face.kind)),
                ))
                .id();
            commands.entity(root).add_child(face_entity);

            let quad = commands
                .spawn((
                    Mesh3d(meshes.add(face_quad_mesh(face))),
                    MeshMaterial3d(materials.face.clone()),
                    Transform::IDENTITY,
                ))
                .id();
            let grid = commands
                .spawn((
                    Mesh3d(meshes.add(grid_lines_mesh(face))),
                    MeshMaterial3d(materials.grid.clone()),
                    Transform::IDENTITY,
                ))
                .id();
            commands.entity(face_entity).add_children(&[quad, grid]);

            for group in face.anchors.iter() {
                let anchor = commands
                    .spawn((
                        AnchorNode {
                            root,
                            face: face.kind,
                            slot: group.slot,
                        },
                        Transform::IDENTITY,
                        Visibility::from(self.visibility.anchor(face.kind, group.slot)),
                    ))
                    .id();
                commands.entity(face_entity).add_child(anchor);
                for label in &group.labels {
                    spawn_billboard(commands, anchor, label, label_color);
                }
            }
        }

        debug!(?root, "plot injected");
        root
    }
}

/// A billboard is a transform-only node in the scene plus a screen-space text
/// node that follows its projection.
pub fn spawn_billboard(commands: &mut Commands, parent: Entity, label: &Billboard, color: Color) -> Entity {
    let text = commands
        .spawn((
            BillboardText,
            Text::new(label.text.clone()),
            TextFont {
                font_size: label.font_size,
                ..default()
            },
            TextColor(color),
            Node {
                position_type: PositionType::Absolute,
                ..default()
            },
            ZIndex(if label.depth_test { 0 } else { 1 }),
            Visibility::Hidden,
        ))
        .id();
    let node = commands
        .spawn((
            BillboardNode { text },
            Transform::from_translation(label.position).with_scale(Vec3::splat(label.scale)),
            Visibility::Inherited,
        ))
        .id();
    commands.entity(parent).add_child(node);
    node
}
