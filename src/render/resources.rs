use crate::config::PlotConfig;
use crate::interaction::{GestureState, PickState};
use bevy::prelude::*;
use std::collections::HashMap;

#[derive(Resource, Clone, Default)]
pub struct PlotSettings(pub PlotConfig);

impl PlotSettings {
    pub fn new(config: PlotConfig) -> Self {
        Self(config)
    }
}

#[derive(Resource, Default)]
pub struct GestureRes {
    pub state: GestureState,
    /// Active touches last frame; a change starts a new gesture.
    pub touch_count: usize,
}

#[derive(Resource, Default)]
pub struct PickRes {
    pub state: PickState<Entity>,
    /// Data point -> its tooltip billboard, created on first pick.
    pub tooltips: HashMap<Entity, Entity>,
}

#[derive(Resource, Clone)]
pub struct PlotMaterials {
    pub face: Handle<StandardMaterial>,
    pub grid: Handle<StandardMaterial>,
    pub sphere: Handle<StandardMaterial>,
    pub points: Handle<StandardMaterial>,
    /// Vertex-colored surfaces.
    pub surface: Handle<StandardMaterial>,
}

impl PlotMaterials {
    pub fn new(config: &PlotConfig, materials: &mut Assets<StandardMaterial>) -> Self {
        let style = &config.style;
        let face = materials.add(StandardMaterial {
            base_color: style.face_color.with_a(style.face_opacity).into(),
            alpha_mode: AlphaMode::Blend,
            double_sided: true,
            cull_mode: None,
            unlit: true,
            ..default()
        });
        let grid = materials.add(StandardMaterial {
            base_color: style.grid_color.into(),
            unlit: true,
            ..default()
        });
        let sphere = materials.add(StandardMaterial {
            base_color: style.sphere_color.into(),
            perceptual_roughness: 0.4,
            metallic: 0.2,
            ..default()
        });
        let points = materials.add(StandardMaterial {
            base_color: style.point_color.into(),
            unlit: true,
            ..default()
        });
        let surface = materials.add(StandardMaterial {
            base_color: Color::WHITE,
            perceptual_roughness: 0.35,
            metallic: 0.05,
            reflectance: 0.4,
            cull_mode: None,
            double_sided: true,
            ..default()
        });
        Self {
            face,
            grid,
            sphere,
            points,
            surface,
        }
    }
}

pub fn setup_global_scene(mut commands: Commands) {
    commands.insert_resource(AmbientLight {
        brightness: 300.0,
        ..default()
    });
}

pub fn setup_plot_materials(
    mut commands: Commands,
    settings: Res<PlotSettings>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(PlotMaterials::new(&settings.0, &mut materials));
}
