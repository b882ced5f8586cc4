use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_camera::{Camera3d, PerspectiveProjection, Projection};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::Result;
use crate::colormap::lookup;
use crate::config::PlotConfig;
use crate::core::{FunctionRange, FunctionSamples, PlotContent, SampleSet, SurfaceSamples};
use crate::layout::AxisTitles;
use crate::render::{ArGraphPlugin, PlotCamera, PlotMaterials, PlotSettings, setup_plot_materials, spawn_plot};

/// A plot described by its raw input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlotSpec {
    Scatter { points: Vec<[f32; 3]> },
    PointCloud { points: Vec<[f32; 3]> },
    /// Row-major height map.
    Surface { heights: Vec<Vec<f32>> },
    Function {
        expression: String,
        #[serde(default)]
        range: FunctionRange,
    },
}

impl PlotSpec {
    pub fn into_content(self) -> Result<PlotContent> {
        Ok(match self {
            PlotSpec::Scatter { points } => PlotContent::Spheres(samples(&points)),
            PlotSpec::PointCloud { points } => PlotContent::Points(samples(&points)),
            PlotSpec::Surface { heights } => PlotContent::Surface(SurfaceSamples::new(&heights)?),
            PlotSpec::Function { expression, range } => {
                PlotContent::Function(FunctionSamples::new(&expression, range)?)
            }
        })
    }
}

fn samples(points: &[[f32; 3]]) -> SampleSet {
    let points: Vec<Vec3> = points.iter().copied().map(Vec3::from_array).collect();
    SampleSet::new(&points)
}

#[derive(Resource)]
struct PendingPlot {
    content: PlotContent,
    titles: AxisTitles,
}

/// Validate everything that can fail, then build the app.
fn plot_app(spec: PlotSpec, titles: AxisTitles, config: PlotConfig) -> Result<App> {
    let content = spec.into_content()?;
    if matches!(content, PlotContent::Surface(_) | PlotContent::Function(_)) {
        lookup(&config.style.colormap, config.style.colormap_shades)?;
    }

    let mut app = App::new();
    app.insert_resource(ClearColor(Color::BLACK))
        .insert_resource(PendingPlot { content, titles })
        .add_systems(Startup, spawn_pending_plot.after(setup_plot_materials));
    Ok(app)
}

/// Primary window rasterizing at the configured pixel ratio.
fn plot_window(config: &PlotConfig) -> Window {
    Window {
        title: "argraph".to_string(),
        resolution: WindowResolution::default().with_scale_factor_override(config.layout.pixel_ratio),
        ..default()
    }
}

fn spawn_pending_plot(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    materials: Res<PlotMaterials>,
    settings: Res<PlotSettings>,
    pending: Res<PendingPlot>,
) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: std::f32::consts::FRAC_PI_4,
            ..default()
        }),
        Transform::from_xyz(0.6, 0.45, 0.8).looking_at(Vec3::ZERO, Vec3::Y),
        PlotCamera,
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            ..default()
        },
        Transform::from_xyz(1.0, 2.0, 1.5).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    match spawn_plot(
        &mut commands,
        &mut meshes,
        &materials,
        &pending.content,
        &pending.titles,
        &settings.0,
    ) {
        Ok(root) => info!(?root, "plot ready"),
        Err(report) => error!("failed to spawn plot: {report:?}"),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn run_plot(spec: PlotSpec, titles: AxisTitles, config: PlotConfig) -> Result<()> {
    let mut app = plot_app(spec, titles, config.clone())?;
    app.add_plugins((
        DefaultPlugins.set(WindowPlugin {
            primary_window: Some(plot_window(&config)),
            ..default()
        }),
        ArGraphPlugin::new(config),
    ))
    .run();
    Ok(())
}

#[cfg(target_arch = "wasm32")]
pub fn run_plot(spec: PlotSpec, titles: AxisTitles, config: PlotConfig, canvas_id: &str) -> Result<()> {
    let mut app = plot_app(spec, titles, config.clone())?;
    app.add_plugins((
        DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                canvas: Some(format!("#{}", canvas_id)),
                fit_canvas_to_parent: true,
                ..plot_window(&config)
            }),
            ..default()
        }),
        ArGraphPlugin::new(config),
    ))
    .run();
    Ok(())
}
