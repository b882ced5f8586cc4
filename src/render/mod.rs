pub mod components;
pub mod resources;
pub mod spawn;
pub mod systems;

pub use components::*;
pub use resources::*;
pub use spawn::*;
use systems::*;

use crate::config::PlotConfig;
use bevy::prelude::*;

/// Registers the per-frame plot systems. Plots themselves are spawned with
/// [`spawn_plot`] once [`PlotMaterials`] exists.
#[derive(Default)]
pub struct ArGraphPlugin {
    pub config: PlotConfig,
}

impl ArGraphPlugin {
    pub fn new(config: PlotConfig) -> Self {
        Self { config }
    }
}

impl Plugin for ArGraphPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(PlotSettings::new(self.config.clone()))
            .init_resource::<GestureRes>()
            .init_resource::<PickRes>()
            .add_systems(Startup, (setup_global_scene, setup_plot_materials))
            .add_systems(
                Update,
                (
                    handle_gestures,
                    pick_points,
                    update_axis_visibility,
                    place_billboards,
                )
                    .chain(),
            );
    }
}
