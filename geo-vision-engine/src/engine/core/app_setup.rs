use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::path::DRILLHOLE_RECORDS_EXTENSION;
use constants::render_settings::{
    AMBIENT_BRIGHTNESS, BACKGROUND_RGB, CAMERA_START, DIRECTIONAL_ILLUMINANCE,
};

use crate::engine::assets::drillhole::DrillholeDataset;
use crate::engine::assets::site_config::SiteConfig;
use crate::engine::camera::viewport_camera::{ViewportCamera, camera_controller};
use crate::engine::core::app_state::AppState;
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::catalog::{poll_catalog, start_catalog};
use crate::engine::loading::drillhole_loader::{
    DrillholeLoader, start_drillhole_loading, track_drillhole_loading,
};
use crate::engine::loading::layer_loader::{LayerLoader, start_layer_loading, track_layer_loading};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::drillholes::DrillholeMeshes;
use crate::engine::scene::sink::LayerEntities;
use crate::engine::systems::navigation::{
    PresentationCommand, apply_presentation_commands, handle_navigation_keyboard,
    publish_presentation_state, teardown_on_exit,
};
use crate::rpc::web_rpc::WebRpcPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::overlay::{create_native_overlay, update_overlay};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        // Registers drillhole record collections as loadable JSON assets.
        .add_plugins(JsonAssetPlugin::<DrillholeDataset>::new(&[
            DRILLHOLE_RECORDS_EXTENSION,
        ]))
        .add_plugins(WebRpcPlugin)
        .insert_resource(ClearColor(Color::srgb_u8(
            BACKGROUND_RGB[0],
            BACKGROUND_RGB[1],
            BACKGROUND_RGB[2],
        )))
        .insert_resource(AmbientLight {
            brightness: AMBIENT_BRIGHTNESS,
            ..default()
        });

    app.init_resource::<SiteConfig>()
        .init_resource::<LoadingProgress>()
        .init_resource::<LayerLoader>()
        .init_resource::<DrillholeLoader>()
        .init_resource::<LayerEntities>()
        .init_resource::<DrillholeMeshes>()
        .init_resource::<ViewportCamera>()
        .add_event::<PresentationCommand>();

    // Discovery first, then loading starts for exactly the offered steps
    app.add_systems(Startup, (setup, start_catalog))
        .add_systems(
            Update,
            poll_catalog.run_if(in_state(AppState::Cataloguing)),
        )
        .add_systems(
            OnEnter(AppState::Presenting),
            (start_layer_loading, start_drillhole_loading),
        );

    app.add_systems(
        Update,
        (
            handle_navigation_keyboard,
            apply_presentation_commands,
            track_layer_loading,
            track_drillhole_loading,
            publish_presentation_state,
        )
            .chain()
            .run_if(in_state(AppState::Presenting)),
    )
    .add_systems(Update, camera_controller)
    .add_systems(Last, teardown_on_exit);

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(
            Update,
            update_overlay
                .after(publish_presentation_state)
                .run_if(in_state(AppState::Presenting)),
        );
    }

    app
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: DIRECTIONAL_ILLUMINANCE,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

fn spawn_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(CAMERA_START).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands) {
    spawn_lighting(&mut commands);
    spawn_camera(&mut commands);

    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlay(&mut commands);
    }
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
