use bevy::asset::AssetMetaCheck;
use bevy::core_pipeline::core_3d::ScreenSpaceTransmissionQuality;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::pbr::DirectionalLightShadowMap;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::optics::GEM_BOUNCES;
use constants::palette::BAND_PALETTE;
use constants::render_settings::SHADOW_MAP_SIZES;

use crate::engine::assets::catalog::{CatalogLoader, CatalogManifest, poll_catalog, start_catalog_loading};
use crate::engine::assets::model_assets::{ModelScene, ModelSelectEvent, SelectedModel};
use crate::engine::camera::orbit_camera::{OrbitCamera, camera_controller};
use crate::engine::core::app_state::ViewerState;
use crate::engine::core::device::{DeviceProfile, detect_device};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::environment::{
    EnvironmentAssets, apply_environment_when_ready, begin_environment_load,
};
use crate::engine::loading::model_loader::{
    begin_model_load, classify_when_spawned, finish_loading, handle_model_select,
    model_select_hotkeys, watch_model_load,
};
use crate::engine::loading::progress::{LoadingProgress, LoadingText, update_loading_text};
use crate::engine::materials::band::{
    BandColorEvent, BandColorState, BandMaterials, handle_band_color_events, lerp_band_color,
    make_band_material,
};
use crate::engine::materials::gem::{GemAssets, GemMeshes, GemProfile, make_gem_material};
use crate::engine::perf::{PerfState, QualityEvent, sample_frame_rate};
use crate::engine::systems::fps_tracking::{FpsText, fps_text_update_system};
use crate::engine::systems::pretest::{PreTestState, QualityLock, enforce_quality_lock, run_pretest};
use crate::engine::systems::quality::{EffectsFallback, apply_quality_events};
use crate::tools::debug_panel::{spawn_debug_panel, toggle_debug_panel, update_debug_panel};
use crate::tools::palette_ui::{palette_interaction, spawn_palette_ui};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<ViewerState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers the catalog manifest as a loadable asset type from JSON.
        .add_plugins(JsonAssetPlugin::<CatalogManifest>::new(&["json"]));

    // Initialise resources early
    app.init_resource::<PerfState>()
        .init_resource::<LoadingProgress>()
        .init_resource::<PreTestState>()
        .init_resource::<QualityLock>()
        .init_resource::<EffectsFallback>()
        .init_resource::<DeviceProfile>()
        .init_resource::<CatalogLoader>()
        .init_resource::<SelectedModel>()
        .init_resource::<ModelScene>()
        .init_resource::<EnvironmentAssets>()
        .init_resource::<BandColorState>()
        .init_resource::<BandMaterials>()
        .init_resource::<GemAssets>()
        .init_resource::<GemMeshes>()
        .init_resource::<OrbitCamera>()
        .insert_resource(DirectionalLightShadowMap {
            size: SHADOW_MAP_SIZES[2],
        })
        .add_event::<QualityEvent>()
        .add_event::<BandColorEvent>()
        .add_event::<ModelSelectEvent>();

    // State-based system scheduling
    app.add_systems(
        Startup,
        (setup, detect_device, start_catalog_loading).chain(),
    )
    .add_systems(
        Update,
        (poll_catalog, run_pretest, update_loading_text)
            .chain()
            .run_if(in_state(ViewerState::PreTest)),
    )
    .add_systems(
        Update,
        (
            poll_catalog,
            begin_model_load,
            watch_model_load,
            classify_when_spawned,
            begin_environment_load,
            apply_environment_when_ready,
            finish_loading,
            update_loading_text,
        )
            .chain()
            .run_if(in_state(ViewerState::AssetLoading)),
    );

    // Runtime systems - only once the model is showing
    let runtime_systems = (
        sample_frame_rate,
        apply_quality_events,
        palette_interaction,
        handle_band_color_events,
        lerp_band_color,
        model_select_hotkeys,
        handle_model_select,
        apply_environment_when_ready,
        toggle_debug_panel,
        update_debug_panel,
        fps_text_update_system,
        update_loading_text,
    );
    app.add_systems(
        Update,
        runtime_systems
            .chain()
            .run_if(in_state(ViewerState::Ready)),
    );

    // The camera moves while assets stream in as well as when ready; the
    // lock enforcement watches its resource and is otherwise inert.
    app.add_systems(
        Update,
        camera_controller
            .run_if(in_state(ViewerState::Ready).or(in_state(ViewerState::AssetLoading))),
    )
    .add_systems(Update, enforce_quality_lock);

    app
}

fn setup(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut band_materials: ResMut<BandMaterials>,
    mut gem_assets: ResMut<GemAssets>,
    orbit: Res<OrbitCamera>,
) {
    create_material_handles(&mut materials, &mut band_materials, &mut gem_assets);
    spawn_camera(&mut commands, &orbit);
    spawn_lighting(&mut commands);
    create_overlays(&mut commands);
    spawn_palette_ui(&mut commands);
    spawn_debug_panel(&mut commands);
}

/// Single shared handle per material family so quality and palette changes
/// rewrite one asset each.
fn create_material_handles(
    materials: &mut Assets<StandardMaterial>,
    band_materials: &mut BandMaterials,
    gem_assets: &mut GemAssets,
) {
    band_materials.primary = materials.add(make_band_material(&BAND_PALETTE[0], false));
    band_materials.accent = materials.add(make_band_material(&BAND_PALETTE[0], true));
    gem_assets.material = materials.add(make_gem_material(GemProfile::Full));
    gem_assets.profile = Some(GemProfile::Full);
}

fn spawn_camera(commands: &mut Commands, orbit: &OrbitCamera) {
    commands.spawn((
        Camera3d {
            screen_space_specular_transmission_steps: GEM_BOUNCES,
            screen_space_specular_transmission_quality: ScreenSpaceTransmissionQuality::High,
            ..default()
        },
        Transform::from_xyz(2.2, 1.6, 3.2).looking_at(orbit.focus, Vec3::Y),
    ));
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: 9_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            0.9,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

fn create_overlays(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("Loading 0%"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.9)),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Percent(46.0),
                    width: Val::Percent(100.0),
                    justify_content: JustifyContent::Center,
                    ..default()
                },
                LoadingText,
            ));
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.0, 0.0)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
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
