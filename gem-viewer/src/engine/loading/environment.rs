//! Studio environment lighting.
//!
//! Prefiltered environment maps feed reflections and the gem refraction.
//! A missing or broken map degrades to no reflections; the model still
//! renders and the load pipeline never stalls on it.

use bevy::asset::LoadState;
use bevy::core_pipeline::Skybox;
use bevy::prelude::*;

use crate::engine::assets::catalog::CatalogManifest;
use crate::engine::core::device::DeviceProfile;
use crate::engine::perf::PerfState;
use crate::engine::systems::pretest::QualityLock;
use crate::engine::systems::quality::{EffectsFallback, derive_quality};

const SKYBOX_BRIGHTNESS: f32 = 700.0;

#[derive(Resource, Default)]
pub struct EnvironmentAssets {
    pub diffuse: Option<Handle<Image>>,
    pub specular: Option<Handle<Image>>,
    pub skybox: Option<Handle<Image>>,
    pub requested: bool,
    pub applied: bool,
}

/// Requests the environment maps once the catalog names them.
pub fn begin_environment_load(
    catalog: Option<Res<CatalogManifest>>,
    mut environment: ResMut<EnvironmentAssets>,
    asset_server: Res<AssetServer>,
) {
    if environment.requested {
        return;
    }
    let Some(catalog) = catalog else {
        return;
    };
    environment.requested = true;

    let Some(maps) = catalog.environment.as_ref() else {
        info!("catalog declares no environment maps, rendering without reflections");
        environment.applied = true;
        return;
    };
    environment.diffuse = Some(asset_server.load(maps.diffuse.clone()));
    environment.specular = Some(asset_server.load(maps.specular.clone()));
    environment.skybox = maps.skybox.as_ref().map(|path| asset_server.load(path.clone()));
}

/// Attaches the environment to the camera once both maps are in, or gives
/// up quietly if either fails.
pub fn apply_environment_when_ready(
    mut environment: ResMut<EnvironmentAssets>,
    asset_server: Res<AssetServer>,
    cameras: Query<Entity, With<Camera3d>>,
    perf: Res<PerfState>,
    device: Res<DeviceProfile>,
    lock: Res<QualityLock>,
    fallback: Res<EffectsFallback>,
    mut commands: Commands,
) {
    if environment.applied || !environment.requested {
        return;
    }
    let (Some(diffuse), Some(specular)) = (
        environment.diffuse.clone(),
        environment.specular.clone(),
    ) else {
        return;
    };

    for handle in [&diffuse, &specular] {
        if let LoadState::Failed(err) = asset_server.load_state(handle) {
            warn!("environment map failed to load: {err}; rendering without reflections");
            environment.applied = true;
            return;
        }
    }
    if !asset_server.is_loaded_with_dependencies(&diffuse)
        || !asset_server.is_loaded_with_dependencies(&specular)
    {
        return;
    }

    let Ok(camera) = cameras.single() else {
        return;
    };
    // Intensity tracks the quality mapping from the start; later factor
    // changes rewrite it through the quality events.
    let quality = derive_quality(perf.factor(), &device, lock.is_locked(), fallback.0);
    commands.entity(camera).insert(EnvironmentMapLight {
        diffuse_map: diffuse,
        specular_map: specular.clone(),
        intensity: quality.environment_intensity,
        ..default()
    });

    if let Some(skybox) = environment.skybox.clone() {
        if asset_server.is_loaded_with_dependencies(&skybox) {
            commands.entity(camera).insert(Skybox {
                image: skybox,
                brightness: SKYBOX_BRIGHTNESS,
                ..default()
            });
        } else {
            // Skybox is cosmetic; don't hold the lighting hostage to it.
            warn!("skybox image not ready, continuing without it");
        }
    }

    info!("environment lighting applied");
    environment.applied = true;
}
