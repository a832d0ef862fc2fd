//! Model scene loading, spawn detection, classification and recovery.
//!
//! Loads run through the asset server and are polled each frame, the same
//! shape as the catalog load: request once, watch the handle, act when the
//! scene instance has spawned. A failed load substitutes a deterministic
//! fallback shape instead of surfacing an error; a failed classification
//! renders nothing for the asset. Neither stops the render loop.

use bevy::asset::LoadState;
use bevy::gltf::GltfAssetLabel;
use bevy::prelude::*;

use crate::engine::assets::catalog::{CatalogLoader, CatalogManifest};
use crate::engine::assets::model_assets::{ModelScene, ModelSelectEvent, SelectedModel};
use crate::engine::classification::scene_graph::{NodeComponents, extract_scene};
use crate::engine::classification::{ClassifyError, classify};
use crate::engine::core::app_state::ViewerState;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::materials::assign_materials;
use crate::engine::materials::band::BandMaterials;
use crate::engine::materials::gem::{GemAssets, GemMeshes};

/// Kicks off the scene load for the current selection. Defaults to the
/// first catalog entry on the initial load.
pub fn begin_model_load(
    catalog: Option<Res<CatalogManifest>>,
    loader: Res<CatalogLoader>,
    mut selected: ResMut<SelectedModel>,
    mut scene: ResMut<ModelScene>,
    mut progress: ResMut<LoadingProgress>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    band_materials: Res<BandMaterials>,
    asset_server: Res<AssetServer>,
) {
    if progress.scene_requested {
        return;
    }

    let Some(catalog) = catalog else {
        if loader.failed {
            // No catalog will ever arrive; keep the viewer interactive.
            error!("no catalog available, showing fallback shape");
            let epoch = selected.epoch();
            spawn_fallback_shape(&mut commands, &mut meshes, &band_materials, &mut scene, epoch);
            progress.scene_requested = true;
            progress.failed = true;
        }
        return;
    };

    if selected.is_empty() {
        let Some((category, model)) = catalog.model_at(0) else {
            error!("catalog contains no models, showing fallback shape");
            let epoch = selected.epoch();
            spawn_fallback_shape(&mut commands, &mut meshes, &band_materials, &mut scene, epoch);
            progress.scene_requested = true;
            progress.failed = true;
            return;
        };
        let (category, model) = (category.name.clone(), model.id.clone());
        selected.switch_to(category, model);
    }

    let Some(path) = catalog.scene_path(&selected.category, &selected.model) else {
        error!(
            "unknown model {}/{}, showing fallback shape",
            selected.category, selected.model
        );
        let epoch = selected.epoch();
        spawn_fallback_shape(&mut commands, &mut meshes, &band_materials, &mut scene, epoch);
        progress.scene_requested = true;
        progress.failed = true;
        return;
    };

    info!("loading model {}/{} from {path}", selected.category, selected.model);
    let handle: Handle<Scene> =
        asset_server.load(GltfAssetLabel::Scene(0).from_asset(path.to_owned()));
    let root = commands
        .spawn((SceneRoot(handle.clone()), Name::new("model_root")))
        .id();

    scene.reset_for(selected.epoch());
    scene.root = Some(root);
    scene.scene_handle = Some(handle);
    progress.scene_requested = true;
}

/// Watches the in-flight scene handle and substitutes the fallback shape on
/// a failed download or parse.
pub fn watch_model_load(
    asset_server: Res<AssetServer>,
    selected: Res<SelectedModel>,
    mut scene: ResMut<ModelScene>,
    mut progress: ResMut<LoadingProgress>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    band_materials: Res<BandMaterials>,
) {
    if !progress.scene_requested || progress.scene_spawned || progress.failed {
        return;
    }
    let Some(handle) = scene.scene_handle.clone() else {
        return;
    };
    if let LoadState::Failed(err) = asset_server.load_state(&handle) {
        error!("model scene failed to load: {err}; showing fallback shape");
        if let Some(root) = scene.root.take() {
            commands.entity(root).despawn();
        }
        let epoch = selected.epoch();
        spawn_fallback_shape(&mut commands, &mut meshes, &band_materials, &mut scene, epoch);
        progress.failed = true;
    }
}

/// Once the scene instance has spawned, extracts the node tree, classifies
/// it and assigns materials. Stale epochs are discarded here as well, in
/// case a selection change raced the spawn.
pub fn classify_when_spawned(
    selected: Res<SelectedModel>,
    mut scene: ResMut<ModelScene>,
    mut progress: ResMut<LoadingProgress>,
    mut commands: Commands,
    children: Query<&Children>,
    nodes: Query<NodeComponents>,
    mesh_query: Query<&Mesh3d>,
    meshes: Res<Assets<Mesh>>,
    gem_assets: Res<GemAssets>,
    band_materials: Res<BandMaterials>,
    mut gem_meshes: ResMut<GemMeshes>,
) {
    if !progress.scene_requested || progress.classified || progress.failed {
        return;
    }
    let Some(root) = scene.root else {
        return;
    };

    if !selected.is_current(scene.epoch) {
        // A selection change raced the spawn; drop the stale instance.
        warn!("discarding stale model instance (epoch {})", scene.epoch);
        commands.entity(root).despawn();
        scene.root = None;
        return;
    }

    let extracted = extract_scene(root, &children, &nodes, &meshes);
    if extracted.entities.is_empty() {
        // Scene instance not spawned yet; try again next frame.
        return;
    }
    progress.scene_spawned = true;

    match classify(&extracted.descriptors) {
        Ok(classification) => {
            progress.classified = true;
            assign_materials(
                &mut commands,
                &extracted,
                &classification,
                &gem_assets,
                &band_materials,
                &mut gem_meshes,
                &mesh_query,
            );
            progress.materials_applied = true;
            scene.classification = Some(classification);
        }
        Err(err @ ClassifyError::NoBandGeometry { .. }) => {
            // Fatal for this load only: render nothing, stay interactive.
            error!(
                "classification failed for {}/{}: {err}",
                selected.category, selected.model
            );
            commands.entity(root).despawn();
            scene.root = None;
            progress.classified = true;
            progress.materials_applied = true;
        }
    }
}

/// Leaves the loading state once the asset checklist is complete.
pub fn finish_loading(
    progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<ViewerState>>,
) {
    if progress.asset_done() {
        next_state.set(ViewerState::Ready);
    }
}

/// Digit keys switch between catalog models, in flattened catalog order.
pub fn model_select_hotkeys(
    keyboard: Res<ButtonInput<KeyCode>>,
    catalog: Option<Res<CatalogManifest>>,
    mut events: EventWriter<ModelSelectEvent>,
) {
    let Some(catalog) = catalog else {
        return;
    };
    const DIGITS: [KeyCode; 9] = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
        KeyCode::Digit8,
        KeyCode::Digit9,
    ];
    for (index, key) in DIGITS.iter().enumerate() {
        if keyboard.just_pressed(*key) && index < catalog.model_count() {
            events.write(ModelSelectEvent { index });
        }
    }
}

/// Applies a model selection: despawns the old instance, bumps the epoch
/// and re-enters the loading state.
pub fn handle_model_select(
    mut events: EventReader<ModelSelectEvent>,
    catalog: Option<Res<CatalogManifest>>,
    mut selected: ResMut<SelectedModel>,
    mut scene: ResMut<ModelScene>,
    mut progress: ResMut<LoadingProgress>,
    mut commands: Commands,
    mut next_state: ResMut<NextState<ViewerState>>,
) {
    let Some(catalog) = catalog else {
        return;
    };
    // Only the latest selection matters if several arrived this frame.
    let Some(event) = events.read().last() else {
        return;
    };
    let Some((category, model)) = catalog.model_at(event.index) else {
        warn!("model selection out of range: {}", event.index);
        return;
    };
    if selected.category == category.name && selected.model == model.id {
        return;
    }

    let (category, model) = (category.name.clone(), model.id.clone());
    let epoch = selected.switch_to(category, model);
    if let Some(root) = scene.root.take() {
        commands.entity(root).despawn();
    }
    scene.reset_for(epoch);
    progress.reset_asset();
    info!(
        "model selected: {}/{} (epoch {epoch})",
        selected.category, selected.model
    );
    next_state.set(ViewerState::AssetLoading);
}

/// Deterministic stand-in when no model can be shown: a plain sphere in the
/// primary band finish.
fn spawn_fallback_shape(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    band_materials: &BandMaterials,
    scene: &mut ModelScene,
    epoch: u32,
) {
    let mesh = meshes.add(Sphere::new(0.8));
    let root = commands
        .spawn((
            Mesh3d(mesh),
            MeshMaterial3d(band_materials.primary.clone()),
            Name::new("fallback_shape"),
        ))
        .id();
    scene.reset_for(epoch);
    scene.root = Some(root);
}
