pub mod band;
pub mod gem;

use bevy::prelude::*;

use crate::engine::classification::Classification;
use crate::engine::classification::scene_graph::ExtractedScene;
use crate::engine::materials::band::BandMaterials;
use crate::engine::materials::gem::{GemAssets, GemMeshEntry, GemMeshes};

/// Applies the classified material families to a freshly loaded model.
///
/// Gems share one material handle, primary and accent bands one each, so
/// later quality or palette changes touch a single asset instead of every
/// entity.
pub fn assign_materials(
    commands: &mut Commands,
    extracted: &ExtractedScene,
    classification: &Classification,
    gem_assets: &GemAssets,
    band_materials: &BandMaterials,
    gem_meshes: &mut GemMeshes,
    mesh_query: &Query<&Mesh3d>,
) {
    gem_meshes.entries.clear();

    for &index in &classification.gems {
        let entity = extracted.entities[index];
        commands
            .entity(entity)
            .insert(MeshMaterial3d(gem_assets.material.clone()));
        if let Ok(mesh) = mesh_query.get(entity) {
            gem_meshes.entries.push(GemMeshEntry {
                entity,
                smooth: mesh.0.clone(),
                flat: None,
            });
        }
    }
    for &index in &classification.primary {
        let entity = extracted.entities[index];
        commands
            .entity(entity)
            .insert(MeshMaterial3d(band_materials.primary.clone()));
    }
    for &index in &classification.accent {
        let entity = extracted.entities[index];
        commands
            .entity(entity)
            .insert(MeshMaterial3d(band_materials.accent.clone()));
    }

    info!(
        "materials assigned: {} gem, {} primary band, {} accent band",
        classification.gems.len(),
        classification.primary.len(),
        classification.accent.len()
    );
}
