//! Catalog manifest as a Bevy asset. Mirrors the JSON structure exactly.
//!
//! The viewer consumes `{category, model}` pairs; the catalog supplies them
//! plus the scene paths and the environment map set. Listing pages and
//! thumbnail probing live outside this crate.

use bevy::prelude::*;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogModel {
    pub id: String,
    /// Scene file path relative to the asset root.
    pub scene: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogCategory {
    pub name: String,
    pub models: Vec<CatalogModel>,
}

/// Prefiltered environment map set for lighting and reflections.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentMaps {
    pub diffuse: String,
    pub specular: String,
    pub skybox: Option<String>,
}

#[derive(Asset, Debug, Clone, Deserialize, TypePath, Resource)]
pub struct CatalogManifest {
    pub categories: Vec<CatalogCategory>,
    pub environment: Option<EnvironmentMaps>,
}

impl CatalogManifest {
    /// Total model count across categories, for hotkey index mapping.
    pub fn model_count(&self) -> usize {
        self.categories.iter().map(|c| c.models.len()).sum()
    }

    /// Model at a flattened index, categories in declaration order.
    pub fn model_at(&self, index: usize) -> Option<(&CatalogCategory, &CatalogModel)> {
        let mut remaining = index;
        for category in &self.categories {
            if remaining < category.models.len() {
                return Some((category, &category.models[remaining]));
            }
            remaining -= category.models.len();
        }
        None
    }

    /// Scene path for a `{category, model}` pair.
    pub fn scene_path(&self, category: &str, model: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.name == category)?
            .models
            .iter()
            .find(|m| m.id == model)
            .map(|m| m.scene.as_str())
    }
}

/// Tracks the catalog manifest load.
#[derive(Resource, Default)]
pub struct CatalogLoader {
    pub handle: Option<Handle<CatalogManifest>>,
    pub failed: bool,
}

/// Startup: request the catalog manifest.
pub fn start_catalog_loading(
    mut loader: ResMut<CatalogLoader>,
    asset_server: Res<AssetServer>,
) {
    let path = constants::path::CATALOG_PATH;
    info!("loading catalog manifest from {path}");
    loader.handle = Some(asset_server.load(path));
}

/// Promotes the loaded manifest into a resource, once.
pub fn poll_catalog(
    mut loader: ResMut<CatalogLoader>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<CatalogManifest>>,
    existing: Option<Res<CatalogManifest>>,
) {
    if existing.is_some() || loader.failed {
        return;
    }
    let Some(handle) = loader.handle.clone() else {
        return;
    };
    if let Some(manifest) = manifests.get(&handle) {
        info!(
            "catalog loaded: {} categories, {} models",
            manifest.categories.len(),
            manifest.model_count()
        );
        commands.insert_resource(manifest.clone());
        return;
    }
    if let bevy::asset::LoadState::Failed(err) = asset_server.load_state(&handle) {
        error!("catalog manifest failed to load: {err}");
        loader.failed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> CatalogManifest {
        CatalogManifest {
            categories: vec![
                CatalogCategory {
                    name: "rings".to_owned(),
                    models: vec![
                        CatalogModel {
                            id: "solitaire".to_owned(),
                            scene: "models/rings/solitaire.glb".to_owned(),
                        },
                        CatalogModel {
                            id: "halo".to_owned(),
                            scene: "models/rings/halo.glb".to_owned(),
                        },
                    ],
                },
                CatalogCategory {
                    name: "pendants".to_owned(),
                    models: vec![CatalogModel {
                        id: "drop".to_owned(),
                        scene: "models/pendants/drop.glb".to_owned(),
                    }],
                },
            ],
            environment: None,
        }
    }

    #[test]
    fn flattened_index_spans_categories() {
        let m = manifest();
        assert_eq!(m.model_count(), 3);
        assert_eq!(m.model_at(1).unwrap().1.id, "halo");
        assert_eq!(m.model_at(2).unwrap().0.name, "pendants");
        assert!(m.model_at(3).is_none());
    }

    #[test]
    fn scene_path_lookup() {
        let m = manifest();
        assert_eq!(
            m.scene_path("pendants", "drop"),
            Some("models/pendants/drop.glb")
        );
        assert_eq!(m.scene_path("rings", "drop"), None);
    }

    #[test]
    fn manifest_parses_from_json() {
        let json = r#"{
            "categories": [
                {"name": "rings", "models": [{"id": "solitaire", "scene": "models/rings/solitaire.glb"}]}
            ],
            "environment": {"diffuse": "env/studio_diffuse.ktx2", "specular": "env/studio_specular.ktx2"}
        }"#;
        let parsed: CatalogManifest = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.categories[0].models[0].id, "solitaire");
        assert!(parsed.environment.is_some());
    }
}
