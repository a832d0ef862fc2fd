//! Scene-graph extraction for the classifier.
//!
//! Walks the spawned glTF scene depth-first, preserving child order, and
//! flattens every mesh-bearing entity into a `NodeDescriptor`. The walk is
//! the only place that touches ECS state; the classifier itself stays pure.

use bevy::gltf::{GltfExtras, GltfMaterialExtras, GltfMaterialName};
use bevy::prelude::*;

use crate::engine::classification::NodeDescriptor;

/// Descriptor list plus the parallel entity list, in identical order.
#[derive(Debug, Default)]
pub struct ExtractedScene {
    pub entities: Vec<Entity>,
    pub descriptors: Vec<NodeDescriptor>,
}

pub type NodeComponents<'a> = (
    Option<&'a Name>,
    Option<&'a GltfMaterialName>,
    Option<&'a GltfMaterialExtras>,
    Option<&'a GltfExtras>,
    Option<&'a Mesh3d>,
);

/// Flattens the subtree under `root` into classifier input.
///
/// glTF primitives spawn as children of their node entity and may carry no
/// name of their own, so the nearest ancestor name is inherited down the
/// walk.
pub fn extract_scene(
    root: Entity,
    children: &Query<&Children>,
    nodes: &Query<NodeComponents>,
    meshes: &Assets<Mesh>,
) -> ExtractedScene {
    let mut extracted = ExtractedScene::default();
    visit(root, None, children, nodes, meshes, &mut extracted);
    extracted
}

fn visit(
    entity: Entity,
    inherited_name: Option<&str>,
    children: &Query<&Children>,
    nodes: &Query<NodeComponents>,
    meshes: &Assets<Mesh>,
    out: &mut ExtractedScene,
) {
    let mut node_name = inherited_name.map(str::to_owned);

    if let Ok((name, material_name, material_extras, node_extras, mesh)) = nodes.get(entity) {
        if let Some(name) = name {
            node_name = Some(name.as_str().to_owned());
        }

        if let Some(mesh_handle) = mesh {
            let has_geometry = meshes
                .get(&mesh_handle.0)
                .is_some_and(|m| m.count_vertices() > 0);
            let diamond_marker = extras_mark_diamond(material_extras.map(|e| e.value.as_str()))
                || extras_mark_diamond(node_extras.map(|e| e.value.as_str()));

            out.entities.push(entity);
            out.descriptors.push(NodeDescriptor {
                name: node_name.clone().unwrap_or_default(),
                material_name: material_name.map(|m| m.0.clone()),
                diamond_marker,
                has_geometry,
            });
        }
    }

    if let Ok(child_list) = children.get(entity) {
        for &child in child_list {
            visit(
                child,
                node_name.as_deref(),
                children,
                nodes,
                meshes,
                out,
            );
        }
    }
}

/// Diamond marker embedded in glTF extras: `"diamond"` or `"gem"` keys that
/// are truthy in the exporter's JSON.
fn extras_mark_diamond(raw: Option<&str>) -> bool {
    let Some(raw) = raw else {
        return false;
    };
    let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) else {
        return false;
    };
    ["diamond", "gem"].iter().any(|key| {
        value
            .get(key)
            .is_some_and(|v| v.as_bool() == Some(true) || v.as_str().is_some_and(|s| s == "true"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extras_marker_accepts_bool_and_string() {
        assert!(extras_mark_diamond(Some(r#"{"diamond": true}"#)));
        assert!(extras_mark_diamond(Some(r#"{"gem": "true"}"#)));
        assert!(!extras_mark_diamond(Some(r#"{"diamond": false}"#)));
        assert!(!extras_mark_diamond(Some(r#"{"metal": true}"#)));
        assert!(!extras_mark_diamond(Some("not json")));
        assert!(!extras_mark_diamond(None));
    }
}
