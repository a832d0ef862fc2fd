//! Gem / band partitioning of a loaded model.
//!
//! Operates on an ordered list of node descriptors extracted depth-first
//! from the spawned scene, so the same input tree always produces the same
//! partition. The primary-band heuristics are string matching on node and
//! material names; they are knowingly fragile on models with unconventional
//! naming and are kept as-is for parity with the assets we ship.

use thiserror::Error;

/// One mesh node as seen by the classifier. Extraction order is the
/// depth-first traversal of the scene, preserving source child order.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDescriptor {
    pub name: String,
    pub material_name: Option<String>,
    /// Material extras carried a diamond marker.
    pub diamond_marker: bool,
    /// Node has renderable geometry (non-empty mesh).
    pub has_geometry: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClass {
    Gem,
    PrimaryBand,
    AccentBand,
    /// Mesh node without usable geometry, left out of all groups.
    Skipped,
}

/// Why a node landed in its class. Kept alongside the class so a
/// misclassified model can be diagnosed from logs instead of guesswork.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassReason {
    DiamondMarker,
    DiamondMaterialName,
    PrimaryNameHint,
    MetalMaterialHint,
    FirstBandFound,
    AccentOverflow,
    NoGeometry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedNode {
    pub index: usize,
    pub class: NodeClass,
    pub reason: ClassReason,
}

/// Full partition of a model. Indices refer back to the input slice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub nodes: Vec<ClassifiedNode>,
    pub gems: Vec<usize>,
    pub primary: Vec<usize>,
    pub accent: Vec<usize>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ClassifyError {
    #[error("no band geometry found among {mesh_nodes} mesh nodes")]
    NoBandGeometry { mesh_nodes: usize },
}

/// Partitions mesh nodes into gem, primary band and accent band groups.
///
/// Gems are nodes whose material carries the diamond marker (or a
/// `Diamond` material name). Every other node with geometry is band-like;
/// the first node matching a primary hint (or simply the first found)
/// becomes the primary band, the rest accent bands. A model with no
/// band-like geometry is a classification failure: the caller logs it and
/// renders nothing for this asset.
pub fn classify(descriptors: &[NodeDescriptor]) -> Result<Classification, ClassifyError> {
    let mut result = Classification::default();
    let mut band_candidates: Vec<usize> = Vec::new();

    for (index, node) in descriptors.iter().enumerate() {
        if !node.has_geometry {
            result.nodes.push(ClassifiedNode {
                index,
                class: NodeClass::Skipped,
                reason: ClassReason::NoGeometry,
            });
            continue;
        }
        if node.diamond_marker {
            result.gems.push(index);
            result.nodes.push(ClassifiedNode {
                index,
                class: NodeClass::Gem,
                reason: ClassReason::DiamondMarker,
            });
            continue;
        }
        if material_names_diamond(node) {
            result.gems.push(index);
            result.nodes.push(ClassifiedNode {
                index,
                class: NodeClass::Gem,
                reason: ClassReason::DiamondMaterialName,
            });
            continue;
        }
        band_candidates.push(index);
    }

    if band_candidates.is_empty() {
        return Err(ClassifyError::NoBandGeometry {
            mesh_nodes: descriptors.len(),
        });
    }

    let primary_position = band_candidates
        .iter()
        .position(|&i| primary_hint(&descriptors[i]))
        .unwrap_or(0);

    for (position, &index) in band_candidates.iter().enumerate() {
        let (class, reason) = if position == primary_position {
            let reason = if primary_hint(&descriptors[index]) {
                primary_hint_reason(&descriptors[index])
            } else {
                ClassReason::FirstBandFound
            };
            (NodeClass::PrimaryBand, reason)
        } else {
            (NodeClass::AccentBand, ClassReason::AccentOverflow)
        };
        match class {
            NodeClass::PrimaryBand => result.primary.push(index),
            NodeClass::AccentBand => result.accent.push(index),
            _ => unreachable!(),
        }
        result.nodes.push(ClassifiedNode {
            index,
            class,
            reason,
        });
    }

    // Restore input order for the per-node report; groups already follow
    // traversal order.
    result.nodes.sort_by_key(|n| n.index);
    Ok(result)
}

fn material_names_diamond(node: &NodeDescriptor) -> bool {
    node.material_name
        .as_deref()
        .is_some_and(|m| m.contains("Diamond"))
}

/// Name-based primary band detection, preserved verbatim from the source
/// assets: `primary` / `_1` node names, a `MATERIAL=` marker, or a `Metal`
/// material name.
fn primary_hint(node: &NodeDescriptor) -> bool {
    let name = node.name.to_lowercase();
    name.contains("primary")
        || name.contains("_1")
        || node.name.contains("MATERIAL=")
        || node
            .material_name
            .as_deref()
            .is_some_and(|m| m.contains("Metal"))
}

fn primary_hint_reason(node: &NodeDescriptor) -> ClassReason {
    let name = node.name.to_lowercase();
    if name.contains("primary") || name.contains("_1") || node.name.contains("MATERIAL=") {
        ClassReason::PrimaryNameHint
    } else {
        ClassReason::MetalMaterialHint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh(name: &str, material: Option<&str>, diamond: bool) -> NodeDescriptor {
        NodeDescriptor {
            name: name.to_owned(),
            material_name: material.map(str::to_owned),
            diamond_marker: diamond,
            has_geometry: true,
        }
    }

    #[test]
    fn one_metal_two_diamonds() {
        let nodes = vec![
            mesh("stone_left", Some("Diamond"), true),
            mesh("shank", Some("Metal_01"), false),
            mesh("stone_right", Some("Diamond"), true),
        ];
        let result = classify(&nodes).unwrap();
        assert_eq!(result.gems, vec![0, 2]);
        assert_eq!(result.primary, vec![1]);
        assert!(result.accent.is_empty());
    }

    #[test]
    fn no_band_geometry_is_a_typed_error() {
        let nodes = vec![
            mesh("stone", Some("Diamond"), true),
            NodeDescriptor {
                name: "empty".to_owned(),
                material_name: None,
                diamond_marker: false,
                has_geometry: false,
            },
        ];
        let err = classify(&nodes).unwrap_err();
        assert_eq!(err, ClassifyError::NoBandGeometry { mesh_nodes: 2 });
    }

    #[test]
    fn classification_is_deterministic() {
        let nodes = vec![
            mesh("band_2", Some("Metal"), false),
            mesh("band_1", Some("Metal"), false),
            mesh("stone", None, true),
        ];
        let first = classify(&nodes).unwrap();
        let second = classify(&nodes).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn primary_hint_overrides_first_found() {
        let nodes = vec![
            mesh("accent_rail", None, false),
            mesh("shank_primary", None, false),
        ];
        let result = classify(&nodes).unwrap();
        assert_eq!(result.primary, vec![1]);
        assert_eq!(result.accent, vec![0]);
        let primary = result.nodes.iter().find(|n| n.index == 1).unwrap();
        assert_eq!(primary.reason, ClassReason::PrimaryNameHint);
    }

    #[test]
    fn first_band_wins_without_hints() {
        let nodes = vec![mesh("left", None, false), mesh("right", None, false)];
        let result = classify(&nodes).unwrap();
        assert_eq!(result.primary, vec![0]);
        assert_eq!(result.accent, vec![1]);
        let primary = result.nodes.iter().find(|n| n.index == 0).unwrap();
        assert_eq!(primary.reason, ClassReason::FirstBandFound);
    }

    #[test]
    fn geometry_less_nodes_are_skipped_not_banded() {
        let nodes = vec![
            NodeDescriptor {
                name: "locator".to_owned(),
                material_name: None,
                diamond_marker: false,
                has_geometry: false,
            },
            mesh("shank", None, false),
        ];
        let result = classify(&nodes).unwrap();
        assert_eq!(result.primary, vec![1]);
        assert_eq!(result.nodes[0].class, NodeClass::Skipped);
    }
}
