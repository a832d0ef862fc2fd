//! Asset path roots.

/// Catalog manifest, relative to the Bevy asset root.
pub const CATALOG_PATH: &str = "catalog.json";
