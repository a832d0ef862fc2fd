//! Fixed optical parameters for the gem material.
//!
//! Diamond-like constants. Tunable per deployment, never derived from data.

/// Index of refraction. Diamond sits at 2.42; slightly higher values read
/// better under studio lighting.
pub const GEM_IOR: f32 = 2.42;

/// Screen-space transmission steps, standing in for internal reflection
/// bounces.
pub const GEM_BOUNCES: usize = 3;

/// Simulated stone thickness in scene units, drives attenuation depth.
pub const GEM_THICKNESS: f32 = 0.6;

/// Attenuation tint, slightly warm to fake thin chromatic aberration.
pub const GEM_ATTENUATION_COLOR: [f32; 3] = [0.96, 0.98, 1.0];
pub const GEM_ATTENUATION_DISTANCE: f32 = 1.2;

/// Clear-coat layer over the stone.
pub const GEM_CLEARCOAT: f32 = 1.0;
pub const GEM_CLEARCOAT_ROUGHNESS: f32 = 0.02;

/// Surface roughness of the polished stone.
pub const GEM_ROUGHNESS: f32 = 0.02;
