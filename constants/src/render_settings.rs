//! Quality-derived render setting bounds.
//!
//! The viewer maps the quality factor (0..=1) and the device profile onto
//! concrete render settings. These constants bound that mapping.

/// Pre-test duration in seconds. The pre-test is a timer, not a convergence
/// test: it always completes after this long.
pub const PRETEST_DURATION: f32 = 2.0;

/// Frame rate below which the pre-test locks the session to the reduced
/// profile. The lock is one-shot and never re-evaluated.
pub const PRETEST_LOCK_FPS: f32 = 30.0;

/// Weights blending pre-test progress and asset-load progress into the
/// single loading percentage.
pub const PRETEST_PROGRESS_WEIGHT: f32 = 0.4;
pub const ASSET_PROGRESS_WEIGHT: f32 = 0.6;

/// Viewport width under which the device counts as mobile.
pub const MOBILE_WIDTH: f32 = 768.0;

/// Resolution scale range driven by the quality factor.
pub const MIN_RESOLUTION_SCALE: f32 = 0.6;
pub const MAX_RESOLUTION_SCALE: f32 = 1.0;

/// Resolution scale cap while the locked-low profile is active.
pub const LOCKED_RESOLUTION_SCALE: f32 = 0.75;

/// Directional light intensity multiplier under the locked-low profile.
pub const LOCKED_LIGHT_SCALE: f32 = 0.6;

/// Environment map intensity range driven by the quality factor. Dimming
/// the map cheapens the indirect lighting before the gem loses refraction.
pub const MIN_ENVIRONMENT_INTENSITY: f32 = 400.0;
pub const MAX_ENVIRONMENT_INTENSITY: f32 = 900.0;

/// Shadow map sizes per quality tier, low to high.
pub const SHADOW_MAP_SIZES: [usize; 3] = [1024, 2048, 4096];

/// Quality factor below which gem meshes switch to flat shading.
pub const FLAT_SHADING_THRESHOLD: f32 = 0.7;

/// Quality factor below which the gem drops to the non-refractive fallback
/// material.
pub const GEM_FALLBACK_THRESHOLD: f32 = 0.5;

/// Quality factor at which the gem gets the full refraction material.
/// Mobile devices hold out for more headroom before enabling it.
pub const GEM_FULL_THRESHOLD_DESKTOP: f32 = 0.7;
pub const GEM_FULL_THRESHOLD_MOBILE: f32 = 0.85;

/// Orbit camera zoom clamp, in scene units from the focus point.
pub const CAMERA_MIN_DISTANCE: f32 = 1.5;
pub const CAMERA_MAX_DISTANCE: f32 = 12.0;
