//! Quality factor to concrete render settings.
//!
//! All settings are pure functions of the factor, the device profile and
//! the session lock; nothing here keeps its own feedback state. The
//! continuous factor and the one-shot lock stay separate control loops and
//! compose only at this mapping.

use bevy::core_pipeline::core_3d::ScreenSpaceTransmissionQuality;
use bevy::pbr::DirectionalLightShadowMap;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::optics::GEM_BOUNCES;
use constants::render_settings::{
    FLAT_SHADING_THRESHOLD, LOCKED_LIGHT_SCALE, LOCKED_RESOLUTION_SCALE,
    MAX_ENVIRONMENT_INTENSITY, MAX_RESOLUTION_SCALE, MIN_ENVIRONMENT_INTENSITY,
    MIN_RESOLUTION_SCALE, SHADOW_MAP_SIZES,
};

use crate::engine::core::device::DeviceProfile;
use crate::engine::materials::gem::{GemAssets, GemMeshes, GemProfile, gem_profile, make_gem_material};
use crate::engine::perf::{QualityEvent, QualityEventKind};
use crate::engine::systems::pretest::QualityLock;

/// Set once the monitor signals its flip-flop fallback; pins the gem to
/// the cheap material for the rest of the session.
#[derive(Resource, Default)]
pub struct EffectsFallback(pub bool);

/// Concrete render settings for one quality factor.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderQuality {
    pub resolution_scale: f32,
    pub shadow_map_size: usize,
    pub transmission_steps: usize,
    pub transmission_quality: ScreenSpaceTransmissionQuality,
    pub environment_intensity: f32,
    pub flat_shading: bool,
    pub profile: GemProfile,
}

pub fn derive_quality(
    factor: f32,
    device: &DeviceProfile,
    locked: bool,
    effects_fallback: bool,
) -> RenderQuality {
    let factor = factor.clamp(0.0, 1.0);
    let profile = gem_profile(factor, device.mobile, effects_fallback);

    let mut resolution_scale =
        MIN_RESOLUTION_SCALE + (MAX_RESOLUTION_SCALE - MIN_RESOLUTION_SCALE) * factor;
    if locked {
        resolution_scale = resolution_scale.min(LOCKED_RESOLUTION_SCALE);
    }

    let shadow_map_size = if locked {
        SHADOW_MAP_SIZES[0]
    } else if factor < 0.33 {
        SHADOW_MAP_SIZES[0]
    } else if factor < 0.66 {
        SHADOW_MAP_SIZES[1]
    } else {
        SHADOW_MAP_SIZES[2]
    };

    let transmission_steps = match profile {
        GemProfile::Full => GEM_BOUNCES,
        GemProfile::Reduced => 1,
        GemProfile::Fallback => 0,
    };

    let mut environment_intensity = MIN_ENVIRONMENT_INTENSITY
        + (MAX_ENVIRONMENT_INTENSITY - MIN_ENVIRONMENT_INTENSITY) * factor;
    if locked {
        environment_intensity *= LOCKED_LIGHT_SCALE;
    }

    RenderQuality {
        resolution_scale,
        shadow_map_size,
        transmission_steps,
        transmission_quality: transmission_tier(factor, device.safari),
        environment_intensity,
        flat_shading: factor < FLAT_SHADING_THRESHOLD,
        profile,
    }
}

/// Blur tier for the screen-space refraction. Safari never gets the top
/// tier; its driver stack is the reason the device profile exists.
fn transmission_tier(factor: f32, safari: bool) -> ScreenSpaceTransmissionQuality {
    let tier = if factor < 0.5 {
        ScreenSpaceTransmissionQuality::Low
    } else if factor < 0.8 {
        ScreenSpaceTransmissionQuality::Medium
    } else {
        ScreenSpaceTransmissionQuality::High
    };
    if safari && matches!(tier, ScreenSpaceTransmissionQuality::High) {
        ScreenSpaceTransmissionQuality::Medium
    } else {
        tier
    }
}

/// Applies monitor output to the renderer: resolution scale, shadow maps,
/// refraction steps and the gem material profile.
pub fn apply_quality_events(
    mut events: EventReader<QualityEvent>,
    mut fallback: ResMut<EffectsFallback>,
    device: Res<DeviceProfile>,
    lock: Res<QualityLock>,
    mut gem_assets: ResMut<GemAssets>,
    mut gem_meshes: ResMut<GemMeshes>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut cameras: Query<&mut Camera3d>,
    mut env_lights: Query<&mut EnvironmentMapLight>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut shadow_map: ResMut<DirectionalLightShadowMap>,
    mut commands: Commands,
) {
    let mut latest_factor = None;
    for event in events.read() {
        match event.kind {
            QualityEventKind::Fallback => {
                fallback.0 = true;
                latest_factor = Some(event.factor);
            }
            QualityEventKind::Change => latest_factor = Some(event.factor),
            // Incline/Decline always arrive paired with a Change.
            _ => {}
        }
    }
    let Some(factor) = latest_factor else {
        return;
    };

    let quality = derive_quality(factor, &device, lock.is_locked(), fallback.0);
    debug!(
        "quality factor {factor:.2} -> scale {:.2}, shadows {}, steps {}",
        quality.resolution_scale, quality.shadow_map_size, quality.transmission_steps
    );

    if let Ok(mut window) = windows.single_mut() {
        let base = window.resolution.base_scale_factor();
        window
            .resolution
            .set_scale_factor_override(Some(base * quality.resolution_scale));
    }

    shadow_map.size = quality.shadow_map_size;

    for mut camera in &mut cameras {
        camera.screen_space_specular_transmission_steps = quality.transmission_steps;
        camera.screen_space_specular_transmission_quality = quality.transmission_quality;
    }

    for mut env_light in &mut env_lights {
        env_light.intensity = quality.environment_intensity;
    }

    if gem_assets.profile != Some(quality.profile) {
        if let Some(material) = materials.get_mut(&gem_assets.material) {
            *material = make_gem_material(quality.profile);
        }
        gem_assets.profile = Some(quality.profile);
    }

    if gem_assets.flat_shaded != quality.flat_shading {
        set_flat_shading(
            quality.flat_shading,
            &mut gem_meshes,
            &mut meshes,
            &mut commands,
        );
        gem_assets.flat_shaded = quality.flat_shading;
    }
}

/// Swaps gem meshes between their smooth originals and lazily built
/// flat-shaded clones.
fn set_flat_shading(
    flat: bool,
    gem_meshes: &mut GemMeshes,
    meshes: &mut Assets<Mesh>,
    commands: &mut Commands,
) {
    for entry in &mut gem_meshes.entries {
        let handle = if flat {
            if entry.flat.is_none() {
                if let Some(smooth) = meshes.get(&entry.smooth) {
                    let mut flattened = smooth.clone();
                    flattened.duplicate_vertices();
                    flattened.compute_flat_normals();
                    entry.flat = Some(meshes.add(flattened));
                }
            }
            entry.flat.clone()
        } else {
            Some(entry.smooth.clone())
        };
        let Some(handle) = handle else {
            continue;
        };
        if let Ok(mut entity) = commands.get_entity(entry.entity) {
            entity.insert(Mesh3d(handle));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desktop() -> DeviceProfile {
        DeviceProfile {
            mobile: false,
            safari: false,
        }
    }

    #[test]
    fn resolution_scale_is_monotone_in_factor() {
        let device = desktop();
        let mut last = 0.0;
        for step in 0..=10 {
            let factor = step as f32 / 10.0;
            let quality = derive_quality(factor, &device, false, false);
            assert!(quality.resolution_scale >= last);
            last = quality.resolution_scale;
        }
        assert_eq!(last, MAX_RESOLUTION_SCALE);
    }

    #[test]
    fn lock_caps_resolution_and_shadows() {
        let quality = derive_quality(1.0, &desktop(), true, false);
        assert!(quality.resolution_scale <= LOCKED_RESOLUTION_SCALE);
        assert_eq!(quality.shadow_map_size, SHADOW_MAP_SIZES[0]);
    }

    #[test]
    fn steps_follow_the_gem_profile() {
        let device = desktop();
        assert_eq!(derive_quality(1.0, &device, false, false).transmission_steps, GEM_BOUNCES);
        assert_eq!(derive_quality(0.6, &device, false, false).transmission_steps, 1);
        assert_eq!(derive_quality(0.2, &device, false, false).transmission_steps, 0);
    }

    #[test]
    fn flat_shading_below_threshold() {
        let device = desktop();
        assert!(derive_quality(0.69, &device, false, false).flat_shading);
        assert!(!derive_quality(0.71, &device, false, false).flat_shading);
    }

    #[test]
    fn environment_intensity_is_monotone_in_factor() {
        let device = desktop();
        let mut last = 0.0;
        for step in 0..=10 {
            let factor = step as f32 / 10.0;
            let quality = derive_quality(factor, &device, false, false);
            assert!(quality.environment_intensity >= last);
            last = quality.environment_intensity;
        }
        assert_eq!(last, MAX_ENVIRONMENT_INTENSITY);
        let floor = derive_quality(0.0, &device, false, false).environment_intensity;
        assert_eq!(floor, MIN_ENVIRONMENT_INTENSITY);
    }

    #[test]
    fn lock_dims_the_environment() {
        let unlocked = derive_quality(1.0, &desktop(), false, false);
        let locked = derive_quality(1.0, &desktop(), true, false);
        assert!(locked.environment_intensity < unlocked.environment_intensity);
        assert_eq!(
            locked.environment_intensity,
            MAX_ENVIRONMENT_INTENSITY * LOCKED_LIGHT_SCALE
        );
    }

    #[test]
    fn safari_never_gets_the_top_blur_tier() {
        let safari = DeviceProfile {
            mobile: false,
            safari: true,
        };
        let quality = derive_quality(1.0, &safari, false, false);
        assert!(matches!(
            quality.transmission_quality,
            ScreenSpaceTransmissionQuality::Medium
        ));
    }

    #[test]
    fn monitor_fallback_forces_cheap_gem() {
        let quality = derive_quality(1.0, &desktop(), false, true);
        assert_eq!(quality.profile, GemProfile::Fallback);
        assert_eq!(quality.transmission_steps, 0);
    }
}
