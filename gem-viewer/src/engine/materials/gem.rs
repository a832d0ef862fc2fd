//! Gem materials, quality-scaled.
//!
//! The refraction model rides on `StandardMaterial` screen-space
//! transmission; the internal-bounce count and blur tier live on the camera
//! and are applied by the quality system. What changes per quality tier
//! here is which material profile the gem nodes carry.

use bevy::prelude::*;
use constants::optics;
use constants::render_settings::{
    GEM_FALLBACK_THRESHOLD, GEM_FULL_THRESHOLD_DESKTOP, GEM_FULL_THRESHOLD_MOBILE,
};

/// Material family for gem nodes at the current quality factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GemProfile {
    /// Full refraction material.
    Full,
    /// Refraction with the cheap transmission tier.
    Reduced,
    /// Non-refractive stand-in for the lowest factors.
    Fallback,
}

/// Shared gem material handle plus the profile it was built for.
#[derive(Resource, Default)]
pub struct GemAssets {
    pub material: Handle<StandardMaterial>,
    pub profile: Option<GemProfile>,
    pub flat_shaded: bool,
}

/// Gem entities with their smooth mesh handle and, once built, the
/// flat-shaded variant swapped in at low quality.
#[derive(Resource, Default)]
pub struct GemMeshes {
    pub entries: Vec<GemMeshEntry>,
}

pub struct GemMeshEntry {
    pub entity: Entity,
    pub smooth: Handle<Mesh>,
    pub flat: Option<Handle<Mesh>>,
}

/// Picks the gem profile for a quality factor. The full-refraction
/// threshold is device dependent; a monitor fallback pins the profile to
/// the cheap material for the rest of the session.
pub fn gem_profile(factor: f32, mobile: bool, effects_fallback: bool) -> GemProfile {
    if effects_fallback {
        return GemProfile::Fallback;
    }
    let full_threshold = if mobile {
        GEM_FULL_THRESHOLD_MOBILE
    } else {
        GEM_FULL_THRESHOLD_DESKTOP
    };
    if factor < GEM_FALLBACK_THRESHOLD {
        GemProfile::Fallback
    } else if factor >= full_threshold {
        GemProfile::Full
    } else {
        GemProfile::Reduced
    }
}

pub fn make_gem_material(profile: GemProfile) -> StandardMaterial {
    match profile {
        GemProfile::Full => StandardMaterial {
            base_color: Color::WHITE,
            metallic: 0.0,
            perceptual_roughness: optics::GEM_ROUGHNESS,
            specular_transmission: 1.0,
            ior: optics::GEM_IOR,
            thickness: optics::GEM_THICKNESS,
            attenuation_color: Color::srgb(
                optics::GEM_ATTENUATION_COLOR[0],
                optics::GEM_ATTENUATION_COLOR[1],
                optics::GEM_ATTENUATION_COLOR[2],
            ),
            attenuation_distance: optics::GEM_ATTENUATION_DISTANCE,
            clearcoat: optics::GEM_CLEARCOAT,
            clearcoat_perceptual_roughness: optics::GEM_CLEARCOAT_ROUGHNESS,
            ..default()
        },
        GemProfile::Reduced => StandardMaterial {
            base_color: Color::WHITE,
            metallic: 0.0,
            perceptual_roughness: optics::GEM_ROUGHNESS,
            specular_transmission: 1.0,
            ior: optics::GEM_IOR,
            thickness: optics::GEM_THICKNESS,
            ..default()
        },
        GemProfile::Fallback => StandardMaterial {
            base_color: Color::srgb(0.93, 0.95, 1.0),
            metallic: 0.1,
            perceptual_roughness: 0.04,
            reflectance: 1.0,
            ..default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_thresholds() {
        assert_eq!(gem_profile(1.0, false, false), GemProfile::Full);
        assert_eq!(gem_profile(0.7, false, false), GemProfile::Full);
        assert_eq!(gem_profile(0.6, false, false), GemProfile::Reduced);
        assert_eq!(gem_profile(0.49, false, false), GemProfile::Fallback);
        assert_eq!(gem_profile(0.0, false, false), GemProfile::Fallback);
    }

    #[test]
    fn mobile_holds_out_for_more_headroom() {
        assert_eq!(gem_profile(0.8, true, false), GemProfile::Reduced);
        assert_eq!(gem_profile(0.9, true, false), GemProfile::Full);
    }

    #[test]
    fn monitor_fallback_pins_the_cheap_profile() {
        assert_eq!(gem_profile(1.0, false, true), GemProfile::Fallback);
    }

    #[test]
    fn fallback_material_does_not_refract() {
        let fallback = make_gem_material(GemProfile::Fallback);
        assert_eq!(fallback.specular_transmission, 0.0);
        let full = make_gem_material(GemProfile::Full);
        assert!(full.specular_transmission > 0.9);
        assert!((full.ior - 2.42).abs() < 1e-3);
    }
}
