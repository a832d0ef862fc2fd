//! Band metal materials and the lerped colour transition.
//!
//! Palette selection never swaps the colour instantly: the live material
//! colour moves toward the target at a fixed rate each frame until it
//! converges, which is what makes the swap read as a finish change instead
//! of a pop.

use bevy::prelude::*;
use constants::palette::{ACCENT_ROUGHNESS_OFFSET, BAND_LERP_RATE, BAND_PALETTE, BandFinishSpec};

/// Below this colour distance the transition snaps to the target.
pub const CONVERGENCE_EPS: f32 = 1e-3;

/// Selected palette entry plus the in-flight colour transition.
#[derive(Resource)]
pub struct BandColorState {
    pub finish_index: usize,
    pub current: LinearRgba,
    pub target: LinearRgba,
}

impl Default for BandColorState {
    fn default() -> Self {
        let initial = finish_color(&BAND_PALETTE[0]);
        Self {
            finish_index: 0,
            current: initial,
            target: initial,
        }
    }
}

impl BandColorState {
    pub fn converged(&self) -> bool {
        color_distance(self.current, self.target) < CONVERGENCE_EPS
    }

    pub fn finish(&self) -> &'static BandFinishSpec {
        &BAND_PALETTE[self.finish_index]
    }
}

/// Shared handles for the two band material families.
#[derive(Resource, Default)]
pub struct BandMaterials {
    pub primary: Handle<StandardMaterial>,
    pub accent: Handle<StandardMaterial>,
}

/// User picked a palette entry (index into `BAND_PALETTE`).
#[derive(Event)]
pub struct BandColorEvent(pub usize);

pub fn finish_color(spec: &BandFinishSpec) -> LinearRgba {
    Color::srgb(spec.srgb[0], spec.srgb[1], spec.srgb[2]).to_linear()
}

pub fn make_band_material(spec: &BandFinishSpec, accent: bool) -> StandardMaterial {
    let roughness = if accent {
        (spec.roughness + ACCENT_ROUGHNESS_OFFSET).min(1.0)
    } else {
        spec.roughness
    };
    StandardMaterial {
        base_color: Color::LinearRgba(finish_color(spec)),
        metallic: spec.metallic,
        perceptual_roughness: roughness,
        ..default()
    }
}

/// One frame of the colour transition: fixed-rate lerp toward the target,
/// scaled by frame time.
pub fn step_toward(current: LinearRgba, target: LinearRgba, dt: f32) -> LinearRgba {
    let t = (BAND_LERP_RATE * dt).clamp(0.0, 1.0);
    LinearRgba {
        red: current.red + (target.red - current.red) * t,
        green: current.green + (target.green - current.green) * t,
        blue: current.blue + (target.blue - current.blue) * t,
        alpha: current.alpha + (target.alpha - current.alpha) * t,
    }
}

pub fn color_distance(a: LinearRgba, b: LinearRgba) -> f32 {
    let dr = a.red - b.red;
    let dg = a.green - b.green;
    let db = a.blue - b.blue;
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Applies palette selection events: retargets the transition, never touches
/// the live colour directly.
pub fn handle_band_color_events(
    mut events: EventReader<BandColorEvent>,
    mut state: ResMut<BandColorState>,
) {
    for BandColorEvent(index) in events.read() {
        if *index >= BAND_PALETTE.len() {
            warn!("band colour selection out of range: {index}");
            continue;
        }
        state.finish_index = *index;
        state.target = finish_color(&BAND_PALETTE[*index]);
        info!("band finish selected: {}", BAND_PALETTE[*index].name);
    }
}

/// Advances the colour transition and writes the result into both band
/// materials.
pub fn lerp_band_color(
    time: Res<Time>,
    mut state: ResMut<BandColorState>,
    band_materials: Res<BandMaterials>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if state.converged() {
        return;
    }

    state.current = step_toward(state.current, state.target, time.delta_secs());
    if state.converged() {
        state.current = state.target;
    }

    for handle in [&band_materials.primary, &band_materials.accent] {
        if let Some(material) = materials.get_mut(handle) {
            material.base_color = Color::LinearRgba(state.current);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_converges_monotonically() {
        let start = LinearRgba::new(0.0, 0.0, 0.0, 1.0);
        let target = LinearRgba::new(1.0, 0.8, 0.2, 1.0);
        let mut current = start;
        let mut last_distance = color_distance(current, target);
        let dt = 1.0 / 60.0;

        for _ in 0..600 {
            current = step_toward(current, target, dt);
            let distance = color_distance(current, target);
            assert!(distance <= last_distance);
            last_distance = distance;
        }
        assert!(last_distance < CONVERGENCE_EPS);
    }

    #[test]
    fn large_frame_time_never_overshoots() {
        let start = LinearRgba::new(0.0, 0.0, 0.0, 1.0);
        let target = LinearRgba::new(1.0, 1.0, 1.0, 1.0);
        let stepped = step_toward(start, target, 10.0);
        assert_eq!(stepped, target);
    }

    #[test]
    fn default_state_is_converged() {
        let state = BandColorState::default();
        assert!(state.converged());
        assert_eq!(state.finish().name, "Yellow Gold");
    }
}
