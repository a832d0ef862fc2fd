//! One-shot performance pre-test.
//!
//! Before the main asset shows, a fixed-duration timer counts rendered
//! frames. A slow result locks the session into a reduced profile. The
//! lock is deliberately never re-evaluated: it is a separate control loop
//! from the continuous quality factor and stays terminal once set.

use bevy::pbr::DirectionalLightShadowMap;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::render_settings::{
    LOCKED_LIGHT_SCALE, LOCKED_RESOLUTION_SCALE, PRETEST_DURATION, PRETEST_LOCK_FPS,
    SHADOW_MAP_SIZES,
};

use crate::engine::core::app_state::ViewerState;
use crate::engine::loading::progress::LoadingProgress;

#[derive(Resource)]
pub struct PreTestState {
    pub timer: Timer,
    pub frames: u32,
}

impl Default for PreTestState {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(PRETEST_DURATION, TimerMode::Once),
            frames: 0,
        }
    }
}

/// Session-wide quality lock decided by the pre-test. Terminal once set.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QualityLock {
    #[default]
    Unlocked,
    Locked,
}

impl QualityLock {
    pub fn is_locked(&self) -> bool {
        matches!(self, QualityLock::Locked)
    }
}

/// Lock decision: measured frames over the fixed duration against the
/// threshold rate.
pub fn locked_low(frames: u32, duration: f32) -> bool {
    duration > 0.0 && (frames as f32 / duration) < PRETEST_LOCK_FPS
}

/// Counts frames until the timer completes, then decides the lock and
/// moves on to asset loading. The timer always completes on schedule; it
/// measures, it does not converge.
pub fn run_pretest(
    time: Res<Time>,
    mut pretest: ResMut<PreTestState>,
    mut progress: ResMut<LoadingProgress>,
    mut lock: ResMut<QualityLock>,
    mut next_state: ResMut<NextState<ViewerState>>,
) {
    pretest.timer.tick(time.delta());
    pretest.frames += 1;
    progress.pretest_fraction = pretest.timer.fraction();

    if pretest.timer.just_finished() {
        let measured = pretest.frames as f32 / PRETEST_DURATION;
        if locked_low(pretest.frames, PRETEST_DURATION) {
            *lock = QualityLock::Locked;
            warn!("pre-test measured {measured:.1} fps, locking reduced quality profile");
        } else {
            info!("pre-test measured {measured:.1} fps, full quality available");
        }
        progress.pretest_fraction = 1.0;
        next_state.set(ViewerState::AssetLoading);
    }
}

/// Applies the locked profile once the lock flips: reduced resolution
/// scale, smallest shadow maps, dimmed key light, antialiasing off.
pub fn enforce_quality_lock(
    lock: Res<QualityLock>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut lights: Query<&mut DirectionalLight>,
    cameras: Query<Entity, With<Camera3d>>,
    mut shadow_map: ResMut<DirectionalLightShadowMap>,
    mut commands: Commands,
) {
    if !lock.is_changed() || !lock.is_locked() {
        return;
    }

    if let Ok(mut window) = windows.single_mut() {
        let base = window.resolution.base_scale_factor();
        window
            .resolution
            .set_scale_factor_override(Some(base * LOCKED_RESOLUTION_SCALE));
    }
    for mut light in &mut lights {
        light.illuminance *= LOCKED_LIGHT_SCALE;
    }
    shadow_map.size = SHADOW_MAP_SIZES[0];
    for camera in &cameras {
        commands.entity(camera).insert(Msaa::Off);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_threshold_is_thirty_fps() {
        // 2 second pre-test: 59 frames is under 30 fps, 60 frames is not.
        assert!(locked_low(59, 2.0));
        assert!(!locked_low(60, 2.0));
    }

    #[test]
    fn degenerate_duration_never_locks() {
        assert!(!locked_low(0, 0.0));
    }
}
