//! Combined loading progress.
//!
//! One percentage blends the pre-test (weighted 40%) with the asset load
//! (weighted 60%) so the user sees a single indicator until the viewer is
//! ready. The asset side is a checklist, not a byte counter: request,
//! spawn, classify, materials.

use bevy::prelude::*;
use constants::render_settings::{ASSET_PROGRESS_WEIGHT, PRETEST_PROGRESS_WEIGHT};

#[derive(Resource, Default)]
pub struct LoadingProgress {
    /// Pre-test timer fraction, 0..=1.
    pub pretest_fraction: f32,
    pub scene_requested: bool,
    pub scene_spawned: bool,
    pub classified: bool,
    pub materials_applied: bool,
    /// Load failed and the fallback shape is showing instead.
    pub failed: bool,
}

impl LoadingProgress {
    /// Asset-side fraction of the checklist.
    pub fn asset_fraction(&self) -> f32 {
        if self.failed {
            return 1.0;
        }
        match (
            self.scene_requested,
            self.scene_spawned,
            self.classified,
            self.materials_applied,
        ) {
            (_, _, _, true) => 1.0,
            (_, _, true, _) => 0.8,
            (_, true, _, _) => 0.6,
            (true, _, _, _) => 0.2,
            _ => 0.0,
        }
    }

    /// Blended percentage shown to the user, 0..=1.
    pub fn combined(&self) -> f32 {
        PRETEST_PROGRESS_WEIGHT * self.pretest_fraction.clamp(0.0, 1.0)
            + ASSET_PROGRESS_WEIGHT * self.asset_fraction()
    }

    pub fn asset_done(&self) -> bool {
        self.asset_fraction() >= 1.0
    }

    /// Clears the asset checklist for a new model load. The pre-test share
    /// stays: it ran once for the session.
    pub fn reset_asset(&mut self) {
        self.scene_requested = false;
        self.scene_spawned = false;
        self.classified = false;
        self.materials_applied = false;
        self.failed = false;
    }
}

/// Marks the loading percentage text node.
#[derive(Component)]
pub struct LoadingText;

pub fn update_loading_text(
    progress: Res<LoadingProgress>,
    mut query: Query<(&mut Text, &mut Visibility), With<LoadingText>>,
) {
    for (mut text, mut visibility) in &mut query {
        let combined = progress.combined();
        if combined >= 1.0 {
            *visibility = Visibility::Hidden;
        } else {
            *visibility = Visibility::Visible;
            text.0 = format!("Loading {:.0}%", combined * 100.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_weights_are_forty_sixty() {
        let mut progress = LoadingProgress::default();
        progress.pretest_fraction = 1.0;
        assert!((progress.combined() - 0.4).abs() < 1e-6);

        progress.scene_requested = true;
        progress.scene_spawned = true;
        progress.classified = true;
        progress.materials_applied = true;
        assert!((progress.combined() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn checklist_fraction_is_monotone() {
        let mut progress = LoadingProgress::default();
        let mut last = progress.asset_fraction();
        for step in 0..4 {
            match step {
                0 => progress.scene_requested = true,
                1 => progress.scene_spawned = true,
                2 => progress.classified = true,
                _ => progress.materials_applied = true,
            }
            assert!(progress.asset_fraction() >= last);
            last = progress.asset_fraction();
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn failure_counts_as_complete() {
        let mut progress = LoadingProgress::default();
        progress.failed = true;
        assert!(progress.asset_done());
    }

    #[test]
    fn reset_keeps_pretest_share() {
        let mut progress = LoadingProgress::default();
        progress.pretest_fraction = 1.0;
        progress.materials_applied = true;
        progress.reset_asset();
        assert!((progress.combined() - 0.4).abs() < 1e-6);
    }
}
