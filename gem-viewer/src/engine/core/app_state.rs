use bevy::prelude::*;

/// Viewer session state machine.
///
/// `PreTest` runs exactly once per session; `Ready` re-enters
/// `AssetLoading` whenever a different model is selected. The locked-low
/// decision is not a state here: it is a separate one-shot resource
/// (`QualityLock`) so the two control loops never feed each other.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum ViewerState {
    #[default]
    PreTest,
    AssetLoading,
    Ready,
}
