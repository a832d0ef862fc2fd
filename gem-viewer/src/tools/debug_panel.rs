//! Hidden diagnostics panel, toggled with H.
//!
//! Shows the live quality factor, the adaptive sampling interval and the
//! adjustment count next to the smoothed frame rate. Purely a read-out; it
//! never writes back into the monitor.

use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use crate::engine::core::app_state::ViewerState;
use crate::engine::perf::PerfState;
use crate::engine::systems::pretest::QualityLock;
use crate::engine::systems::quality::EffectsFallback;

#[derive(Component)]
pub struct DebugPanel;

#[derive(Component)]
pub struct DebugReadout;

pub fn spawn_debug_panel(commands: &mut Commands) {
    commands
        .spawn((
            DebugPanel,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(12.0),
                left: Val::Px(12.0),
                padding: UiRect::all(Val::Px(8.0)),
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            Visibility::Hidden,
        ))
        .with_children(|parent| {
            parent.spawn((
                DebugReadout,
                Text::new(""),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 1.0, 0.8)),
            ));
        });
}

pub fn toggle_debug_panel(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut panels: Query<&mut Visibility, With<DebugPanel>>,
) {
    if !keyboard.just_pressed(KeyCode::KeyH) {
        return;
    }
    for mut visibility in &mut panels {
        *visibility = match *visibility {
            Visibility::Hidden => Visibility::Visible,
            _ => Visibility::Hidden,
        };
    }
}

pub fn update_debug_panel(
    diagnostics: Res<DiagnosticsStore>,
    perf: Res<PerfState>,
    lock: Res<QualityLock>,
    fallback: Res<EffectsFallback>,
    state: Res<State<ViewerState>>,
    mut readouts: Query<&mut Text, With<DebugReadout>>,
) {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|d| d.smoothed())
        .unwrap_or(0.0);

    for mut text in &mut readouts {
        text.0 = format!(
            "fps: {fps:.1}\nquality: {:.2}\ninterval: {:.2}s\nadjustments: {}\nlock: {:?}\nfallback: {}\nstate: {:?}",
            perf.factor(),
            perf.sample_interval(),
            perf.flip_count(),
            *lock,
            fallback.0,
            state.get(),
        );
    }
}
