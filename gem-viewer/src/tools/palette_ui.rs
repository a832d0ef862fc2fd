//! Band finish palette swatches.
//!
//! One button per palette entry along the bottom edge. Pressing a swatch
//! fires a `BandColorEvent`; the material transition itself lives in the
//! materials module.

use bevy::prelude::*;
use constants::palette::BAND_PALETTE;

use crate::engine::materials::band::BandColorEvent;

/// Marks a swatch button with its palette index.
#[derive(Component)]
pub struct PaletteSwatch(pub usize);

pub fn spawn_palette_ui(commands: &mut Commands) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(18.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            column_gap: Val::Px(10.0),
            ..default()
        })
        .with_children(|parent| {
            for (index, spec) in BAND_PALETTE.iter().enumerate() {
                parent.spawn((
                    Button,
                    PaletteSwatch(index),
                    Node {
                        width: Val::Px(34.0),
                        height: Val::Px(34.0),
                        border: UiRect::all(Val::Px(2.0)),
                        ..default()
                    },
                    BorderColor(Color::srgba(1.0, 1.0, 1.0, 0.35)),
                    BorderRadius::all(Val::Px(17.0)),
                    BackgroundColor(Color::srgb(spec.srgb[0], spec.srgb[1], spec.srgb[2])),
                ));
            }
        });
}

pub fn palette_interaction(
    interactions: Query<(&Interaction, &PaletteSwatch), (Changed<Interaction>, With<Button>)>,
    mut events: EventWriter<BandColorEvent>,
) {
    for (interaction, swatch) in &interactions {
        if *interaction == Interaction::Pressed {
            events.write(BandColorEvent(swatch.0));
        }
    }
}
