//! Band finish palette.
//!
//! Fixed enumerated palette for the band metal. Colours are sRGB triplets;
//! the viewer converts them to linear space when building materials.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandFinishSpec {
    pub name: &'static str,
    pub srgb: [f32; 3],
    pub metallic: f32,
    pub roughness: f32,
}

pub const BAND_PALETTE: &[BandFinishSpec] = &[
    BandFinishSpec {
        name: "Yellow Gold",
        srgb: [0.94, 0.78, 0.41],
        metallic: 1.0,
        roughness: 0.18,
    },
    BandFinishSpec {
        name: "Rose Gold",
        srgb: [0.93, 0.66, 0.56],
        metallic: 1.0,
        roughness: 0.18,
    },
    BandFinishSpec {
        name: "White Gold",
        srgb: [0.92, 0.92, 0.90],
        metallic: 1.0,
        roughness: 0.14,
    },
    BandFinishSpec {
        name: "Platinum",
        srgb: [0.85, 0.87, 0.89],
        metallic: 1.0,
        roughness: 0.10,
    },
];

/// Extra roughness applied to accent band nodes so they read as a distinct
/// finish next to the primary band.
pub const ACCENT_ROUGHNESS_OFFSET: f32 = 0.1;

/// Colour-space lerp rate for band colour transitions, in units per second.
pub const BAND_LERP_RATE: f32 = 3.0;
