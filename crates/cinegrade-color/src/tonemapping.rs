//! Tone mapping operators for HDR sources.

use serde::{Deserialize, Serialize};

/// Available tone mapping operators.
///
/// Discriminants double as shader-pass offsets for GPU integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tonemapper {
    #[default]
    Disabled = 0,
    Photographic = 1,
    FilmicHable = 2,
    FilmicAces = 3,
}

// Hable curve shape (shoulder, linear strength/angle, toe terms).
const HABLE_A: f32 = 0.22;
const HABLE_B: f32 = 0.30;
const HABLE_C: f32 = 0.10;
const HABLE_D: f32 = 0.20;
const HABLE_E: f32 = 0.01;
const HABLE_F: f32 = 0.30;

impl Tonemapper {
    /// Apply the operator to a linear-light RGB triplet.
    ///
    /// `linear_white` is the luminance mapped to white by the filmic
    /// curves; `Disabled` passes the input through untouched.
    pub fn apply(&self, hdr: [f32; 3], linear_white: f32) -> [f32; 3] {
        match self {
            Self::Disabled => hdr,
            Self::Photographic => hdr.map(|c| (c / (1.0 + c)).clamp(0.0, 1.0)),
            Self::FilmicHable => {
                let white = hable_partial(linear_white.max(1e-4));
                hdr.map(|c| (hable_partial(c.max(0.0)) / white).clamp(0.0, 1.0))
            }
            Self::FilmicAces => hdr.map(aces_channel),
        }
    }

    /// Shader-pass offset within an HDR pass block.
    pub fn pass_offset(&self) -> usize {
        *self as usize
    }

    /// Display name.
    pub fn name(&self) -> &str {
        match self {
            Self::Disabled => "Disabled",
            Self::Photographic => "Photographic",
            Self::FilmicHable => "Filmic (Hable)",
            Self::FilmicAces => "Filmic (ACES)",
        }
    }
}

fn hable_partial(x: f32) -> f32 {
    ((x * (HABLE_A * x + HABLE_C * HABLE_B) + HABLE_D * HABLE_E)
        / (x * (HABLE_A * x + HABLE_B) + HABLE_D * HABLE_F))
        - HABLE_E / HABLE_F
}

/// ACES filmic approximation (Narkowicz 2015).
fn aces_channel(x: f32) -> f32 {
    let a = 2.51;
    let b = 0.03;
    let c = 2.43;
    let d = 0.59;
    let e = 0.14;
    ((x * (a * x + b)) / (x * (c * x + d) + e)).clamp(0.0, 1.0)
}
