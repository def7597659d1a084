//! Render options, shader pass selection and the CPU reference pipeline.
//!
//! GPU integration picks a precompiled shader pass from the option flags;
//! the index arithmetic here must match the pass table layout of the
//! shader bundle. The CPU path exists as the reference implementation and
//! for headless tests: exposure, tonemap, then LUT lookup per pixel.

use cinegrade_color::{LutImage, Tonemapper};
use cinegrade_core::Color;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Shader quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Quality {
    Mobile,
    #[default]
    Standard,
}

/// Per-consumer rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    pub quality: Quality,
    /// Source frames are HDR linear light.
    pub hdr: bool,
    /// Working in linear (as opposed to gamma) color space.
    pub linear_color_space: bool,
    /// Dither the final quantization (HDR passes only).
    pub dithering: bool,
    pub tonemapper: Tonemapper,
    /// Luminance mapped to white by the filmic tonemappers.
    pub linear_white: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            quality: Quality::Standard,
            hdr: false,
            linear_color_space: false,
            dithering: false,
            tonemapper: Tonemapper::Disabled,
            linear_white: 11.2,
        }
    }
}

// Pass table layout: a mobile block of 18 follows the standard block.
// Within a block, LDR occupies the first two passes (gamma, linear); HDR
// passes follow, 4 tonemappers per dither flag per color space.
const MOBILE_BLOCK_OFFSET: usize = 18;
const HDR_BLOCK_OFFSET: usize = 2;
const LINEAR_OFFSET: usize = 8;
const DITHER_OFFSET: usize = 4;

impl RenderOptions {
    /// Index of the shader pass matching these options.
    pub fn shader_pass_index(&self) -> usize {
        let mut pass = match self.quality {
            Quality::Mobile => MOBILE_BLOCK_OFFSET,
            Quality::Standard => 0,
        };
        if self.hdr {
            pass += HDR_BLOCK_OFFSET;
            if self.linear_color_space {
                pass += LINEAR_OFFSET;
            }
            if self.dithering {
                pass += DITHER_OFFSET;
            }
            pass += self.tonemapper.pass_offset();
        } else if self.linear_color_space {
            pass += 1;
        }
        pass
    }
}

/// Which shader family handles the final composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderVariant {
    Base,
    Blend,
    Mask,
    MaskBlend,
    DepthMask,
    DepthMaskBlend,
    /// Tonemap/dither only; grading skipped (no usable LUT).
    ProcessOnly,
}

impl ShaderVariant {
    /// Pick the material family for this frame. The depth mask wins over a
    /// texture mask; invalid or absent LUTs fall back to process-only.
    pub fn select(blending: bool, has_mask: bool, depth_mask: bool, valid_luts: bool) -> Self {
        if !valid_luts {
            return Self::ProcessOnly;
        }
        match (blending, depth_mask, has_mask) {
            (true, true, _) => Self::DepthMaskBlend,
            (true, false, true) => Self::MaskBlend,
            (true, false, false) => Self::Blend,
            (false, true, _) => Self::DepthMask,
            (false, false, true) => Self::Mask,
            (false, false, false) => Self::Base,
        }
    }
}

/// Grade a frame in place: exposure and tonemapping (HDR only), then the
/// resolved LUT. Alpha is preserved.
pub fn apply_grade(pixels: &mut [Color], lut: &LutImage, options: &RenderOptions, exposure: f32) {
    let exposure = exposure.max(0.0);
    pixels.par_iter_mut().for_each(|px| {
        let mut rgb = [px.r, px.g, px.b];
        if options.hdr {
            rgb = rgb.map(|c| c * exposure);
            rgb = options.tonemapper.apply(rgb, options.linear_white);
        }
        let graded = lut.sample(rgb);
        *px = Color::new(graded[0], graded[1], graded[2], px.a);
    });
}
