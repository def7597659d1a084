//! The compositor seam between the blend state machine and the renderer.

use cinegrade_color::LutImage;

/// Composites two LUTs into a cache buffer.
///
/// Implementations must be deterministic: the output may depend only on
/// the inputs and the ratio. The state machine calls this when baking
/// blend caches; a GPU-backed renderer would mirror the writes into its
/// own textures.
pub trait LutCompositor {
    fn composite(&mut self, source: &LutImage, target: &LutImage, ratio: f32, out: &mut LutImage);
}

/// Reference CPU compositor: texelwise linear interpolation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuCompositor;

impl LutCompositor for CpuCompositor {
    fn composite(&mut self, source: &LutImage, target: &LutImage, ratio: f32, out: &mut LutImage) {
        LutImage::lerp_into(source, target, ratio, out);
    }
}
