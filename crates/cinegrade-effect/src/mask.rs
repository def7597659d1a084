//! Depth-mask curve baking.
//!
//! The depth mask attenuates grading by scene depth. Authors edit a
//! [`ParamCurve`] over normalized depth; the renderer samples a baked
//! 8-bit table. Baking is cheap but per-texel uploads are not, so the
//! table is only rebuilt when the curve actually changed.

use cinegrade_core::{Easing, ParamCurve};
use tracing::debug;

/// Resolution of the baked depth curve table.
pub const DEPTH_CURVE_RANGE: usize = 1024;

/// A depth falloff curve and its baked lookup table.
#[derive(Debug, Clone)]
pub struct DepthMask {
    curve: ParamCurve,
    baked: Vec<u8>,
    baked_curve: Option<ParamCurve>,
}

impl DepthMask {
    /// Mask from the given falloff curve.
    pub fn new(curve: ParamCurve) -> Self {
        Self {
            curve,
            baked: vec![0; DEPTH_CURVE_RANGE],
            baked_curve: None,
        }
    }

    /// Replace the falloff curve; the table rebakes lazily.
    pub fn set_curve(&mut self, curve: ParamCurve) {
        self.curve = curve;
    }

    pub fn curve(&self) -> &ParamCurve {
        &self.curve
    }

    /// The baked table, rebaking first if the curve changed.
    pub fn table(&mut self) -> &[u8] {
        let dirty = self.baked_curve.as_ref() != Some(&self.curve);
        if dirty {
            self.bake();
            self.baked_curve = Some(self.curve.clone());
            debug!("depth curve table rebaked");
        }
        &self.baked
    }

    fn bake(&mut self) {
        let step = 1.0 / (DEPTH_CURVE_RANGE - 1) as f32;
        for (x, entry) in self.baked.iter_mut().enumerate() {
            let value = self.curve.evaluate(x as f32 * step).clamp(0.0, 1.0);
            *entry = (value * 255.0).floor() as u8;
        }
    }
}

impl Default for DepthMask {
    /// Full-strength mask at every depth.
    fn default() -> Self {
        let mut curve = ParamCurve::new();
        curve.set(0.0, 1.0, Easing::Linear);
        curve.set(1.0, 1.0, Easing::Linear);
        Self::new(curve)
    }
}
