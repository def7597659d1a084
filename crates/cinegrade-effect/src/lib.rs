//! CineGrade Effect — volume-driven color grading for a camera consumer.
//!
//! The blend controller tracks which grading volumes the consumer
//! occupies, drives LUT and parameter blends over time, and resolves the
//! final LUT and exposure the renderer samples each frame.

pub mod compositor;
pub mod controller;
pub mod error;
pub mod mask;
pub mod render;
pub mod volume;

pub use compositor::{CpuCompositor, LutCompositor};
pub use controller::{BlendConfig, BlendController, BlendOutput};
pub use error::EffectError;
pub use mask::{DepthMask, DEPTH_CURVE_RANGE};
pub use render::{apply_grade, Quality, RenderOptions, ShaderVariant};
pub use volume::{GradingVolume, VolumeId, VolumeRegistry};
