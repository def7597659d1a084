//! Color subsystem errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ColorError {
    #[error("invalid LUT dimensions: {width}x{height} does not encode a cube")]
    InvalidDimensions { width: usize, height: usize },
    #[error("LUT cube size {0} too small, need at least 2")]
    CubeTooSmall(usize),
    #[error("texel count mismatch: expected {expected}, got {got}")]
    TexelCountMismatch { expected: usize, got: usize },
}
