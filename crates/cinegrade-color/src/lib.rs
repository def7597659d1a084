//! CineGrade Color — LUT image model, compositing and tonemapping.

pub mod error;
pub mod lut;
pub mod tonemapping;

pub use error::ColorError;
pub use lut::{LutImage, SharedLut, LUT_SIZE};
pub use tonemapping::Tonemapper;
