//! CineGrade Core - Foundation types for color grading
//!
//! This crate provides the fundamental types used throughout CineGrade:
//! - Blendable field values (tagged unions with interpolation rules)
//! - Component and effect snapshots (captured parameter sets)
//! - Blend selectors (which parameters participate in blending)
//! - The `ComponentAccess` capability trait for by-name parameter access
//! - Keyframed parameter curves

pub mod access;
pub mod color;
pub mod curve;
pub mod field;
pub mod selector;
pub mod snapshot;

pub use access::{ComponentAccess, FieldTable};
pub use color::Color;
pub use curve::{CubicBezier, CurveKey, Easing, ParamCurve};
pub use field::{FieldKind, FieldValue};
pub use selector::{BlendSelector, ComponentSelector, FieldSelector};
pub use snapshot::{ComponentSnapshot, EffectSnapshot};
