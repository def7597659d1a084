//! Blendable field values.
//!
//! A [`FieldValue`] is one captured parameter of an effect component: a
//! float, a flag, a vector or a color. Each tag carries its own
//! interpolation rule; values of different tags never blend.

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Discriminant of a [`FieldValue`], used by selectors and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Float,
    Bool,
    Vec2,
    Vec3,
    Vec4,
    Color,
}

/// A single blendable parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Float(f32),
    Bool(bool),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Color(Color),
}

impl FieldValue {
    /// The tag of this value.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Float(_) => FieldKind::Float,
            Self::Bool(_) => FieldKind::Bool,
            Self::Vec2(_) => FieldKind::Vec2,
            Self::Vec3(_) => FieldKind::Vec3,
            Self::Vec4(_) => FieldKind::Vec4,
            Self::Color(_) => FieldKind::Color,
        }
    }

    /// Interpolate between two values of the same kind.
    ///
    /// Numeric kinds interpolate componentwise with `t` clamped to [0, 1].
    /// Booleans do not interpolate: the target value wins as soon as the
    /// blend has started (`t > 0`); at `t == 0` the source value holds.
    /// Returns `None` when the kinds differ.
    pub fn interpolate(a: &FieldValue, b: &FieldValue, t: f32) -> Option<FieldValue> {
        let t = t.clamp(0.0, 1.0);
        match (a, b) {
            (Self::Float(a), Self::Float(b)) => Some(Self::Float(a + (b - a) * t)),
            (Self::Bool(a), Self::Bool(b)) => Some(Self::Bool(if t > 0.0 { *b } else { *a })),
            (Self::Vec2(a), Self::Vec2(b)) => Some(Self::Vec2(a.lerp(*b, t))),
            (Self::Vec3(a), Self::Vec3(b)) => Some(Self::Vec3(a.lerp(*b, t))),
            (Self::Vec4(a), Self::Vec4(b)) => Some(Self::Vec4(a.lerp(*b, t))),
            (Self::Color(a), Self::Color(b)) => Some(Self::Color(a.lerp(*b, t))),
            _ => None,
        }
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Vec2> for FieldValue {
    fn from(v: Vec2) -> Self {
        Self::Vec2(v)
    }
}

impl From<Vec3> for FieldValue {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}

impl From<Vec4> for FieldValue {
    fn from(v: Vec4) -> Self {
        Self::Vec4(v)
    }
}

impl From<Color> for FieldValue {
    fn from(v: Color) -> Self {
        Self::Color(v)
    }
}
