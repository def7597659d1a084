//! Keyframed scalar parameter curves.
//!
//! Used for shaping values over a normalized domain, e.g. the depth-mask
//! falloff curve. Supports hold, linear and cubic Bézier easing between
//! keys; evaluation clamps outside the keyed range.

use serde::{Deserialize, Serialize};

/// Cubic Bézier control points for easing (x1, y1, x2, y2).
/// The curve goes from (0,0) to (1,1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn sample_x(&self, t: f32) -> f32 {
        let t2 = t * t;
        let mt = 1.0 - t;
        3.0 * mt * mt * t * self.x1 + 3.0 * mt * t2 * self.x2 + t2 * t
    }

    fn sample_y(&self, t: f32) -> f32 {
        let t2 = t * t;
        let mt = 1.0 - t;
        3.0 * mt * mt * t * self.y1 + 3.0 * mt * t2 * self.y2 + t2 * t
    }

    fn sample_dx(&self, t: f32) -> f32 {
        let mt = 1.0 - t;
        3.0 * mt * mt * self.x1 + 6.0 * mt * t * (self.x2 - self.x1) + 3.0 * t * t * (1.0 - self.x2)
    }

    /// Solve for the curve parameter at `x` via Newton-Raphson and return
    /// the eased value there.
    pub fn evaluate(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }

        let mut t = x;
        for _ in 0..8 {
            let err = self.sample_x(t) - x;
            let dx = self.sample_dx(t);
            if dx.abs() < 1e-9 {
                break;
            }
            t = (t - err / dx).clamp(0.0, 1.0);
            if err.abs() < 1e-6 {
                break;
            }
        }

        self.sample_y(t)
    }

    pub const LINEAR: Self = Self::new(0.0, 0.0, 1.0, 1.0);
    pub const EASE_IN: Self = Self::new(0.42, 0.0, 1.0, 1.0);
    pub const EASE_OUT: Self = Self::new(0.0, 0.0, 0.58, 1.0);
    pub const EASE_IN_OUT: Self = Self::new(0.42, 0.0, 0.58, 1.0);
}

/// How a key eases toward its successor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Hold the value until the next key.
    Hold,
    #[default]
    Linear,
    Bezier(CubicBezier),
}

/// A single key on a [`ParamCurve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
    pub easing: Easing,
}

/// A sorted track of keys for one scalar parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamCurve {
    keys: Vec<CurveKey>,
}

impl ParamCurve {
    pub fn new() -> Self {
        Self::default()
    }

    /// A curve holding `value` everywhere.
    pub fn constant(value: f32) -> Self {
        let mut curve = Self::new();
        curve.set(0.0, value, Easing::Hold);
        curve
    }

    /// Insert or update a key. Maintains sorted order.
    pub fn set(&mut self, time: f32, value: f32, easing: Easing) {
        if let Some(key) = self.keys.iter_mut().find(|k| k.time == time) {
            key.value = value;
            key.easing = easing;
            return;
        }
        let pos = self
            .keys
            .binary_search_by(|k| k.time.total_cmp(&time))
            .unwrap_or_else(|e| e);
        self.keys.insert(
            pos,
            CurveKey {
                time,
                value,
                easing,
            },
        );
    }

    /// Remove the key at `time`, if present.
    pub fn remove(&mut self, time: f32) -> bool {
        if let Some(pos) = self.keys.iter().position(|k| k.time == time) {
            self.keys.remove(pos);
            true
        } else {
            false
        }
    }

    /// Evaluate the curve at `time`, clamping outside the keyed range.
    pub fn evaluate(&self, time: f32) -> f32 {
        match self.keys.len() {
            0 => 0.0,
            1 => self.keys[0].value,
            _ => {
                if time <= self.keys[0].time {
                    return self.keys[0].value;
                }
                let last = &self.keys[self.keys.len() - 1];
                if time >= last.time {
                    return last.value;
                }
                let idx = self
                    .keys
                    .partition_point(|k| k.time <= time)
                    .saturating_sub(1);
                let a = &self.keys[idx];
                let b = &self.keys[idx + 1];
                Self::interpolate(a, b, time)
            }
        }
    }

    fn interpolate(a: &CurveKey, b: &CurveKey, time: f32) -> f32 {
        let span = b.time - a.time;
        if span <= 0.0 {
            return a.value;
        }
        let t = ((time - a.time) / span).clamp(0.0, 1.0);
        match a.easing {
            Easing::Hold => a.value,
            Easing::Linear => a.value + (b.value - a.value) * t,
            Easing::Bezier(bezier) => a.value + (b.value - a.value) * bezier.evaluate(t),
        }
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
