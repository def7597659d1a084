//! Grading volumes and the occupancy registry.
//!
//! A volume is a spatial region carrying its own grading: a LUT, an
//! exposure and optionally a captured parameter snapshot. The spatial
//! system owns geometry and reports occupancy changes as enter/exit
//! events; the registry only tracks membership and resolves which
//! occupied volume currently dominates.

use std::fmt;
use std::sync::Arc;

use cinegrade_color::SharedLut;
use cinegrade_core::EffectSnapshot;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Stable identity of a grading volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VolumeId(Uuid);

impl VolumeId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for VolumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A spatial region with its own grading parameters.
#[derive(Debug, Clone)]
pub struct GradingVolume {
    id: VolumeId,
    name: String,
    lut: Option<SharedLut>,
    exposure: f32,
    enter_blend_time: f32,
    priority: i32,
    effects: Option<EffectSnapshot>,
}

impl GradingVolume {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: VolumeId::new(),
            name: name.into(),
            lut: None,
            exposure: 1.0,
            enter_blend_time: 1.0,
            priority: 0,
            effects: None,
        }
    }

    pub fn with_lut(mut self, lut: SharedLut) -> Self {
        self.lut = Some(lut);
        self
    }

    /// Exposure is clamped to be non-negative.
    pub fn with_exposure(mut self, exposure: f32) -> Self {
        self.exposure = exposure.max(0.0);
        self
    }

    pub fn with_enter_blend_time(mut self, seconds: f32) -> Self {
        self.enter_blend_time = seconds;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Attach the parameter snapshot captured for this volume.
    ///
    /// The snapshot is frozen here; re-capture and re-attach when the
    /// underlying component values change.
    pub fn with_effects(mut self, effects: EffectSnapshot) -> Self {
        self.effects = Some(effects);
        self
    }

    pub fn id(&self) -> VolumeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lut(&self) -> Option<&SharedLut> {
        self.lut.as_ref()
    }

    pub fn exposure(&self) -> f32 {
        self.exposure
    }

    pub fn enter_blend_time(&self) -> f32 {
        self.enter_blend_time
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn effects(&self) -> Option<&EffectSnapshot> {
        self.effects.as_ref()
    }
}

/// Insertion-ordered set of the volumes a consumer currently occupies.
///
/// Entering volumes are inserted at the front, so among equal-priority
/// volumes the most recently entered wins dominance; iteration order is
/// otherwise stable.
#[derive(Debug, Clone, Default)]
pub struct VolumeRegistry {
    entered: Vec<Arc<GradingVolume>>,
}

impl VolumeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record volume entry. A volume already present is left untouched.
    pub fn enter(&mut self, volume: Arc<GradingVolume>) {
        if self.entered.iter().any(|v| v.id() == volume.id()) {
            return;
        }
        debug!(volume = volume.name(), "entered grading volume");
        self.entered.insert(0, volume);
    }

    /// Record volume exit. Exiting a non-member is a no-op.
    pub fn exit(&mut self, id: VolumeId) {
        if let Some(pos) = self.entered.iter().position(|v| v.id() == id) {
            debug!(volume = self.entered[pos].name(), "exited grading volume");
            self.entered.remove(pos);
        }
    }

    /// The highest-priority occupied volume, or `None` for the world
    /// baseline.
    ///
    /// Comparison is strictly-greater, so the first volume encountered at
    /// the maximum priority wins ties.
    pub fn dominant(&self) -> Option<&Arc<GradingVolume>> {
        let mut found: Option<&Arc<GradingVolume>> = None;
        for volume in &self.entered {
            match found {
                Some(best) if volume.priority() <= best.priority() => {}
                _ => found = Some(volume),
            }
        }
        found
    }

    /// Occupied volumes, most recently entered first.
    pub fn occupied(&self) -> &[Arc<GradingVolume>] {
        &self.entered
    }

    pub fn len(&self) -> usize {
        self.entered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume(name: &str, priority: i32) -> Arc<GradingVolume> {
        Arc::new(GradingVolume::new(name).with_priority(priority))
    }

    #[test]
    fn test_enter_is_idempotent() {
        let mut reg = VolumeRegistry::new();
        let v = volume("a", 0);
        reg.enter(v.clone());
        reg.enter(v);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_exit_nonmember_is_noop() {
        let mut reg = VolumeRegistry::new();
        let v = volume("a", 0);
        reg.exit(v.id());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_dominant_empty_is_none() {
        let reg = VolumeRegistry::new();
        assert!(reg.dominant().is_none());
    }

    #[test]
    fn test_dominant_highest_priority_wins() {
        let mut reg = VolumeRegistry::new();
        let low = volume("low", 1);
        let high = volume("high", 5);
        reg.enter(high.clone());
        reg.enter(low);
        assert_eq!(reg.dominant().unwrap().id(), high.id());
    }

    #[test]
    fn test_priority_tie_breaks_to_most_recent() {
        // Strictly-greater comparison over a front-inserted list: the most
        // recently entered of two equal-priority volumes is found first.
        let mut reg = VolumeRegistry::new();
        let first = volume("first", 3);
        let second = volume("second", 3);
        reg.enter(first);
        reg.enter(second.clone());
        assert_eq!(reg.dominant().unwrap().id(), second.id());
    }

    #[test]
    fn test_min_priority_volume_still_dominates_alone() {
        let mut reg = VolumeRegistry::new();
        let v = volume("floor", i32::MIN);
        reg.enter(v.clone());
        assert_eq!(reg.dominant().unwrap().id(), v.id());
    }

    #[test]
    fn test_exit_restores_previous_dominant() {
        let mut reg = VolumeRegistry::new();
        let a = volume("a", 1);
        let b = volume("b", 2);
        reg.enter(a.clone());
        reg.enter(b.clone());
        assert_eq!(reg.dominant().unwrap().id(), b.id());
        reg.exit(b.id());
        assert_eq!(reg.dominant().unwrap().id(), a.id());
    }
}
