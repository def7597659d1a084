//! Captured parameter snapshots and snapshot interpolation.
//!
//! A [`ComponentSnapshot`] freezes the blendable fields of one effect
//! component; an [`EffectSnapshot`] freezes every blend-enabled component
//! of a consumer. Snapshots are immutable once captured: transitions
//! interpolate between two snapshots and write the result back through
//! [`ComponentAccess`].
//!
//! Interpolation follows the drop-missing rule throughout: a field or
//! component present on only one side simply does not appear in the
//! result. A parameter the target does not also expose cannot blend.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::access::ComponentAccess;
use crate::field::FieldValue;
use crate::selector::BlendSelector;

/// Named fields captured from one effect component, in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSnapshot {
    name: String,
    fields: SmallVec<[(String, FieldValue); 8]>,
}

impl ComponentSnapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: SmallVec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert or overwrite a field, keeping insertion order.
    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) {
        let field = field.into();
        match self.fields.iter_mut().find(|(n, _)| *n == field) {
            Some((_, v)) => *v = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == field)
            .map(|(_, v)| v)
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Interpolate toward `other` at `t`.
    ///
    /// Only fields present in both snapshots under the same name and kind
    /// appear in the result; everything else is dropped.
    pub fn interpolate(&self, other: &ComponentSnapshot, t: f32) -> ComponentSnapshot {
        let mut result = ComponentSnapshot::new(self.name.clone());
        for (name, a) in self.fields() {
            let Some(b) = other.get(name) else { continue };
            if let Some(v) = FieldValue::interpolate(a, b, t) {
                result.fields.push((name.to_owned(), v));
            }
        }
        result
    }
}

/// All blend-enabled component snapshots of one grading consumer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectSnapshot {
    components: Vec<ComponentSnapshot>,
}

impl EffectSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the consumer's live values through a selector.
    ///
    /// Only components and fields the selector marks blendable are sampled;
    /// fields the consumer does not expose are skipped, and components that
    /// yield no fields are not recorded. Selector order is preserved.
    pub fn capture(consumer: &dyn ComponentAccess, selector: &BlendSelector) -> Self {
        let mut snapshot = Self::new();
        for comp_sel in selector.enabled_components() {
            let mut comp = ComponentSnapshot::new(comp_sel.name.clone());
            for field_sel in comp_sel.enabled_fields() {
                if let Some(value) = consumer.get_field(&comp_sel.name, &field_sel.name) {
                    comp.set(field_sel.name.clone(), value);
                }
            }
            if !comp.is_empty() {
                snapshot.components.push(comp);
            }
        }
        snapshot
    }

    /// Insert or replace a component snapshot by name.
    pub fn insert(&mut self, component: ComponentSnapshot) {
        match self
            .components
            .iter_mut()
            .find(|c| c.name() == component.name())
        {
            Some(slot) => *slot = component,
            None => self.components.push(component),
        }
    }

    pub fn component(&self, name: &str) -> Option<&ComponentSnapshot> {
        self.components.iter().find(|c| c.name() == name)
    }

    /// Components in insertion order.
    pub fn components(&self) -> impl Iterator<Item = &ComponentSnapshot> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Interpolate toward `other` at `t`, dropping components present on
    /// only one side.
    pub fn interpolate(&self, other: &EffectSnapshot, t: f32) -> EffectSnapshot {
        let mut result = EffectSnapshot::new();
        for comp in &self.components {
            let Some(other_comp) = other.component(comp.name()) else {
                continue;
            };
            result.components.push(comp.interpolate(other_comp, t));
        }
        result
    }

    /// Write every captured field back into the consumer by name.
    ///
    /// Fields the consumer no longer exposes are silently skipped.
    pub fn apply_to(&self, consumer: &mut dyn ComponentAccess) {
        for comp in &self.components {
            for (field, value) in comp.fields() {
                consumer.set_field(comp.name(), field, *value);
            }
        }
    }

    /// Write interpolated values straight into the consumer.
    ///
    /// Equivalent to `self.interpolate(other, t).apply_to(consumer)`
    /// without building the intermediate snapshot; this is the per-tick
    /// path of an active volume blend.
    pub fn blend_apply(&self, consumer: &mut dyn ComponentAccess, other: &EffectSnapshot, t: f32) {
        for comp in &self.components {
            let Some(other_comp) = other.component(comp.name()) else {
                continue;
            };
            for (field, a) in comp.fields() {
                let Some(b) = other_comp.get(field) else {
                    continue;
                };
                if let Some(v) = FieldValue::interpolate(a, b, t) {
                    consumer.set_field(comp.name(), field, v);
                }
            }
        }
    }
}
