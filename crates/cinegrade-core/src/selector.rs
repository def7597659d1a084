//! Blend selectors: which components and fields participate in blending.
//!
//! A selector is configuration, owned and mutated by tooling; the runtime
//! only reads it when capturing snapshots. Both levels carry an explicit
//! blend flag so a component can stay registered while disabled.

use serde::{Deserialize, Serialize};

/// Blend eligibility of a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelector {
    pub name: String,
    pub blend: bool,
}

/// Blend eligibility of one component and its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSelector {
    pub name: String,
    pub blend: bool,
    pub fields: Vec<FieldSelector>,
}

impl ComponentSelector {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blend: false,
            fields: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSelector> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields marked blendable, in insertion order.
    pub fn enabled_fields(&self) -> impl Iterator<Item = &FieldSelector> {
        self.fields.iter().filter(|f| f.blend)
    }

    /// Names of fields marked blendable.
    pub fn enabled_field_names(&self) -> Vec<&str> {
        self.enabled_fields().map(|f| f.name.as_str()).collect()
    }
}

/// Declarative mask over a consumer's components and fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlendSelector {
    pub components: Vec<ComponentSelector>,
}

impl BlendSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn component(&self, name: &str) -> Option<&ComponentSelector> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Components marked blendable, in insertion order.
    pub fn enabled_components(&self) -> impl Iterator<Item = &ComponentSelector> {
        self.components.iter().filter(|c| c.blend)
    }

    /// Register a component if absent and set its blend flag.
    pub fn set_component_blend(&mut self, component: &str, blend: bool) {
        let comp = self.component_entry(component);
        comp.blend = blend;
    }

    /// Register a field if absent and set its blend flag.
    ///
    /// Enabling a field also enables its component; a component with every
    /// field disabled is pointless but allowed.
    pub fn set_field_blend(&mut self, component: &str, field: &str, blend: bool) {
        let comp = self.component_entry(component);
        if blend {
            comp.blend = true;
        }
        match comp.fields.iter_mut().find(|f| f.name == field) {
            Some(f) => f.blend = blend,
            None => comp.fields.push(FieldSelector {
                name: field.to_owned(),
                blend,
            }),
        }
    }

    fn component_entry(&mut self, name: &str) -> &mut ComponentSelector {
        let idx = match self.components.iter().position(|c| c.name == name) {
            Some(i) => i,
            None => {
                self.components.push(ComponentSelector::new(name));
                self.components.len() - 1
            }
        };
        &mut self.components[idx]
    }
}
