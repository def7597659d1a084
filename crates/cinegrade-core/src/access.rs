//! By-name access to blendable parameters.

use serde::{Deserialize, Serialize};

use crate::field::FieldValue;

/// Capability trait for consumers exposing blendable parameters by name.
///
/// This replaces runtime reflection: a consumer declares component fields
/// as tagged values and the grading core reads and writes them by name.
/// Unknown components or fields yield `None`/`false`; callers treat both
/// as "not blendable" rather than as errors.
pub trait ComponentAccess {
    /// Read the current value of `component.field`, if exposed.
    fn get_field(&self, component: &str, field: &str) -> Option<FieldValue>;

    /// Write a value back into `component.field`.
    ///
    /// Returns `false` when the field does not exist or holds a different
    /// kind; the write is dropped in that case.
    fn set_field(&mut self, component: &str, field: &str, value: FieldValue) -> bool;
}

/// A plain insertion-ordered parameter table implementing [`ComponentAccess`].
///
/// Useful for consumers whose blendable state is data rather than struct
/// fields, and as the consumer side in tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldTable {
    components: Vec<TableComponent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableComponent {
    name: String,
    fields: Vec<(String, FieldValue)>,
}

impl FieldTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a field, creating the component if needed.
    pub fn insert(&mut self, component: &str, field: &str, value: FieldValue) {
        let idx = match self.components.iter().position(|c| c.name == component) {
            Some(i) => i,
            None => {
                self.components.push(TableComponent {
                    name: component.to_owned(),
                    fields: Vec::new(),
                });
                self.components.len() - 1
            }
        };
        let comp = &mut self.components[idx];
        match comp.fields.iter_mut().find(|(n, _)| n == field) {
            Some((_, v)) => *v = value,
            None => comp.fields.push((field.to_owned(), value)),
        }
    }

    /// Component names in insertion order.
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|c| c.name.as_str())
    }
}

impl ComponentAccess for FieldTable {
    fn get_field(&self, component: &str, field: &str) -> Option<FieldValue> {
        self.components
            .iter()
            .find(|c| c.name == component)?
            .fields
            .iter()
            .find(|(n, _)| n == field)
            .map(|(_, v)| *v)
    }

    fn set_field(&mut self, component: &str, field: &str, value: FieldValue) -> bool {
        let Some(comp) = self.components.iter_mut().find(|c| c.name == component) else {
            return false;
        };
        match comp.fields.iter_mut().find(|(n, _)| n == field) {
            Some((_, v)) if v.kind() == value.kind() => {
                *v = value;
                true
            }
            _ => false,
        }
    }
}
