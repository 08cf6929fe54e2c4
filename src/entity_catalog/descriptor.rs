use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::EntityError;

/// Ordered set of node labels. First-seen order wins, duplicates and empty
/// labels are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels(Vec<String>);

impl Labels {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a label, returning `false` when it was empty or already present.
    pub fn add(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if label.is_empty() || self.contains(&label) {
            return false;
        }
        self.0.push(label);
        true
    }

    pub fn remove(&mut self, label: &str) -> bool {
        match self.0.iter().position(|l| l == label) {
            Some(idx) => {
                self.0.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for Labels {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut labels = Labels::new();
        for label in iter {
            labels.add(label);
        }
        labels
    }
}

impl<'a> IntoIterator for &'a Labels {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Resolved labels and properties of one record instance.
///
/// Properties live in a `BTreeMap` so every consumer sees them in sorted key
/// order, which keeps rendered patterns byte-identical across builds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub labels: Labels,
    pub properties: BTreeMap<String, Value>,
}

impl EntityDescriptor {
    pub fn new(labels: Labels) -> Self {
        Self {
            labels,
            properties: BTreeMap::new(),
        }
    }
}

/// Zero-value check used by `omitempty`.
///
/// Booleans are never empty: a `false` flag is meaningful and always emitted.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(_) => false,
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i == 0
            } else if let Some(u) = n.as_u64() {
                u == 0
            } else {
                n.as_f64().is_some_and(|f| f == 0.0)
            }
        }
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Converts a field into the JSON value model used for parameters.
pub fn to_property_value<T>(field: &str, value: &T) -> Result<Value, EntityError>
where
    T: Serialize + ?Sized,
{
    serde_json::to_value(value).map_err(|e| EntityError::Serialization {
        field: field.to_string(),
        message: e.to_string(),
    })
}
