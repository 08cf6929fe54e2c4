use serde_json::Value;

use super::descriptor::{is_empty_value, EntityDescriptor, Labels};
use super::errors::EntityError;
use super::tag::{parse_field_tag, parse_label_tag};

/// Raw declaration of one field: its Rust name and its tag string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: &'static str,
    pub tag: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySchema {
    pub field: &'static str,
    pub property: String,
    pub omit_empty: bool,
    /// Serialized zero value of the field's type, when the type declared one.
    pub zero: Option<Value>,
}

impl PropertySchema {
    /// `omitempty` test. Booleans are always kept. With a known zero value the
    /// field is omitted only when it equals that value, so `Some(0)` survives
    /// where `None` does not; without one the JSON zero check applies.
    pub fn omits(&self, value: &Value) -> bool {
        if !self.omit_empty || value.is_boolean() {
            return false;
        }
        match &self.zero {
            Some(zero) => value == zero,
            None => is_empty_value(value),
        }
    }
}

/// Compiled field table of an entity type.
///
/// Built once per type from the tag strings; excluded (`-`) fields are
/// dropped at compile time, so `properties` lists exactly the fields that can
/// reach the query, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySchema {
    pub type_name: &'static str,
    pub labels: Labels,
    pub properties: Vec<PropertySchema>,
    excluded: Vec<&'static str>,
}

impl EntitySchema {
    pub fn compile(
        type_name: &'static str,
        label_tag: Option<&str>,
        fields: &[FieldSpec],
    ) -> Result<Self, EntityError> {
        let labels = parse_label_tag(type_name, label_tag)?;
        let mut properties: Vec<PropertySchema> = Vec::with_capacity(fields.len());
        let mut excluded = Vec::new();

        for spec in fields {
            let tag = parse_field_tag(spec.field, spec.tag)?;
            if tag.skip {
                excluded.push(spec.field);
                continue;
            }

            if let Some(existing) = properties.iter().find(|p| p.property == tag.property) {
                return Err(EntityError::DuplicateProperty {
                    type_name: type_name.to_string(),
                    property: tag.property,
                    first: existing.field.to_string(),
                    second: spec.field.to_string(),
                });
            }

            properties.push(PropertySchema {
                field: spec.field,
                property: tag.property,
                omit_empty: tag.omit_empty,
                zero: None,
            });
        }

        log::debug!(
            "Compiled entity schema for {}: labels={:?}, {} properties, {} excluded",
            type_name,
            labels.as_slice(),
            properties.len(),
            excluded.len()
        );

        Ok(Self {
            type_name,
            labels,
            properties,
            excluded,
        })
    }

    /// Records the serialized `Default` value of each field's type. Fields not
    /// listed keep the JSON zero check.
    pub fn with_zero_values(mut self, zeros: Vec<(&'static str, Value)>) -> Self {
        for (field, zero) in zeros {
            if let Some(prop) = self.properties.iter_mut().find(|p| p.field == field) {
                prop.zero = Some(zero);
            }
        }
        self
    }

    /// Property names in field declaration order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.property.as_str())
    }

    pub fn property_for_field(&self, field: &str) -> Option<&PropertySchema> {
        self.properties.iter().find(|p| p.field == field)
    }

    /// Applies the compiled table to one instance's field values.
    pub fn describe(
        &self,
        values: Vec<(&'static str, Value)>,
    ) -> Result<EntityDescriptor, EntityError> {
        let mut descriptor = EntityDescriptor::new(self.labels.clone());

        for (field, value) in values {
            let Some(prop) = self.property_for_field(field) else {
                if self.excluded.contains(&field) {
                    continue;
                }
                return Err(EntityError::UnknownField {
                    type_name: self.type_name.to_string(),
                    field: field.to_string(),
                });
            };

            if prop.omits(&value) {
                continue;
            }
            descriptor.properties.insert(prop.property.clone(), value);
        }

        Ok(descriptor)
    }
}
