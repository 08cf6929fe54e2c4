//! Tag grammar for entity fields and types.
//!
//! Field tags: `<propertyName>[,omitempty]`, or `-` (also `<name>,-`) to
//! always exclude the field. An empty property name falls back to the
//! lower-cased field name.
//!
//! Type tags: `label:Label1,Label2,...`. When absent, or when no valid label
//! survives trimming, the type name is the only label.

use super::descriptor::Labels;
use super::errors::EntityError;

const LABEL_PREFIX: &str = "label:";
const OPTION_OMIT_EMPTY: &str = "omitempty";
const OPTION_SKIP: &str = "-";

/// Parsed form of a single field tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTag {
    pub property: String,
    pub omit_empty: bool,
    pub skip: bool,
}

pub fn parse_field_tag(field: &str, tag: &str) -> Result<FieldTag, EntityError> {
    let tag = tag.trim();
    if tag == OPTION_SKIP {
        return Ok(FieldTag {
            property: field.to_lowercase(),
            omit_empty: false,
            skip: true,
        });
    }

    let mut parts = tag.split(',').map(str::trim);
    let property = match parts.next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => field.to_lowercase(),
    };

    let mut parsed = FieldTag {
        property,
        omit_empty: false,
        skip: false,
    };

    for option in parts {
        match option {
            OPTION_OMIT_EMPTY => parsed.omit_empty = true,
            OPTION_SKIP => parsed.skip = true,
            "" => {}
            other => {
                return Err(EntityError::UnknownTagOption {
                    field: field.to_string(),
                    tag: tag.to_string(),
                    option: other.to_string(),
                })
            }
        }
    }

    Ok(parsed)
}

pub fn parse_label_tag(type_name: &str, tag: Option<&str>) -> Result<Labels, EntityError> {
    let mut labels = Labels::new();

    if let Some(tag) = tag {
        let body = tag
            .trim()
            .strip_prefix(LABEL_PREFIX)
            .ok_or_else(|| EntityError::InvalidLabelTag {
                type_name: type_name.to_string(),
                tag: tag.to_string(),
            })?;

        for label in body.split(',').map(str::trim).filter(|l| !l.is_empty()) {
            validate_label(type_name, label)?;
            labels.add(label);
        }
    }

    if labels.is_empty() {
        validate_label(type_name, type_name)?;
        labels.add(type_name);
    }

    Ok(labels)
}

/// Labels and relationship types: non-empty, no whitespace, no pattern
/// delimiters.
pub fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && !label
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ':' | '(' | ')' | '[' | ']' | '{' | '}'))
}

fn validate_label(type_name: &str, label: &str) -> Result<(), EntityError> {
    if !is_valid_label(label) {
        return Err(EntityError::InvalidLabel {
            type_name: type_name.to_string(),
            label: label.to_string(),
        });
    }
    Ok(())
}
