use thiserror::Error;

/// Failures while turning a tagged record into labels and properties.
///
/// Schemas are compiled once per type and the outcome is cached, so this type
/// is `Clone` and carries messages rather than boxed sources.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EntityError {
    #[error("Invalid tag '{tag}' on field '{field}': unknown option '{option}' (allowed: omitempty, -)")]
    UnknownTagOption {
        field: String,
        tag: String,
        option: String,
    },

    #[error("Invalid label tag '{tag}' on type '{type_name}' (expected 'label:Label1,Label2')")]
    InvalidLabelTag { type_name: String, tag: String },

    #[error("Invalid label '{label}' on type '{type_name}' (labels cannot contain whitespace or any of :()[]{{}})")]
    InvalidLabel { type_name: String, label: String },

    #[error("Property '{property}' is mapped by both '{first}' and '{second}' on type '{type_name}'")]
    DuplicateProperty {
        type_name: String,
        property: String,
        first: String,
        second: String,
    },

    #[error("Field '{field}' is not declared in the schema of type '{type_name}'")]
    UnknownField { type_name: String, field: String },

    #[error("Field '{field}' could not be converted to a property value: {message}")]
    Serialization { field: String, message: String },
}
