//! Node, relationship and path pattern text.
//!
//! Property maps are always parameterized and emitted in sorted key order,
//! so the same pattern renders to the same text on every build.

use std::collections::BTreeMap;

use regex::Regex;
use serde_json::Value;

use super::ast::{Direction, NodePattern, Pattern, RelationshipPattern, VariableLengthSpec};
use super::errors::CypherBuildError;
use super::parameters::ParameterBinder;
use crate::entity_catalog::tag::is_valid_label;
use crate::entity_catalog::{Entity, EntityDescriptor, EntityError};

lazy_static::lazy_static! {
    static ref IDENTIFIER: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid");
}

fn check_identifier(kind: &str, name: &str) -> Result<(), CypherBuildError> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(CypherBuildError::InvalidPattern(format!(
            "invalid {} '{}': expected letters, digits and underscores",
            kind, name
        )))
    }
}

fn check_label(kind: &str, label: &str) -> Result<(), CypherBuildError> {
    if is_valid_label(label) {
        Ok(())
    } else {
        Err(CypherBuildError::InvalidPattern(format!(
            "invalid {} '{}': whitespace and pattern delimiters are not allowed",
            kind, label
        )))
    }
}

/// Shorthand for `NodePattern::named(variable).labels(labels)`.
pub fn node<I, S>(variable: &str, labels: I) -> NodePattern
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    NodePattern::named(variable).labels(labels)
}

/// Labels-only node pattern for an entity. Property values are not used.
pub fn entity_node<E: Entity>(entity: &E, variable: &str) -> Result<NodePattern, EntityError> {
    let descriptor = entity.describe()?;
    Ok(NodePattern::named(variable).labels(descriptor.labels.iter().cloned()))
}

impl NodePattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(variable: &str) -> Self {
        Self {
            variable: Some(variable.to_string()).filter(|v| !v.is_empty()),
            ..Self::default()
        }
    }

    /// Node built from a resolved entity, optionally keeping its properties.
    pub fn from_descriptor(variable: &str, descriptor: &EntityDescriptor, with_properties: bool) -> Self {
        let mut node = Self::named(variable).labels(descriptor.labels.iter().cloned());
        if with_properties {
            node.properties = descriptor.properties.clone();
        }
        node
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        if !label.is_empty() && !self.labels.contains(&label) {
            self.labels.push(label);
        }
        self
    }

    pub fn labels<I, S>(self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        labels.into_iter().fold(self, |node, label| node.label(label))
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

impl RelationshipPattern {
    fn with_direction(rel_type: &str, direction: Direction) -> Self {
        Self {
            rel_type: Some(rel_type.to_string()).filter(|t| !t.is_empty()),
            direction,
            ..Self::default()
        }
    }

    pub fn outgoing(rel_type: &str) -> Self {
        Self::with_direction(rel_type, Direction::Outgoing)
    }

    pub fn incoming(rel_type: &str) -> Self {
        Self::with_direction(rel_type, Direction::Incoming)
    }

    pub fn both(rel_type: &str) -> Self {
        Self::with_direction(rel_type, Direction::Both)
    }

    pub fn variable(mut self, variable: &str) -> Self {
        self.variable = Some(variable.to_string()).filter(|v| !v.is_empty());
        self
    }

    pub fn min_length(mut self, min: u32) -> Self {
        let spec = self.variable_length.get_or_insert_with(VariableLengthSpec::default);
        spec.min_hops = Some(min);
        self
    }

    pub fn max_length(mut self, max: u32) -> Self {
        let spec = self.variable_length.get_or_insert_with(VariableLengthSpec::default);
        spec.max_hops = Some(max);
        self
    }

    pub fn var_length(mut self, min: u32, max: u32) -> Self {
        self.variable_length = Some(VariableLengthSpec::range(min, max));
        self
    }

    /// Exactly `hops` hops, rendered `*n..n`.
    pub fn hops(mut self, hops: u32) -> Self {
        self.variable_length = Some(VariableLengthSpec::fixed(hops));
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

impl Pattern {
    pub fn new(start: NodePattern, relationship: RelationshipPattern, end: NodePattern) -> Self {
        Self {
            start,
            relationship,
            end,
        }
    }
}

pub struct PatternRenderer<'a> {
    binder: &'a mut ParameterBinder,
    max_hops_warning: u32,
}

impl<'a> PatternRenderer<'a> {
    pub fn new(binder: &'a mut ParameterBinder, max_hops_warning: u32) -> Self {
        Self {
            binder,
            max_hops_warning,
        }
    }

    /// `(<variable>:<L1>:<L2> {k: $k_n})`
    pub fn render_node(&mut self, node: &NodePattern) -> Result<String, CypherBuildError> {
        let mut text = String::from("(");
        if let Some(variable) = &node.variable {
            check_identifier("node variable", variable)?;
            text.push_str(variable);
        }
        for label in &node.labels {
            check_label("label", label)?;
            text.push(':');
            text.push_str(label);
        }
        text.push_str(&self.render_properties(&node.properties)?);
        text.push(')');
        Ok(text)
    }

    pub fn render_relationship(
        &mut self,
        relationship: &RelationshipPattern,
    ) -> Result<String, CypherBuildError> {
        let mut inner = String::new();
        if let Some(variable) = &relationship.variable {
            check_identifier("relationship variable", variable)?;
            inner.push_str(variable);
        }
        if let Some(rel_type) = &relationship.rel_type {
            check_label("relationship type", rel_type)?;
            inner.push(':');
            inner.push_str(rel_type);
        }
        if let Some(spec) = relationship.variable_length.filter(|s| !s.is_empty()) {
            spec.validate(self.max_hops_warning)
                .map_err(CypherBuildError::InvalidPattern)?;
            inner.push_str(&spec.suffix());
        }
        inner.push_str(&self.render_properties(&relationship.properties)?);

        Ok(match relationship.direction {
            Direction::Outgoing => format!("-[{}]->", inner),
            Direction::Incoming => format!("<-[{}]-", inner),
            Direction::Both => format!("-[{}]-", inner),
        })
    }

    pub fn render_path(&mut self, pattern: &Pattern) -> Result<String, CypherBuildError> {
        let start = self.render_node(&pattern.start)?;
        let relationship = self.render_relationship(&pattern.relationship)?;
        let end = self.render_node(&pattern.end)?;
        Ok(format!("{}{}{}", start, relationship, end))
    }

    /// ` {a: $a_1, b: $b_2}` with a leading space, or empty. Keys are checked
    /// before anything is bound.
    fn render_properties(
        &mut self,
        properties: &BTreeMap<String, Value>,
    ) -> Result<String, CypherBuildError> {
        if properties.is_empty() {
            return Ok(String::new());
        }
        for key in properties.keys() {
            check_identifier("property key", key)?;
        }
        let entries: Vec<String> = properties
            .iter()
            .map(|(key, value)| {
                let placeholder = self.binder.bind(key, value.clone());
                format!("{}: ${}", key, placeholder)
            })
            .collect();
        Ok(format!(" {{{}}}", entries.join(", ")))
    }
}
