//! Predicate constructors and the condition tree renderer.
//!
//! ```
//! use cypher_norm::cypher_builder::condition::{eq, gt, or};
//! use cypher_norm::cypher_builder::QueryBuilder;
//!
//! let result = QueryBuilder::new()
//!     .match_("(u:User)")
//!     .alias("u")
//!     .where_(or([gt("age", 25), eq("active", true)]))
//!     .return_(["u"])
//!     .build()
//!     .unwrap();
//! assert!(result.query.contains("WHERE (u.age > $u_age_1 OR u.active = $u_active_2)"));
//! ```

use serde_json::Value;

use super::ast::{Condition, LogicalGroup, LogicalOperator, Operator, Predicate};
use super::errors::CypherBuildError;
use super::parameters::ParameterBinder;

fn predicate(property: impl Into<String>, operator: Operator, value: Value) -> Condition {
    Condition::Predicate(Predicate {
        property: property.into(),
        operator,
        value,
        not: false,
    })
}

fn group(operator: LogicalOperator, conditions: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::Group(LogicalGroup {
        operator,
        conditions: conditions.into_iter().collect(),
    })
}

pub fn eq(property: impl Into<String>, value: impl Into<Value>) -> Condition {
    predicate(property, Operator::Equal, value.into())
}

pub fn ne(property: impl Into<String>, value: impl Into<Value>) -> Condition {
    predicate(property, Operator::NotEqual, value.into())
}

pub fn gt(property: impl Into<String>, value: impl Into<Value>) -> Condition {
    predicate(property, Operator::GreaterThan, value.into())
}

pub fn gte(property: impl Into<String>, value: impl Into<Value>) -> Condition {
    predicate(property, Operator::GreaterThanEqual, value.into())
}

pub fn lt(property: impl Into<String>, value: impl Into<Value>) -> Condition {
    predicate(property, Operator::LessThan, value.into())
}

pub fn lte(property: impl Into<String>, value: impl Into<Value>) -> Condition {
    predicate(property, Operator::LessThanEqual, value.into())
}

pub fn contains(property: impl Into<String>, value: impl Into<Value>) -> Condition {
    predicate(property, Operator::Contains, value.into())
}

pub fn starts_with(property: impl Into<String>, value: impl Into<Value>) -> Condition {
    predicate(property, Operator::StartsWith, value.into())
}

pub fn ends_with(property: impl Into<String>, value: impl Into<Value>) -> Condition {
    predicate(property, Operator::EndsWith, value.into())
}

pub fn regex(property: impl Into<String>, pattern: impl Into<String>) -> Condition {
    predicate(property, Operator::RegexMatch, Value::String(pattern.into()))
}

/// `property IN $list`. The value must be a JSON array.
pub fn in_list(property: impl Into<String>, values: impl Into<Value>) -> Condition {
    predicate(property, Operator::In, values.into())
}

pub fn is_null(property: impl Into<String>) -> Condition {
    predicate(property, Operator::IsNull, Value::Null)
}

pub fn is_not_null(property: impl Into<String>) -> Condition {
    predicate(property, Operator::IsNotNull, Value::Null)
}

/// Inclusive range, expanded to `property >= low AND property <= high`.
pub fn between(
    property: impl Into<String>,
    low: impl Into<Value>,
    high: impl Into<Value>,
) -> Condition {
    let property = property.into();
    and([gte(property.clone(), low), lte(property, high)])
}

pub fn and(conditions: impl IntoIterator<Item = Condition>) -> Condition {
    group(LogicalOperator::And, conditions)
}

pub fn or(conditions: impl IntoIterator<Item = Condition>) -> Condition {
    group(LogicalOperator::Or, conditions)
}

pub fn xor(conditions: impl IntoIterator<Item = Condition>) -> Condition {
    group(LogicalOperator::Xor, conditions)
}

/// Negation. Predicates toggle their flag; groups are rewritten with
/// De Morgan's law (XOR chains negate their first operand).
pub fn not(condition: Condition) -> Condition {
    match condition {
        Condition::Predicate(mut p) => {
            p.not = !p.not;
            Condition::Predicate(p)
        }
        Condition::Group(LogicalGroup {
            operator: LogicalOperator::And,
            conditions,
        }) => or(conditions.into_iter().map(not)),
        Condition::Group(LogicalGroup {
            operator: LogicalOperator::Or,
            conditions,
        }) => and(conditions.into_iter().map(not)),
        Condition::Group(LogicalGroup {
            operator: LogicalOperator::Xor,
            conditions,
        }) => {
            let mut conditions = conditions.into_iter();
            let first = conditions.next().map(not);
            xor(first.into_iter().chain(conditions))
        }
    }
}

/// Renders condition trees, binding every operand through the session binder.
pub struct ConditionRenderer<'a> {
    binder: &'a mut ParameterBinder,
    alias: Option<&'a str>,
}

impl<'a> ConditionRenderer<'a> {
    pub fn new(binder: &'a mut ParameterBinder, alias: Option<&'a str>) -> Self {
        Self {
            binder,
            alias: alias.filter(|a| !a.is_empty()),
        }
    }

    /// Body of a WHERE clause. A lone predicate gets one paren pair; groups
    /// bring their own. Empty text means the clause should be dropped.
    pub fn render_where(&mut self, condition: &Condition) -> Result<String, CypherBuildError> {
        let text = self.render(condition)?;
        match condition {
            Condition::Predicate(_) if !text.is_empty() => Ok(format!("({})", text)),
            _ => Ok(text),
        }
    }

    pub fn render(&mut self, condition: &Condition) -> Result<String, CypherBuildError> {
        match condition {
            Condition::Predicate(p) => self.render_predicate(p),
            Condition::Group(g) => self.render_group(g),
        }
    }

    fn render_group(&mut self, group: &LogicalGroup) -> Result<String, CypherBuildError> {
        let mut parts = Vec::with_capacity(group.conditions.len());
        for child in &group.conditions {
            let text = self.render(child)?;
            if !text.is_empty() {
                parts.push(text);
            }
        }

        if parts.is_empty() {
            return Ok(String::new());
        }
        let separator = format!(" {} ", group.operator.as_str());
        Ok(format!("({})", parts.join(&separator)))
    }

    fn render_predicate(&mut self, predicate: &Predicate) -> Result<String, CypherBuildError> {
        let property = predicate.property.trim();
        if property.is_empty() {
            return Err(CypherBuildError::MalformedCondition(format!(
                "predicate with operator '{}' has an empty property name",
                predicate.operator.as_str()
            )));
        }
        if predicate.operator == Operator::In && !predicate.value.is_array() {
            return Err(CypherBuildError::MalformedCondition(format!(
                "IN on '{}' requires a list value, got {}",
                property, predicate.value
            )));
        }

        let property = self.qualify(property);
        let text = if predicate.operator.is_postfix() {
            format!("{} {}", property, predicate.operator.as_str())
        } else {
            let placeholder = self.binder.bind(&property, predicate.value.clone());
            format!("{} {} ${}", property, predicate.operator.as_str(), placeholder)
        };

        if predicate.not {
            Ok(format!("NOT ({})", text))
        } else {
            Ok(text)
        }
    }

    fn qualify(&self, property: &str) -> String {
        match self.alias {
            Some(alias) if !property.contains('.') => format!("{}.{}", alias, property),
            _ => property.to_string(),
        }
    }
}
