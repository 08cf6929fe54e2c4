//! Projection expressions for RETURN, WITH and ORDER BY.
//!
//! Expressions are plain query text. They are never parameterized, so only
//! pass caller-controlled identifiers and literals through them.

use std::fmt;

/// Expression text with an optional `AS` alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub text: String,
    pub alias: Option<String>,
}

impl Expression {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            alias: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into()).filter(|a: &String| !a.is_empty());
        self
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} AS {}", self.text, alias),
            None => f.write_str(&self.text),
        }
    }
}

impl From<&str> for Expression {
    fn from(value: &str) -> Self {
        Expression::new(value)
    }
}

impl From<String> for Expression {
    fn from(value: String) -> Self {
        Expression::new(value)
    }
}

impl From<&String> for Expression {
    fn from(value: &String) -> Self {
        Expression::new(value.as_str())
    }
}

/// `expression AS alias`
pub fn aliased(expression: impl Into<Expression>, alias: &str) -> Expression {
    expression.into().alias(alias)
}

fn call(function: &str, argument: &str) -> Expression {
    Expression::new(format!("{}({})", function, argument))
}

pub fn count(expression: &str) -> Expression {
    call("count", expression)
}

pub fn count_distinct(expression: &str) -> Expression {
    Expression::new(format!("count(DISTINCT {})", expression))
}

pub fn sum(expression: &str) -> Expression {
    call("sum", expression)
}

pub fn avg(expression: &str) -> Expression {
    call("avg", expression)
}

pub fn min(expression: &str) -> Expression {
    call("min", expression)
}

pub fn max(expression: &str) -> Expression {
    call("max", expression)
}

pub fn collect(expression: &str) -> Expression {
    call("collect", expression)
}

pub fn upper(expression: &str) -> Expression {
    call("toUpper", expression)
}

pub fn lower(expression: &str) -> Expression {
    call("toLower", expression)
}

pub fn round(expression: &str) -> Expression {
    call("round", expression)
}

pub fn abs(expression: &str) -> Expression {
    call("abs", expression)
}

pub fn size(expression: &str) -> Expression {
    call("size", expression)
}

/// `type(r)`: relationship type name.
pub fn type_of(relationship: &str) -> Expression {
    call("type", relationship)
}

pub fn labels(node: &str) -> Expression {
    call("labels", node)
}

pub fn keys(expression: &str) -> Expression {
    call("keys", expression)
}

pub fn id(expression: &str) -> Expression {
    call("id", expression)
}

/// `date()` for today, `date(expr)` otherwise.
pub fn date(expression: &str) -> Expression {
    call("date", expression)
}

pub fn datetime(expression: &str) -> Expression {
    call("datetime", expression)
}

pub fn timestamp() -> Expression {
    call("timestamp", "")
}

pub fn coalesce<I, S>(expressions: I) -> Expression
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let args: Vec<String> = expressions
        .into_iter()
        .map(|e| e.as_ref().to_string())
        .collect();
    call("coalesce", &args.join(", "))
}

pub fn shortest_path(pattern: &str) -> Expression {
    call("shortestPath", pattern)
}

pub fn all_shortest_paths(pattern: &str) -> Expression {
    call("allShortestPaths", pattern)
}

/// Existential subquery: `EXISTS { pattern }`.
pub fn exists(pattern: &str) -> Expression {
    Expression::new(format!("EXISTS {{ {} }}", pattern))
}

/// Searched CASE: `CASE WHEN c THEN r ... END`.
pub fn case() -> CaseBuilder {
    CaseBuilder::default()
}

/// Simple CASE over a subject: `CASE expr WHEN v THEN r ... END`.
pub fn case_of(subject: &str) -> CaseBuilder {
    CaseBuilder {
        subject: Some(subject.to_string()),
        ..CaseBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CaseBuilder {
    subject: Option<String>,
    branches: Vec<(String, String)>,
    otherwise: Option<String>,
}

impl CaseBuilder {
    pub fn when(mut self, condition: &str, result: &str) -> Self {
        self.branches.push((condition.to_string(), result.to_string()));
        self
    }

    pub fn otherwise(mut self, result: &str) -> Self {
        self.otherwise = Some(result.to_string());
        self
    }

    pub fn end(self) -> Expression {
        let mut parts = vec!["CASE".to_string()];
        if let Some(subject) = self.subject {
            parts.push(subject);
        }
        for (condition, result) in self.branches {
            parts.push(format!("WHEN {} THEN {}", condition, result));
        }
        if let Some(otherwise) = self.otherwise {
            parts.push(format!("ELSE {}", otherwise));
        }
        parts.push("END".to_string());
        Expression::new(parts.join(" "))
    }
}
