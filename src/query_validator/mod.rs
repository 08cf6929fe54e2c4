//! Structural checks over finished query text.
//!
//! This is a linter, not a parser: it looks for an empty query, unbalanced
//! brackets and the absence of any clause keyword. In strict mode it also
//! reports `$name` references missing from the parameter table. Clause order
//! and cross-clause semantics are never inspected.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::BuilderConfig;
use crate::cypher_builder::parameters::ParameterTable;

lazy_static::lazy_static! {
    static ref PARAMETER_REFERENCE: Regex =
        Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("parameter reference pattern is valid");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    EmptyQuery,
    BracketMismatch,
    NoValidClause,
    UndefinedParameter,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorKind::EmptyQuery => "empty_query",
            ValidationErrorKind::BracketMismatch => "bracket_mismatch",
            ValidationErrorKind::NoValidClause => "no_valid_clause",
            ValidationErrorKind::UndefinedParameter => "undefined_parameter",
        }
    }
}

impl std::fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One non-fatal finding. `position` is a byte offset into the query when it
/// can be pinned down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    #[serde(rename = "type")]
    pub kind: ValidationErrorKind,
    pub message: String,
    pub position: Option<usize>,
    pub suggestion: String,
}

#[derive(Debug, Clone)]
pub struct QueryValidator {
    strict_mode: bool,
    keywords: HashSet<String>,
}

impl Default for QueryValidator {
    fn default() -> Self {
        Self::from_config(&BuilderConfig::default())
    }
}

impl QueryValidator {
    pub fn new<I, S>(strict_mode: bool, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            strict_mode,
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_uppercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &BuilderConfig) -> Self {
        Self::new(config.strict_mode, &config.clause_keywords)
    }

    pub fn validate(&self, query: &str, parameters: &ParameterTable) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if query.trim().is_empty() {
            errors.push(ValidationError {
                kind: ValidationErrorKind::EmptyQuery,
                message: "Query cannot be empty".to_string(),
                position: Some(0),
                suggestion: "Provide a valid Cypher query".to_string(),
            });
            return errors;
        }

        if let Some(error) = check_brackets(query) {
            errors.push(error);
        }

        if !self.has_clause_keyword(query) {
            errors.push(ValidationError {
                kind: ValidationErrorKind::NoValidClause,
                message: "Query must contain at least one valid Cypher clause".to_string(),
                position: Some(0),
                suggestion: "Add MATCH, CREATE, MERGE, or another valid clause".to_string(),
            });
        }

        if self.strict_mode {
            errors.extend(check_parameters(query, parameters));
        }

        errors
    }

    fn has_clause_keyword(&self, query: &str) -> bool {
        query
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|word| !word.is_empty())
            .any(|word| self.keywords.contains(&word.to_uppercase()))
    }
}

/// Bracket balance over `()`, `[]` and `{}`, skipping quoted literals.
fn check_brackets(query: &str) -> Option<ValidationError> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (pos, ch) in query.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '\'' | '"' | '`' => quote = Some(ch),
            '(' | '[' | '{' => stack.push((ch, pos)),
            ')' | ']' | '}' => {
                let expected = match ch {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match stack.pop() {
                    Some((open, _)) if open == expected => {}
                    Some((open, open_pos)) => {
                        return Some(bracket_error(
                            format!(
                                "Mismatched brackets: '{}' at position {} closed by '{}'",
                                open, open_pos, ch
                            ),
                            pos,
                        ))
                    }
                    None => {
                        return Some(bracket_error(
                            format!("Mismatched brackets: unexpected '{}'", ch),
                            pos,
                        ))
                    }
                }
            }
            _ => {}
        }
    }

    stack.pop().map(|(open, pos)| {
        bracket_error(format!("Mismatched brackets: '{}' is never closed", open), pos)
    })
}

fn bracket_error(message: String, position: usize) -> ValidationError {
    ValidationError {
        kind: ValidationErrorKind::BracketMismatch,
        message,
        position: Some(position),
        suggestion: "Check that all parentheses (), square brackets [], and curly braces {} are correctly paired"
            .to_string(),
    }
}

fn check_parameters(query: &str, parameters: &ParameterTable) -> Vec<ValidationError> {
    let mut reported = HashSet::new();
    PARAMETER_REFERENCE
        .captures_iter(query)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?.as_str();
            if parameters.contains_key(name) || !reported.insert(name) {
                return None;
            }
            Some(ValidationError {
                kind: ValidationErrorKind::UndefinedParameter,
                message: format!("Parameter ${} is referenced but never bound", name),
                position: Some(whole.start()),
                suggestion: format!("Bind a value with set_parameter(\"{}\", ...)", name),
            })
        })
        .collect()
}
