use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

/// Keyword that introduces one output line.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ClauseType {
    Match,
    OptionalMatch,
    Create,
    Merge,
    Where,
    Set,
    Delete,
    DetachDelete,
    Remove,
    Return,
    With,
    OrderBy,
    Skip,
    Limit,
    OnCreate,
    OnMatch,
    Unwind,
    Union,
    UnionAll,
    Use,
    Call,
    Foreach,
}

impl ClauseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClauseType::Match => "MATCH",
            ClauseType::OptionalMatch => "OPTIONAL MATCH",
            ClauseType::Create => "CREATE",
            ClauseType::Merge => "MERGE",
            ClauseType::Where => "WHERE",
            ClauseType::Set => "SET",
            ClauseType::Delete => "DELETE",
            ClauseType::DetachDelete => "DETACH DELETE",
            ClauseType::Remove => "REMOVE",
            ClauseType::Return => "RETURN",
            ClauseType::With => "WITH",
            ClauseType::OrderBy => "ORDER BY",
            ClauseType::Skip => "SKIP",
            ClauseType::Limit => "LIMIT",
            ClauseType::OnCreate => "ON CREATE",
            ClauseType::OnMatch => "ON MATCH",
            ClauseType::Unwind => "UNWIND",
            ClauseType::Union => "UNION",
            ClauseType::UnionAll => "UNION ALL",
            ClauseType::Use => "USE",
            ClauseType::Call => "CALL",
            ClauseType::Foreach => "FOREACH",
        }
    }
}

impl fmt::Display for ClauseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Clause {
    pub clause_type: ClauseType,
    pub content: String,
}

impl Clause {
    pub fn new(clause_type: ClauseType, content: impl Into<String>) -> Self {
        Self {
            clause_type,
            content: content.into(),
        }
    }

    /// `<KEYWORD> <content>`, or just the keyword when there is no content.
    pub fn render(&self) -> String {
        if self.content.is_empty() {
            self.clause_type.as_str().to_string()
        } else {
            format!("{} {}", self.clause_type.as_str(), self.content)
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Operator {
    Equal,            // =
    NotEqual,         // <>
    LessThan,         // <
    LessThanEqual,    // <=
    GreaterThan,      // >
    GreaterThanEqual, // >=
    // String predicates
    Contains,   // CONTAINS
    StartsWith, // STARTS WITH
    EndsWith,   // ENDS WITH
    RegexMatch, // =~
    In,         // IN $list
    // post fix
    IsNull,
    IsNotNull,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "<>",
            Operator::LessThan => "<",
            Operator::LessThanEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanEqual => ">=",
            Operator::Contains => "CONTAINS",
            Operator::StartsWith => "STARTS WITH",
            Operator::EndsWith => "ENDS WITH",
            Operator::RegexMatch => "=~",
            Operator::In => "IN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
        }
    }

    /// Post-fix operators take no right-hand operand.
    pub fn is_postfix(&self) -> bool {
        matches!(self, Operator::IsNull | Operator::IsNotNull)
    }
}

impl From<Operator> for String {
    fn from(value: Operator) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LogicalOperator {
    And,
    Or,
    Xor,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
            LogicalOperator::Xor => "XOR",
        }
    }
}

impl From<LogicalOperator> for String {
    fn from(value: LogicalOperator) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Predicate {
    pub property: String,
    pub operator: Operator,
    pub value: Value,
    pub not: bool,
}

#[derive(Debug, PartialEq, Clone)]
pub struct LogicalGroup {
    pub operator: LogicalOperator,
    pub conditions: Vec<Condition>,
}

/// Boolean predicate tree passed to `where_`.
#[derive(Debug, PartialEq, Clone)]
pub enum Condition {
    Predicate(Predicate),
    Group(LogicalGroup),
}

impl From<Predicate> for Condition {
    fn from(value: Predicate) -> Self {
        Condition::Predicate(value)
    }
}

impl From<LogicalGroup> for Condition {
    fn from(value: LogicalGroup) -> Self {
        Condition::Group(value)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Direction {
    #[default]
    Outgoing, // `-[]->`
    Incoming, // `<-[]-`
    Both,     // `-[]-`
}

/// Represents variable-length path specifications like *1..3, *..5, *2..
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct VariableLengthSpec {
    pub min_hops: Option<u32>,
    pub max_hops: Option<u32>,
}

impl VariableLengthSpec {
    /// Create a fixed-length spec: *2..2
    pub fn fixed(hops: u32) -> Self {
        Self {
            min_hops: Some(hops),
            max_hops: Some(hops),
        }
    }

    /// Create a range spec: *1..3
    pub fn range(min: u32, max: u32) -> Self {
        Self {
            min_hops: Some(min),
            max_hops: Some(max),
        }
    }

    /// Create an upper-bounded spec: *..5
    pub fn max_only(max: u32) -> Self {
        Self {
            min_hops: None,
            max_hops: Some(max),
        }
    }

    /// Create a lower-bounded spec: *2..
    pub fn min_only(min: u32) -> Self {
        Self {
            min_hops: Some(min),
            max_hops: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_hops.is_none() && self.max_hops.is_none()
    }

    /// Pattern suffix, empty when neither bound is set.
    pub fn suffix(&self) -> String {
        match (self.min_hops, self.max_hops) {
            (Some(min), Some(max)) => format!("*{}..{}", min, max),
            (Some(min), None) => format!("*{}..", min),
            (None, Some(max)) => format!("*..{}", max),
            (None, None) => String::new(),
        }
    }

    /// Rejects `min > max`. Large upper bounds are allowed but logged.
    pub fn validate(&self, max_hops_warning: u32) -> Result<(), String> {
        if let (Some(min), Some(max)) = (self.min_hops, self.max_hops) {
            if min > max {
                return Err(format!(
                    "Invalid variable-length range: minimum hops ({}) cannot be greater than maximum hops ({}). \
                     Use *{}..{} instead of *{}..{}.",
                    min, max, max, min, min, max
                ));
            }
        }

        if let Some(max) = self.max_hops {
            if max > max_hops_warning {
                log::warn!(
                    "Variable-length path with maximum {} hops may have performance implications. \
                     Consider using a smaller maximum or adding WHERE filters.",
                    max
                );
            }
        }

        if self.min_hops == Some(0) {
            log::debug!("Variable-length path with 0 hops matches the same node");
        }

        Ok(())
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct NodePattern {
    pub variable: Option<String>,
    pub labels: Vec<String>,
    pub properties: BTreeMap<String, Value>,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct RelationshipPattern {
    pub variable: Option<String>,
    pub rel_type: Option<String>,
    pub direction: Direction,
    pub variable_length: Option<VariableLengthSpec>,
    pub properties: BTreeMap<String, Value>,
}

/// `(start)-[relationship]->(end)`
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Pattern {
    pub start: NodePattern,
    pub relationship: RelationshipPattern,
    pub end: NodePattern,
}
