use thiserror::Error;

use crate::entity_catalog::EntityError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CypherBuildError {
    #[error("Entity resolution failed: {0}")]
    Entity(#[from] EntityError),

    #[error("No alias is bound to an entity of type '{0}' (bind one with match_entity(..).alias(..) first)")]
    UnboundEntity(String),

    #[error("Malformed condition: {0}")]
    MalformedCondition(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Parameter '{name}' is already bound to a different value ({existing} vs {incoming})")]
    ParameterCollision {
        name: String,
        existing: String,
        incoming: String,
    },

    #[error("{}", join_errors(.0))]
    Multiple(Vec<CypherBuildError>),
}

impl CypherBuildError {
    /// Collapses accumulated errors into a single error, or `None` when empty.
    pub fn from_accumulated(mut errors: Vec<CypherBuildError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(CypherBuildError::Multiple(errors)),
        }
    }

    /// Flattened list of the underlying errors.
    pub fn errors(&self) -> Vec<&CypherBuildError> {
        match self {
            CypherBuildError::Multiple(inner) => inner.iter().flat_map(|e| e.errors()).collect(),
            other => vec![other],
        }
    }
}

fn join_errors(errors: &[CypherBuildError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
