//! cypher-norm - Parameterized Cypher query assembly
//!
//! This crate turns fluent builder calls and tagged record types into Cypher
//! query text plus a table of bound parameter values:
//! - Entity catalog: field tags compiled into labels and property maps
//! - Query builder: clause sequencing, condition trees, graph patterns
//! - Structural validation of the finished query text
//!
//! No query is parsed or executed here; output is meant to be handed to a
//! graph database driver together with its parameter table.

pub mod config;
pub mod cypher_builder;
pub mod entity_catalog;
pub mod query_validator;

pub use config::{BuilderConfig, ConfigError};
pub use cypher_builder::{CypherBuildError, QueryBuilder, QueryResult};
pub use entity_catalog::{Entity, EntityDescriptor, EntityError};
pub use query_validator::{QueryValidator, ValidationError, ValidationErrorKind};
