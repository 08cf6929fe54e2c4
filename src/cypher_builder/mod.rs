//! Fluent assembly of parameterized Cypher queries.
//!
//! [`QueryBuilder`] keeps an ordered list of clauses and a parameter table.
//! Entity-driven clauses (`match_entity`, `create_entity`, ...) are held back
//! until an alias is supplied with [`QueryBuilder::alias`]; any other call
//! finalizes them as anonymous nodes first. Every value that reaches the query
//! goes through a `$placeholder`, never into the text.
//!
//! ```
//! use cypher_norm::cypher_builder::{condition::gt, QueryBuilder};
//! use cypher_norm::cypher_entity;
//!
//! cypher_entity! {
//!     #[derive(Debug, Default)]
//!     pub struct User {
//!         pub username: String => "username",
//!         pub age: i64 => "age,omitempty",
//!     }
//! }
//!
//! let user = User { username: "alice".into(), ..Default::default() };
//! let result = QueryBuilder::new()
//!     .match_entity(&user)
//!     .alias("u")
//!     .where_(gt("age", 25))
//!     .return_(["u.username"])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     result.query,
//!     "MATCH (u:User {username: $username_1})\nWHERE (u.age > $u_age_2)\nRETURN u.username"
//! );
//! assert!(result.valid);
//! ```

pub mod ast;
pub mod condition;
pub mod errors;
pub mod expression;
pub mod parameters;
pub mod pattern;

use serde::Serialize;
use serde_json::Value;

use crate::config::BuilderConfig;
use crate::entity_catalog::{Entity, EntityDescriptor, EntityError};
use crate::query_validator::{QueryValidator, ValidationError};

pub use ast::{
    Clause, ClauseType, Condition, Direction, LogicalGroup, LogicalOperator, NodePattern,
    Operator, Pattern, Predicate, RelationshipPattern, VariableLengthSpec,
};
pub use condition::ConditionRenderer;
pub use errors::CypherBuildError;
pub use expression::Expression;
pub use parameters::{ParameterBinder, ParameterTable};
pub use pattern::{entity_node, node, PatternRenderer};

/// Terminal output of [`QueryBuilder::build`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub query: String,
    pub parameters: ParameterTable,
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

#[derive(Debug, Clone)]
struct PendingEntity {
    clause_type: ClauseType,
    type_name: &'static str,
    descriptor: EntityDescriptor,
}

#[derive(Debug, Clone, Default)]
enum PendingState {
    #[default]
    Idle,
    Pending(PendingEntity),
}

/// An alias introduced by `alias()` for a rendered entity.
#[derive(Debug, Clone)]
struct EntityBinding {
    alias: String,
    type_name: &'static str,
    descriptor: EntityDescriptor,
}

#[derive(Debug, Default)]
pub struct QueryBuilder {
    config: BuilderConfig,
    clauses: Vec<Clause>,
    binder: ParameterBinder,
    pending: PendingState,
    current_alias: Option<String>,
    bindings: Vec<EntityBinding>,
    errors: Vec<CypherBuildError>,
}

fn resolve_entity<E: Entity>(entity: &E) -> Result<(&'static str, EntityDescriptor), EntityError> {
    let schema = E::schema()?;
    let descriptor = schema.describe(entity.field_values()?)?;
    Ok((schema.type_name, descriptor))
}

fn join_items<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().trim().to_string())
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BuilderConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Clauses appended so far. A pending entity is not included.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn current_alias(&self) -> Option<&str> {
        self.current_alias.as_deref()
    }

    pub fn has_pending_entity(&self) -> bool {
        matches!(self.pending, PendingState::Pending(_))
    }

    fn push(&mut self, clause_type: ClauseType, content: impl Into<String>) {
        self.clauses.push(Clause::new(clause_type, content));
    }

    fn record(&mut self, error: impl Into<CypherBuildError>) {
        let error = error.into();
        log::debug!("Recorded build error: {}", error);
        self.errors.push(error);
    }

    /// Renders a pending entity as an anonymous node.
    fn finalize(&mut self) {
        if let PendingState::Pending(pending) = std::mem::take(&mut self.pending) {
            log::debug!(
                "Finalizing pending {} entity of type {} without alias",
                pending.clause_type,
                pending.type_name
            );
            self.emit_entity(&pending, "");
        }
    }

    fn emit_entity(&mut self, pending: &PendingEntity, alias: &str) {
        let with_properties = pending.clause_type != ClauseType::OptionalMatch;
        let node = NodePattern::from_descriptor(alias, &pending.descriptor, with_properties);
        match PatternRenderer::new(&mut self.binder, self.config.max_hops_warning).render_node(&node) {
            Ok(text) => self.push(pending.clause_type, text),
            Err(e) => self.record(e),
        }
    }

    fn begin_entity<E: Entity>(mut self, clause_type: ClauseType, entity: &E) -> Self {
        self.finalize();
        match resolve_entity(entity) {
            Ok((type_name, descriptor)) => {
                self.pending = PendingState::Pending(PendingEntity {
                    clause_type,
                    type_name,
                    descriptor,
                });
            }
            Err(e) => self.record(e),
        }
        self
    }

    /// Alias for a rendered entity: the caller's alias if given, otherwise
    /// the binding recorded for an equal entity, otherwise the only binding
    /// of that type.
    fn entity_alias<E: Entity>(&mut self, entity: &E, alias: &str) -> Option<String> {
        let alias = alias.trim();
        if !alias.is_empty() {
            return Some(alias.to_string());
        }

        let (type_name, descriptor) = match resolve_entity(entity) {
            Ok(resolved) => resolved,
            Err(e) => {
                self.record(e);
                return None;
            }
        };

        if let Some(binding) = self
            .bindings
            .iter()
            .rev()
            .find(|b| b.type_name == type_name && b.descriptor == descriptor)
        {
            return Some(binding.alias.clone());
        }

        let only = {
            let mut of_type = self.bindings.iter().filter(|b| b.type_name == type_name);
            match (of_type.next(), of_type.next()) {
                (Some(only), None) => Some(only.alias.clone()),
                _ => None,
            }
        };
        if only.is_none() {
            self.record(CypherBuildError::UnboundEntity(type_name.to_string()));
        }
        only
    }

    fn qualify(&self, property: &str) -> String {
        match &self.current_alias {
            Some(alias) if !property.contains('.') => format!("{}.{}", alias, property),
            _ => property.to_string(),
        }
    }

    fn literal(mut self, clause_type: ClauseType, content: &str) -> Self {
        self.finalize();
        self.push(clause_type, content.trim());
        self
    }

    pub fn match_(self, pattern: &str) -> Self {
        self.literal(ClauseType::Match, pattern)
    }

    pub fn optional_match(self, pattern: &str) -> Self {
        self.literal(ClauseType::OptionalMatch, pattern)
    }

    pub fn create(self, pattern: &str) -> Self {
        self.literal(ClauseType::Create, pattern)
    }

    pub fn merge(self, pattern: &str) -> Self {
        self.literal(ClauseType::Merge, pattern)
    }

    pub fn match_entity<E: Entity>(self, entity: &E) -> Self {
        self.begin_entity(ClauseType::Match, entity)
    }

    /// OPTIONAL MATCH on an entity renders its labels only.
    pub fn optional_match_entity<E: Entity>(self, entity: &E) -> Self {
        self.begin_entity(ClauseType::OptionalMatch, entity)
    }

    pub fn create_entity<E: Entity>(self, entity: &E) -> Self {
        self.begin_entity(ClauseType::Create, entity)
    }

    pub fn merge_entity<E: Entity>(self, entity: &E) -> Self {
        self.begin_entity(ClauseType::Merge, entity)
    }

    /// Completes a pending entity under `name`. With nothing pending it only
    /// changes the alias used to qualify bare property names.
    pub fn alias(mut self, name: &str) -> Self {
        let name = name.trim();
        match std::mem::take(&mut self.pending) {
            PendingState::Pending(pending) => {
                self.emit_entity(&pending, name);
                if !name.is_empty() {
                    self.bindings.push(EntityBinding {
                        alias: name.to_string(),
                        type_name: pending.type_name,
                        descriptor: pending.descriptor,
                    });
                }
            }
            PendingState::Idle => {}
        }
        self.current_alias = Some(name.to_string()).filter(|n| !n.is_empty());
        self
    }

    fn path(mut self, clause_type: ClauseType, pattern: &Pattern) -> Self {
        self.finalize();
        let rendered =
            PatternRenderer::new(&mut self.binder, self.config.max_hops_warning).render_path(pattern);
        match rendered {
            Ok(text) => self.push(clause_type, text),
            Err(e) => self.record(e),
        }
        self
    }

    pub fn match_path(self, pattern: &Pattern) -> Self {
        self.path(ClauseType::Match, pattern)
    }

    pub fn create_path(self, pattern: &Pattern) -> Self {
        self.path(ClauseType::Create, pattern)
    }

    pub fn merge_path(self, pattern: &Pattern) -> Self {
        self.path(ClauseType::Merge, pattern)
    }

    fn node_clause(mut self, clause_type: ClauseType, node: &NodePattern) -> Self {
        self.finalize();
        match PatternRenderer::new(&mut self.binder, self.config.max_hops_warning).render_node(node) {
            Ok(text) => self.push(clause_type, text),
            Err(e) => self.record(e),
        }
        self
    }

    pub fn match_node(self, node: &NodePattern) -> Self {
        self.node_clause(ClauseType::Match, node)
    }

    pub fn create_node(self, node: &NodePattern) -> Self {
        self.node_clause(ClauseType::Create, node)
    }

    pub fn merge_node(self, node: &NodePattern) -> Self {
        self.node_clause(ClauseType::Merge, node)
    }

    /// `WHERE <condition>`. A condition that renders empty adds nothing.
    pub fn where_(mut self, condition: impl Into<Condition>) -> Self {
        self.finalize();
        let condition: Condition = condition.into();
        let rendered = ConditionRenderer::new(&mut self.binder, self.current_alias.as_deref())
            .render_where(&condition);
        match rendered {
            Ok(text) if text.is_empty() => log::debug!("Skipping WHERE for empty condition"),
            Ok(text) => self.push(ClauseType::Where, text),
            Err(e) => self.record(e),
        }
        self
    }

    /// Conjunction of all conditions.
    pub fn where_all(self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.where_(condition::and(conditions))
    }

    pub fn where_raw(mut self, text: &str) -> Self {
        self.finalize();
        if !text.trim().is_empty() {
            self.push(ClauseType::Where, text.trim());
        }
        self
    }

    fn projection<I, E>(mut self, clause_type: ClauseType, items: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        self.finalize();
        let content = join_items(items.into_iter().map(|e| Into::<Expression>::into(e).to_string()));
        self.push(clause_type, content);
        self
    }

    pub fn return_<I, E>(self, items: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        self.projection(ClauseType::Return, items)
    }

    pub fn with<I, E>(self, items: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expression>,
    {
        self.projection(ClauseType::With, items)
    }

    fn entity_projection<E: Entity>(mut self, clause_type: ClauseType, entity: &E, alias: &str) -> Self {
        self.finalize();
        let Some(alias) = self.entity_alias(entity, alias) else {
            return self;
        };
        match E::schema() {
            Ok(schema) => {
                let content = join_items(schema.property_names().map(|p| format!("{}.{}", alias, p)));
                self.push(clause_type, content);
            }
            Err(e) => self.record(e),
        }
        self
    }

    /// `RETURN alias.p1, alias.p2, ...` over every non-excluded property.
    pub fn return_entity<E: Entity>(self, entity: &E, alias: &str) -> Self {
        self.entity_projection(ClauseType::Return, entity, alias)
    }

    pub fn with_entity<E: Entity>(self, entity: &E, alias: &str) -> Self {
        self.entity_projection(ClauseType::With, entity, alias)
    }

    pub fn order_by<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.finalize();
        let content = join_items(fields);
        self.push(ClauseType::OrderBy, content);
        self
    }

    pub fn skip(mut self, count: u64) -> Self {
        self.finalize();
        self.push(ClauseType::Skip, count.to_string());
        self
    }

    pub fn limit(mut self, count: u64) -> Self {
        self.finalize();
        self.push(ClauseType::Limit, count.to_string());
        self
    }

    /// Literal assignments, e.g. `["u.active = true", "u:Verified"]`.
    pub fn set<I, S>(mut self, assignments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.finalize();
        let content = join_items(assignments);
        self.push(ClauseType::Set, content);
        self
    }

    /// `SET <alias>.<property> = $placeholder`.
    pub fn set_value(mut self, property: &str, value: impl Into<Value>) -> Self {
        self.finalize();
        let property = property.trim();
        if property.is_empty() {
            self.record(CypherBuildError::MalformedCondition(
                "SET target has an empty property name".to_string(),
            ));
            return self;
        }
        let target = self.qualify(property);
        let placeholder = self.binder.bind(&target, value.into());
        self.push(ClauseType::Set, format!("{} = ${}", target, placeholder));
        self
    }

    /// Assigns every emitted property of the entity, in sorted key order.
    pub fn set_entity<E: Entity>(mut self, entity: &E, alias: &str) -> Self {
        self.finalize();
        let Some(alias) = self.entity_alias(entity, alias) else {
            return self;
        };
        let descriptor = match entity.describe() {
            Ok(descriptor) => descriptor,
            Err(e) => {
                self.record(e);
                return self;
            }
        };
        if descriptor.properties.is_empty() {
            log::debug!("Skipping SET for entity {} with no emitted properties", alias);
            return self;
        }

        let assignments: Vec<String> = descriptor
            .properties
            .into_iter()
            .map(|(key, value)| {
                let target = format!("{}.{}", alias, key);
                let placeholder = self.binder.bind(&target, value);
                format!("{} = ${}", target, placeholder)
            })
            .collect();
        self.push(ClauseType::Set, assignments.join(", "));
        self
    }

    /// `REMOVE alias.p, ...`. An empty property list removes every schema property.
    pub fn remove_properties<E, I, S>(mut self, entity: &E, alias: &str, properties: I) -> Self
    where
        E: Entity,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.finalize();
        let Some(alias) = self.entity_alias(entity, alias) else {
            return self;
        };

        let mut names: Vec<String> = properties
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if names.is_empty() {
            match E::schema() {
                Ok(schema) => names = schema.property_names().map(str::to_string).collect(),
                Err(e) => {
                    self.record(e);
                    return self;
                }
            }
        }

        let content = join_items(names.iter().map(|p| format!("{}.{}", alias, p)));
        self.push(ClauseType::Remove, content);
        self
    }

    pub fn delete<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.finalize();
        let content = join_items(items);
        self.push(ClauseType::Delete, content);
        self
    }

    pub fn detach_delete<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.finalize();
        let content = join_items(items);
        self.push(ClauseType::DetachDelete, content);
        self
    }

    fn delete_bound<E: Entity>(mut self, clause_type: ClauseType, entity: &E) -> Self {
        self.finalize();
        if let Some(alias) = self.entity_alias(entity, "") {
            self.push(clause_type, alias);
        }
        self
    }

    /// Deletes the alias bound to this entity by an earlier `alias()` call.
    pub fn delete_entity<E: Entity>(self, entity: &E) -> Self {
        self.delete_bound(ClauseType::Delete, entity)
    }

    pub fn detach_delete_entity<E: Entity>(self, entity: &E) -> Self {
        self.delete_bound(ClauseType::DetachDelete, entity)
    }

    /// `UNWIND <expression> AS <alias>` with a caller-supplied list expression.
    pub fn unwind(mut self, expression: &str, alias: &str) -> Self {
        self.finalize();
        self.push(ClauseType::Unwind, format!("{} AS {}", expression.trim(), alias.trim()));
        self
    }

    /// `UNWIND $list_n AS <alias>` with the values bound as one list parameter.
    pub fn unwind_values<I, V>(mut self, values: I, alias: &str) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.finalize();
        let list = Value::Array(values.into_iter().map(Into::into).collect());
        let placeholder = self.binder.bind("list", list);
        self.push(ClauseType::Unwind, format!("${} AS {}", placeholder, alias.trim()));
        self
    }

    fn merge_action<I, S>(mut self, clause_type: ClauseType, assignments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.finalize();
        let content = join_items(assignments);
        if content.is_empty() {
            log::debug!("Skipping {} with no assignments", clause_type);
            return self;
        }
        self.push(clause_type, format!("SET {}", content));
        self
    }

    /// `ON CREATE SET ...`, placed after a MERGE.
    pub fn on_create<I, S>(self, assignments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.merge_action(ClauseType::OnCreate, assignments)
    }

    pub fn on_match<I, S>(self, assignments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.merge_action(ClauseType::OnMatch, assignments)
    }

    pub fn use_database(self, name: &str) -> Self {
        self.literal(ClauseType::Use, name)
    }

    pub fn union(self) -> Self {
        self.literal(ClauseType::Union, "")
    }

    pub fn union_all(self) -> Self {
        self.literal(ClauseType::UnionAll, "")
    }

    /// `FOREACH (<variable> IN <list> | <update> <update> ...)`
    pub fn foreach<I, S>(mut self, variable: &str, list: &str, updates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.finalize();
        let updates: Vec<String> = updates
            .into_iter()
            .map(|u| u.as_ref().trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();
        self.push(
            ClauseType::Foreach,
            format!("({} IN {} | {})", variable.trim(), list.trim(), updates.join(" ")),
        );
        self
    }

    /// A builder for use with [`call`](Self::call). It shares this builder's
    /// placeholder counter and configuration.
    pub fn subquery(&self) -> QueryBuilder {
        QueryBuilder {
            config: self.config.clone(),
            binder: ParameterBinder::with_counter(self.binder.shared_counter()),
            ..QueryBuilder::default()
        }
    }

    /// Embeds a sub-builder as `CALL { ... }`, merging its parameters and
    /// recorded errors into this builder.
    pub fn call(mut self, mut sub: QueryBuilder) -> Self {
        self.finalize();
        sub.finalize();
        self.errors.append(&mut sub.errors);
        if let Err(e) = self.binder.merge(sub.binder.into_table()) {
            self.record(e);
        }

        let mut content = String::from("{\n");
        for clause in &sub.clauses {
            for line in clause.render().lines() {
                content.push_str("  ");
                content.push_str(line);
                content.push('\n');
            }
        }
        content.push('}');
        self.push(ClauseType::Call, content);
        self
    }

    /// Caller-named parameter, referenced in literal text as `$key`.
    pub fn set_parameter(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.finalize();
        self.binder.set(key, value.into());
        self
    }

    /// Finishes the query. Recorded resolution or reference errors fail the
    /// build; structural findings are reported in [`QueryResult::errors`].
    pub fn build(mut self) -> Result<QueryResult, CypherBuildError> {
        self.finalize();
        if let Some(err) = CypherBuildError::from_accumulated(std::mem::take(&mut self.errors)) {
            return Err(err);
        }

        let query = self
            .clauses
            .iter()
            .map(Clause::render)
            .collect::<Vec<_>>()
            .join("\n");
        let errors = if self.config.validate_on_build {
            QueryValidator::from_config(&self.config).validate(&query, self.binder.table())
        } else {
            Vec::new()
        };
        let parameters = self.binder.into_table();

        log::debug!(
            "Built query with {} clauses, {} parameters, {} validation findings",
            self.clauses.len(),
            parameters.len(),
            errors.len()
        );

        Ok(QueryResult {
            query,
            parameters,
            valid: errors.is_empty(),
            errors,
        })
    }
}
