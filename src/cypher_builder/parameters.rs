//! Placeholder naming and the parameter table of one build session.
//!
//! Generated names are `<base>_<n>` where `n` comes from a counter that only
//! ever increases. Sub-builders share the counter of their parent so names
//! generated on either side never collide.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::Value;

use super::errors::CypherBuildError;

/// Placeholder name (without `$`) to bound value.
pub type ParameterTable = BTreeMap<String, Value>;

#[derive(Debug, Clone, Default)]
pub struct ParameterBinder {
    counter: Rc<Cell<usize>>,
    table: ParameterTable,
}

impl ParameterBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh table that draws suffixes from an existing counter.
    pub fn with_counter(counter: Rc<Cell<usize>>) -> Self {
        Self {
            counter,
            table: ParameterTable::new(),
        }
    }

    pub fn shared_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.counter)
    }

    /// Binds `value` under a fresh name derived from `base` and returns the
    /// name without the leading `$`.
    pub fn bind(&mut self, base: &str, value: Value) -> String {
        let base = sanitize_base(base);
        let name = loop {
            let next = self.counter.get() + 1;
            self.counter.set(next);
            let candidate = format!("{}_{}", base, next);
            if !self.table.contains_key(&candidate) {
                break candidate;
            }
        };
        log::trace!("Bound parameter ${} = {}", name, value);
        self.table.insert(name.clone(), value);
        name
    }

    /// Records a caller-named parameter verbatim, returning the value it replaced.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        let previous = self.table.insert(key.clone(), value);
        if previous.is_some() {
            log::warn!("Parameter ${} was already bound and has been overwritten", key);
        }
        previous
    }

    /// Folds another session's table into this one. Identical re-bindings are
    /// accepted; a name bound to a different value is a collision.
    pub fn merge(&mut self, other: ParameterTable) -> Result<(), CypherBuildError> {
        let mut collisions = Vec::new();
        for (name, value) in other {
            match self.table.get(&name) {
                Some(existing) if *existing != value => {
                    collisions.push(CypherBuildError::ParameterCollision {
                        name,
                        existing: existing.to_string(),
                        incoming: value.to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    self.table.insert(name, value);
                }
            }
        }

        match CypherBuildError::from_accumulated(collisions) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.table.get(name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn table(&self) -> &ParameterTable {
        &self.table
    }

    pub fn into_table(self) -> ParameterTable {
        self.table
    }
}

/// `u.age` -> `u_age`. Anything outside `[A-Za-z0-9_]` becomes `_`.
pub fn sanitize_base(base: &str) -> String {
    let sanitized: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if sanitized.is_empty() {
        "param".to_string()
    } else {
        sanitized
    }
}
