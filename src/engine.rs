//! The embeddable engine facade.
//!
//! An `Engine` owns a rule store and a host-object registry, and issues
//! concurrent queries against them. `is_allowed` answers the common
//! "may this actor do this to this resource" question by querying the
//! three-argument `allow` rule and reducing the result stream to a
//! boolean.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::ast::Goal;
use crate::error::{LoadError, RuntimeError};
use crate::host::{HostObject, HostRegistry};
use crate::parser;
use crate::store::RuleStore;
use crate::stream::{spawn_query, Query};
use crate::term::Term;

/// The authorization decision engine.
///
/// Loading and clearing rules takes `&mut self`; queries take `&self`
/// and capture an immutable snapshot of the rule base, so in-flight
/// queries are unaffected by later loads.
#[derive(Default)]
pub struct Engine {
    store: RuleStore,
    host: Arc<HostRegistry>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load rule-language text under an inline source id.
    pub fn load_str(&mut self, source_id: &str, text: &str) -> Result<(), LoadError> {
        self.store.load(source_id, text)
    }

    /// Load a `.rules` file, using its path as the source id.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        self.store.load_path(path)
    }

    /// Remove all loaded rules and source registrations.
    pub fn clear_rules(&mut self) {
        self.store.clear();
    }

    /// Register a host object and get the term that refers to it.
    pub fn register_object(&self, object: Box<dyn HostObject>) -> Term {
        Term::Object(self.host.register(object))
    }

    /// Issue a structured query: a rule name plus argument terms.
    ///
    /// Never fails synchronously; an unknown rule name yields a query
    /// that exhausts with zero solutions.
    pub fn query_rule(&self, name: &str, args: impl IntoIterator<Item = Term>) -> Query {
        let goal = Goal::Invoke {
            name: name.to_string(),
            args: args.into_iter().collect(),
        };
        debug!(rule = name, "starting structured query");
        spawn_query(self.store.snapshot(), Arc::clone(&self.host), goal)
    }

    /// Parse and issue a textual query, e.g. `"f(x)"`.
    pub fn query_str(&self, text: &str) -> Result<Query, LoadError> {
        let goal = parser::parse_query(text)?;
        debug!(query = text, "starting textual query");
        Ok(spawn_query(self.store.snapshot(), Arc::clone(&self.host), goal))
    }

    /// Query `allow(subject, action, resource)` and reduce to a boolean:
    /// true iff at least one solution exists and no runtime error
    /// occurred. A runtime error is propagated even when solutions
    /// preceded it.
    pub fn is_allowed(
        &self,
        subject: impl Into<Term>,
        action: impl Into<Term>,
        resource: impl Into<Term>,
    ) -> Result<bool, RuntimeError> {
        let query = self.query_rule("allow", [subject.into(), action.into(), resource.into()]);
        let solutions = query.collect()?;
        let allowed = !solutions.is_empty();
        debug!(allowed, "authorization decision");
        Ok(allowed)
    }
}
