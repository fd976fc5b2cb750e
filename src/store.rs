//! Rule store: incremental loading of named sources into the rule base.
//!
//! Each source identifier may be registered at most once per store.
//! Loading is additive; later definitions of a rule name are appended to
//! the overload set, never replacing earlier ones. Queries take an
//! immutable `Arc<RuleSet>` snapshot, so `load` and `clear` during live
//! sessions affect only future queries.

use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::ast::RuleSet;
use crate::error::LoadError;
use crate::parser;

/// The recognized rule-file extension (without the leading dot).
pub const RULE_FILE_EXTENSION: &str = "rules";

/// Holds the compiled rule base and the set of loaded source units.
#[derive(Default)]
pub struct RuleStore {
    /// source id -> raw text, in load order
    sources: IndexMap<String, String>,
    rules: Arc<RuleSet>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` and append its rules to the rule base.
    ///
    /// Fails with `DuplicateSource` if `source_id` was already loaded and
    /// with `Syntax` if the text does not parse; in both cases the prior
    /// rule base is untouched.
    pub fn load(&mut self, source_id: &str, text: &str) -> Result<(), LoadError> {
        if self.sources.contains_key(source_id) {
            return Err(LoadError::DuplicateSource(source_id.to_string()));
        }

        let rules = parser::parse_rules(source_id, text)?;
        let count = rules.len();

        // Clone-on-write: outstanding query snapshots keep the old set.
        Arc::make_mut(&mut self.rules).append(rules);
        self.sources
            .insert(source_id.to_string(), text.to_string());

        debug!(source = source_id, rules = count, "loaded rule source");
        Ok(())
    }

    /// Read a rule file and load it under its path as the source id.
    ///
    /// The extension is validated before touching the filesystem, so a
    /// missing path with the wrong extension reports `InvalidExtension`,
    /// not `NotFound`.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();

        if path.extension() != Some(OsStr::new(RULE_FILE_EXTENSION)) {
            return Err(LoadError::InvalidExtension(path.to_path_buf()));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound(path.to_path_buf())
            } else {
                LoadError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        self.load(&path.display().to_string(), &text)
    }

    /// Drop all rules and source registrations. Idempotent.
    pub fn clear(&mut self) {
        self.sources.clear();
        self.rules = Arc::new(RuleSet::new());
        debug!("cleared rule store");
    }

    /// Immutable snapshot of the rule base for one query session.
    pub fn snapshot(&self) -> Arc<RuleSet> {
        Arc::clone(&self.rules)
    }

    /// Loaded source identifiers, in load order.
    pub fn source_ids(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}
