//! Verdict: an embeddable authorization decision engine.
//!
//! Host applications load declarative rule definitions - facts and rules
//! over typed terms, including opaque references to host objects - and
//! issue queries to determine whether and how a goal can be satisfied.
//! Each query runs its backtracking search concurrently and streams
//! solutions back over a pair of channels (results and error), so the
//! consumer can pull lazily, observe partial results before a failure,
//! or abandon the query without leaking the search.
//!
//! ```no_run
//! use verdict::Engine;
//!
//! let mut engine = Engine::new();
//! engine.load_str("policy", r#"allow("alice", "read", "report");"#)?;
//! assert!(engine.is_allowed("alice", "read", "report")?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod ast;
pub mod engine;
pub mod error;
pub mod host;
pub mod lexer;
pub mod parser;
pub mod solver;
pub mod store;
pub mod stream;
pub mod term;

pub use ast::{Goal, Rule, RuleSet};
pub use engine::Engine;
pub use error::{LoadError, RuntimeError};
pub use host::{Handle, HostObject, HostRegistry};
pub use parser::{parse_query, parse_rules};
pub use solver::{Session, SolveEvent, Substitution};
pub use store::{RuleStore, RULE_FILE_EXTENSION};
pub use stream::Query;
pub use term::{Bindings, Term};
