//! The engine's value and pattern language.
//!
//! A `Term` is either a concrete value (integer, float, string, boolean,
//! list, opaque host-object handle) or a `Variable` placeholder that
//! resolution binds to a concrete term. Terms are immutable; once a
//! binding set is delivered it is an independent snapshot.

use std::collections::HashMap;
use std::fmt;

use crate::host::Handle;

/// A node in the value/pattern language.
#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    List(Vec<Term>),
    /// A placeholder resolved during search.
    Variable(String),
    /// An opaque handle into the host-object registry.
    Object(Handle),
}

/// One solution's variable-to-value assignment.
///
/// Keys are the variable names that appeared in the query goal. Each
/// binding set is an owned snapshot; mutating one never affects another.
pub type Bindings = HashMap<String, Term>;

impl Term {
    /// Shorthand for a variable term.
    pub fn var(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    /// The variant name, used in runtime error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Term::Integer(_) => "Integer",
            Term::Float(_) => "Float",
            Term::String(_) => "String",
            Term::Boolean(_) => "Boolean",
            Term::List(_) => "List",
            Term::Variable(_) => "Variable",
            Term::Object(_) => "Object",
        }
    }

    /// True if no variable occurs anywhere in the term.
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::List(items) => items.iter().all(Term::is_ground),
            _ => true,
        }
    }

    /// Append the names of all variables in the term, in first-occurrence
    /// order. Duplicates are skipped.
    pub fn collect_variables(&self, out: &mut Vec<String>) {
        match self {
            Term::Variable(name) => {
                if !out.iter().any(|v| v == name) {
                    out.push(name.clone());
                }
            }
            Term::List(items) => {
                for item in items {
                    item.collect_variables(out);
                }
            }
            _ => {}
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Integer(n) => write!(f, "{}", n),
            Term::Float(x) => write!(f, "{}", x),
            Term::String(s) => write!(f, "{:?}", s),
            Term::Boolean(b) => write!(f, "{}", b),
            Term::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Term::Variable(name) => write!(f, "{}", name),
            Term::Object(handle) => write!(f, "<object #{}>", handle),
        }
    }
}

impl From<i64> for Term {
    fn from(n: i64) -> Self {
        Term::Integer(n)
    }
}

impl From<f64> for Term {
    fn from(x: f64) -> Self {
        Term::Float(x)
    }
}

impl From<bool> for Term {
    fn from(b: bool) -> Self {
        Term::Boolean(b)
    }
}

impl From<&str> for Term {
    fn from(s: &str) -> Self {
        Term::String(s.to_string())
    }
}

impl From<String> for Term {
    fn from(s: String) -> Self {
        Term::String(s)
    }
}

impl From<Vec<Term>> for Term {
    fn from(items: Vec<Term>) -> Self {
        Term::List(items)
    }
}
