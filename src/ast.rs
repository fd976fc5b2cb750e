//! Parsed representation of the rule language.
//!
//! A rule is a head (name plus parameter terms) and a body (a conjunction
//! of goals). Rules with the same name form an overload set tried in
//! registration order; loading is additive, never overwriting.

use indexmap::IndexMap;

use crate::term::Term;

/// One step of a rule body, or a query target.
#[derive(Clone, Debug, PartialEq)]
pub enum Goal {
    /// Invoke a rule by name: `parent(x, y)`.
    Invoke { name: String, args: Vec<Term> },
    /// Call a method on a host object: `user.HasRole("admin")`.
    Callout {
        receiver: Term,
        method: String,
        args: Vec<Term>,
    },
    /// Explicit unification: `x = y`.
    Unify(Term, Term),
}

/// A rule definition: head parameters plus a body conjunction.
///
/// A fact is a rule with an empty body.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub name: String,
    pub params: Vec<Term>,
    pub body: Vec<Goal>,
}

impl Rule {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// The accumulated rule base.
///
/// Overloads of one name keep load order; resolution tries them in that
/// order. Snapshots of a `RuleSet` are taken per query session, so the
/// set itself is never mutated while a search reads it.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: IndexMap<String, Vec<Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append parsed rules, preserving registration order within each
    /// overload set.
    pub fn append(&mut self, rules: Vec<Rule>) {
        for rule in rules {
            self.rules.entry(rule.name.clone()).or_default().push(rule);
        }
    }

    /// All rules with the given name and arity, in registration order.
    pub fn matching(&self, name: &str, arity: usize) -> Vec<Rule> {
        self.rules
            .get(name)
            .map(|overloads| {
                overloads
                    .iter()
                    .filter(|r| r.arity() == arity)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Total number of rules across all names.
    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}
