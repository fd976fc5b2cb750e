//! Unification over terms, with a trail for backtracking.
//!
//! The substitution is a flat variable -> term map. `walk` follows
//! variable chains to the representative term; `resolve` additionally
//! rebuilds lists so the result is fully dereferenced. Bindings made by
//! a failed unification are not rolled back here; the solver rewinds
//! them through the trail when it backtracks.

use std::collections::HashMap;

use crate::term::Term;

/// Variable bindings plus the trail of names bound since session start.
#[derive(Debug, Default)]
pub struct Substitution {
    bindings: HashMap<String, Term>,
    trail: Vec<String>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current trail position, for a later `undo_to`.
    pub fn mark(&self) -> usize {
        self.trail.len()
    }

    /// Unbind every variable bound since `mark`.
    pub fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            if let Some(name) = self.trail.pop() {
                self.bindings.remove(&name);
            }
        }
    }

    /// Follow variable chains to the representative term. Stops at the
    /// first unbound variable or non-variable term.
    pub fn walk<'a>(&'a self, term: &'a Term) -> &'a Term {
        let mut current = term;
        while let Term::Variable(name) = current {
            match self.bindings.get(name) {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    /// Deep dereference: walk the term and rebuild lists so no bound
    /// variable remains anywhere inside. Unbound variables stay as
    /// themselves.
    pub fn resolve(&self, term: &Term) -> Term {
        let walked = self.walk(term).clone();
        match walked {
            Term::List(items) => Term::List(items.iter().map(|i| self.resolve(i)).collect()),
            other => other,
        }
    }

    fn bind(&mut self, name: String, term: Term) {
        self.trail.push(name.clone());
        self.bindings.insert(name, term);
    }

    /// Attempt to unify two terms, binding variables as needed.
    ///
    /// Variables unify by sharing: binding one side makes later goals
    /// observe the binding through `walk`. Concrete terms unify only
    /// with the same variant (no numeric coercion across Integer/Float).
    pub fn unify(&mut self, left: &Term, right: &Term) -> bool {
        let l = self.walk(left).clone();
        let r = self.walk(right).clone();

        match (l, r) {
            (Term::Variable(a), Term::Variable(b)) if a == b => true,
            (Term::Variable(a), t) => {
                self.bind(a, t);
                true
            }
            (t, Term::Variable(b)) => {
                self.bind(b, t);
                true
            }
            (Term::Integer(a), Term::Integer(b)) => a == b,
            (Term::Float(a), Term::Float(b)) => a == b,
            (Term::String(a), Term::String(b)) => a == b,
            (Term::Boolean(a), Term::Boolean(b)) => a == b,
            (Term::Object(a), Term::Object(b)) => a == b,
            (Term::List(a), Term::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| self.unify(x, y))
            }
            _ => false,
        }
    }

    /// Unify two sequences pairwise. Fails fast on the first mismatch;
    /// the caller is responsible for rewinding partial bindings.
    pub fn unify_all(&mut self, left: &[Term], right: &[Term]) -> bool {
        left.len() == right.len() && left.iter().zip(right.iter()).all(|(l, r)| self.unify(l, r))
    }
}
