//! Backtracking resolution over the rule base.
//!
//! A `Session` is the live state of one query: a goal stack, a
//! substitution with trail, and an explicit stack of choice points. The
//! search is depth-first over registration-ordered rules, driven one
//! solution at a time by `advance`. Representing choice points
//! explicitly (rather than recursing on the host call stack) bounds
//! search depth by available memory and lets a session pause between
//! solutions while the consumer decides whether to pull more.
//!
//! # Resolution
//!
//! To solve `name(args)`, every rule with matching name and arity is
//! tried in registration order: the rule's variables are renamed fresh,
//! its head parameters are unified against the arguments, and on success
//! the body goals are pushed. Exhausting a branch (or asking for the
//! next solution) rewinds the trail to the most recent choice point and
//! tries its next alternative. A goal with zero matching rules simply
//! exhausts; it is not an error.
//!
//! Host callouts are synchronous: the session does not proceed past a
//! callout until the registry returns a term or a `RuntimeError`. A
//! runtime error terminates the session.

mod unify;

pub use unify::Substitution;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::trace;

use crate::ast::{Goal, Rule, RuleSet};
use crate::error::RuntimeError;
use crate::host::HostRegistry;
use crate::term::{Bindings, Term};

/// Outcome of one `advance` step.
#[derive(Debug)]
pub enum SolveEvent {
    /// One solution's variable bindings, an independent snapshot.
    Solution(Bindings),
    /// No more solutions. Terminal, and not an error.
    Exhausted,
    /// A runtime failure surfaced from a callout or a bad operation.
    /// Terminal.
    Fault(RuntimeError),
}

/// A pending alternative: the rules not yet tried for one invocation.
#[derive(Debug)]
struct ChoicePoint {
    /// Goal stack as it was below the invocation.
    saved_goals: Vec<Goal>,
    /// Trail position to rewind to before trying the next alternative.
    trail_mark: usize,
    /// The invocation's argument terms.
    args: Vec<Term>,
    /// Matching rules in registration order.
    candidates: Vec<Rule>,
    /// Index of the next candidate to try.
    next: usize,
}

/// The live state of one in-progress search.
pub struct Session {
    rules: Arc<RuleSet>,
    host: Arc<HostRegistry>,
    goals: Vec<Goal>,
    subst: Substitution,
    choice_points: Vec<ChoicePoint>,
    /// Variables of the original query goal, in first-occurrence order.
    query_vars: Vec<String>,
    rename_counter: u64,
    cancelled: Arc<AtomicBool>,
    emitted: bool,
    done: bool,
}

impl Session {
    /// Start a session for one goal against a rule-base snapshot.
    pub fn new(rules: Arc<RuleSet>, host: Arc<HostRegistry>, goal: Goal) -> Self {
        Self::with_cancel(rules, host, goal, Arc::new(AtomicBool::new(false)))
    }

    /// As `new`, with an externally owned cancellation flag. Once the
    /// flag is set the session exhausts on its next step.
    pub fn with_cancel(
        rules: Arc<RuleSet>,
        host: Arc<HostRegistry>,
        goal: Goal,
        cancelled: Arc<AtomicBool>,
    ) -> Self {
        let mut query_vars = Vec::new();
        collect_goal_variables(&goal, &mut query_vars);

        Self {
            rules,
            host,
            goals: vec![goal],
            subst: Substitution::new(),
            choice_points: Vec::new(),
            query_vars,
            rename_counter: 0,
            cancelled,
            emitted: false,
            done: false,
        }
    }

    /// Run the search until the next solution, exhaustion, or fault.
    pub fn advance(&mut self) -> SolveEvent {
        if self.done {
            return SolveEvent::Exhausted;
        }

        // Re-entry after a delivered solution: explore the remaining
        // alternatives.
        if self.emitted {
            self.emitted = false;
            if !self.backtrack() {
                self.done = true;
                return SolveEvent::Exhausted;
            }
        }

        loop {
            if self.cancelled.load(Ordering::Relaxed) {
                trace!("session cancelled");
                self.done = true;
                return SolveEvent::Exhausted;
            }

            let Some(goal) = self.goals.pop() else {
                // Empty goal stack: everything proved.
                self.emitted = true;
                return SolveEvent::Solution(self.capture());
            };

            let satisfied = match goal {
                Goal::Unify(left, right) => self.subst.unify(&left, &right),
                Goal::Callout {
                    receiver,
                    method,
                    args,
                } => match self.eval_callout(&receiver, &method, &args) {
                    Ok(result) => truthy(&result),
                    Err(fault) => {
                        self.done = true;
                        return SolveEvent::Fault(fault);
                    }
                },
                Goal::Invoke { name, args } => {
                    let candidates = self.rules.matching(&name, args.len());
                    trace!(rule = %name, arity = args.len(), candidates = candidates.len(), "invoke");
                    self.choice_points.push(ChoicePoint {
                        saved_goals: self.goals.clone(),
                        trail_mark: self.subst.mark(),
                        args,
                        candidates,
                        next: 0,
                    });
                    self.backtrack()
                }
            };

            if !satisfied && !self.backtrack() {
                self.done = true;
                return SolveEvent::Exhausted;
            }
        }
    }

    /// Rewind to the most recent choice point with an untried
    /// alternative, restore its goal stack, and enter that alternative.
    /// Returns false when every choice point is spent.
    fn backtrack(&mut self) -> bool {
        loop {
            let (trail_mark, rule, args, saved_goals) = {
                let Some(cp) = self.choice_points.last_mut() else {
                    return false;
                };
                if cp.next >= cp.candidates.len() {
                    self.choice_points.pop();
                    continue;
                }
                let rule = cp.candidates[cp.next].clone();
                cp.next += 1;
                (cp.trail_mark, rule, cp.args.clone(), cp.saved_goals.clone())
            };

            self.subst.undo_to(trail_mark);
            self.goals = saved_goals;

            let renamed = self.rename(&rule);
            if self.subst.unify_all(&args, &renamed.params) {
                for goal in renamed.body.into_iter().rev() {
                    self.goals.push(goal);
                }
                return true;
            }
            // Head mismatch: partial bindings are rewound when the loop
            // tries the next alternative.
        }
    }

    /// Clone a rule with all its variables renamed fresh for this
    /// application. `#` cannot appear in a surface-syntax identifier, so
    /// renamed variables never collide with query variables.
    fn rename(&mut self, rule: &Rule) -> Rule {
        let tag = self.rename_counter;
        self.rename_counter += 1;

        Rule {
            name: rule.name.clone(),
            params: rule.params.iter().map(|t| rename_term(t, tag)).collect(),
            body: rule.body.iter().map(|g| rename_goal(g, tag)).collect(),
        }
    }

    fn eval_callout(
        &self,
        receiver: &Term,
        method: &str,
        args: &[Term],
    ) -> Result<Term, RuntimeError> {
        let receiver = self.subst.resolve(receiver);
        let args: Vec<Term> = args.iter().map(|a| self.subst.resolve(a)).collect();

        match receiver {
            Term::Object(handle) => self.host.call(handle, method, &args),
            Term::Variable(name) => Err(RuntimeError::UnboundVariable(name)),
            other => Err(RuntimeError::UnsupportedMethod {
                type_name: other.type_name().to_string(),
                method: method.to_string(),
            }),
        }
    }

    /// Snapshot the query variables' current values.
    fn capture(&self) -> Bindings {
        self.query_vars
            .iter()
            .map(|name| {
                let value = self.subst.resolve(&Term::Variable(name.clone()));
                (name.clone(), value)
            })
            .collect()
    }
}

/// A callout result fails the goal only when it is `false`.
fn truthy(term: &Term) -> bool {
    !matches!(term, Term::Boolean(false))
}

fn collect_goal_variables(goal: &Goal, out: &mut Vec<String>) {
    match goal {
        Goal::Invoke { args, .. } => {
            for arg in args {
                arg.collect_variables(out);
            }
        }
        Goal::Callout { receiver, args, .. } => {
            receiver.collect_variables(out);
            for arg in args {
                arg.collect_variables(out);
            }
        }
        Goal::Unify(left, right) => {
            left.collect_variables(out);
            right.collect_variables(out);
        }
    }
}

fn rename_term(term: &Term, tag: u64) -> Term {
    match term {
        Term::Variable(name) => Term::Variable(format!("{}#{}", name, tag)),
        Term::List(items) => Term::List(items.iter().map(|t| rename_term(t, tag)).collect()),
        other => other.clone(),
    }
}

fn rename_goal(goal: &Goal, tag: u64) -> Goal {
    match goal {
        Goal::Invoke { name, args } => Goal::Invoke {
            name: name.clone(),
            args: args.iter().map(|t| rename_term(t, tag)).collect(),
        },
        Goal::Callout {
            receiver,
            method,
            args,
        } => Goal::Callout {
            receiver: rename_term(receiver, tag),
            method: method.clone(),
            args: args.iter().map(|t| rename_term(t, tag)).collect(),
        },
        Goal::Unify(left, right) => Goal::Unify(rename_term(left, tag), rename_term(right, tag)),
    }
}
