//! Unit tests for the engine facade: authorization decisions and host
//! object callouts.

use verdict::{Engine, HostObject, RuntimeError, Term};

struct Door {
    open: bool,
}

impl HostObject for Door {
    fn type_name(&self) -> &str {
        "Door"
    }

    fn call(&self, method: &str, args: &[Term]) -> Result<Term, RuntimeError> {
        match method {
            "IsOpen" => {
                if !args.is_empty() {
                    return Err(RuntimeError::ArityMismatch {
                        type_name: "Door".to_string(),
                        method: method.to_string(),
                        expected: 0,
                        got: args.len(),
                    });
                }
                Ok(Term::Boolean(self.open))
            }
            _ => Err(RuntimeError::UnsupportedMethod {
                type_name: "Door".to_string(),
                method: method.to_string(),
            }),
        }
    }
}

// ============================================================================
// is_allowed
// ============================================================================

#[test]
fn test_is_allowed_matches_fact() {
    let mut engine = Engine::new();
    engine
        .load_str("policy", "allow(\"foo\", \"bar\", \"baz\");")
        .unwrap();

    assert!(engine.is_allowed("foo", "bar", "baz").unwrap());
    // Same arguments in a different order match no fact.
    assert!(!engine.is_allowed("foo", "baz", "bar").unwrap());
}

#[test]
fn test_is_allowed_with_no_rules() {
    let engine = Engine::new();
    assert!(!engine.is_allowed("foo", "bar", "baz").unwrap());
}

#[test]
fn test_is_allowed_propagates_runtime_error() {
    let mut engine = Engine::new();
    engine
        .load_str("policy", "allow(actor, a, r) if actor.Missing();")
        .unwrap();

    let err = engine.is_allowed("foo", "bar", "baz").unwrap_err();
    assert_eq!(
        err,
        RuntimeError::UnsupportedMethod {
            type_name: "String".to_string(),
            method: "Missing".to_string(),
        }
    );
}

#[test]
fn test_is_allowed_via_derived_rule() {
    let mut engine = Engine::new();
    engine
        .load_str(
            "policy",
            "role(\"alice\", \"admin\");\n\
             allow(actor, a, r) if role(actor, \"admin\");",
        )
        .unwrap();

    assert!(engine.is_allowed("alice", "read", "report").unwrap());
    assert!(!engine.is_allowed("bob", "read", "report").unwrap());
}

// ============================================================================
// Host object callouts
// ============================================================================

#[test]
fn test_callout_success_satisfies_rule() {
    let mut engine = Engine::new();
    engine
        .load_str("policy", "can_enter(d) if d.IsOpen();")
        .unwrap();

    let open_door = engine.register_object(Box::new(Door { open: true }));
    let results = engine.query_rule("can_enter", [open_door]).collect().unwrap();
    assert_eq!(results.len(), 1);
}

#[test]
fn test_callout_false_fails_goal_without_error() {
    let mut engine = Engine::new();
    engine
        .load_str("policy", "can_enter(d) if d.IsOpen();")
        .unwrap();

    let closed_door = engine.register_object(Box::new(Door { open: false }));
    let results = engine
        .query_rule("can_enter", [closed_door])
        .collect()
        .unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_callout_unsupported_method_faults() {
    let mut engine = Engine::new();
    engine.load_str("policy", "probe(d) if d.Fake();").unwrap();

    let door = engine.register_object(Box::new(Door { open: true }));
    let err = engine.query_rule("probe", [door]).collect().unwrap_err();
    assert_eq!(
        err,
        RuntimeError::UnsupportedMethod {
            type_name: "Door".to_string(),
            method: "Fake".to_string(),
        }
    );
}

#[test]
fn test_callout_arity_mismatch_faults() {
    let mut engine = Engine::new();
    engine
        .load_str("policy", "probe(d) if d.IsOpen(1);")
        .unwrap();

    let door = engine.register_object(Box::new(Door { open: true }));
    let err = engine.query_rule("probe", [door]).collect().unwrap_err();
    assert!(matches!(err, RuntimeError::ArityMismatch { got: 1, .. }));
}

#[test]
fn test_object_handles_are_distinct() {
    let engine = Engine::new();
    let first = engine.register_object(Box::new(Door { open: true }));
    let second = engine.register_object(Box::new(Door { open: true }));
    assert_ne!(first, second);
}

#[test]
fn test_is_allowed_with_object_subject() {
    let mut engine = Engine::new();
    engine
        .load_str("policy", "allow(d, a, r) if d.IsOpen();")
        .unwrap();

    let open_door = engine.register_object(Box::new(Door { open: true }));
    let closed_door = engine.register_object(Box::new(Door { open: false }));

    assert!(engine.is_allowed(open_door, "pass", "hall").unwrap());
    assert!(!engine.is_allowed(closed_door, "pass", "hall").unwrap());
}
