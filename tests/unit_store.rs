//! Unit tests for the rule store: source registration, file loading,
//! and clearing.

use verdict::{LoadError, RuleStore};

#[test]
fn test_duplicate_source_fails_second_load() {
    let mut store = RuleStore::new();
    store.load("policy", "f(1);").unwrap();

    let err = store.load("policy", "f(2);").unwrap_err();
    assert!(matches!(err, LoadError::DuplicateSource(id) if id == "policy"));

    // The first load's rules remain active.
    assert_eq!(store.snapshot().len(), 1);
}

#[test]
fn test_distinct_sources_accumulate() {
    let mut store = RuleStore::new();
    store.load("a", "f(1);").unwrap();
    store.load("b", "f(2); g(3);").unwrap();

    assert_eq!(store.snapshot().len(), 3);
    let ids: Vec<_> = store.source_ids().collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn test_syntax_error_leaves_store_untouched() {
    let mut store = RuleStore::new();
    store.load("good", "f(1);").unwrap();

    let err = store.load("broken", "f(1").unwrap_err();
    assert!(matches!(err, LoadError::Syntax { .. }));
    assert_eq!(store.snapshot().len(), 1);

    // A failed load does not register the source id; the caller may
    // retry with corrected input.
    store.load("broken", "f(2);").unwrap();
    assert_eq!(store.snapshot().len(), 2);
}

#[test]
fn test_wrong_extension_is_rejected_before_existence() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = RuleStore::new();

    // The path does not exist, but the extension check comes first.
    let err = store.load_path(dir.path().join("policy.txt")).unwrap_err();
    assert!(matches!(err, LoadError::InvalidExtension(_)));
}

#[test]
fn test_missing_file_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = RuleStore::new();

    let err = store.load_path(dir.path().join("missing.rules")).unwrap_err();
    assert!(matches!(err, LoadError::NotFound(_)));
}

#[test]
fn test_load_path_registers_under_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("policy.rules");
    std::fs::write(&path, "allow(\"foo\", \"bar\", \"baz\");\n").unwrap();

    let mut store = RuleStore::new();
    store.load_path(&path).unwrap();
    assert_eq!(store.snapshot().len(), 1);

    // Loading the same file again is a duplicate registration.
    let err = store.load_path(&path).unwrap_err();
    assert!(matches!(err, LoadError::DuplicateSource(_)));
}

#[test]
fn test_clear_resets_rules_and_sources() {
    let mut store = RuleStore::new();
    store.load("policy", "f(1);").unwrap();

    store.clear();
    assert!(store.snapshot().is_empty());
    assert_eq!(store.source_ids().count(), 0);

    // Idempotent, and the same source id may be loaded again.
    store.clear();
    store.load("policy", "f(1);").unwrap();
    assert_eq!(store.snapshot().len(), 1);
}

#[test]
fn test_snapshot_is_immune_to_later_loads() {
    let mut store = RuleStore::new();
    store.load("a", "f(1);").unwrap();

    let snapshot = store.snapshot();
    store.load("b", "f(2);").unwrap();
    store.clear();

    // The earlier snapshot still sees exactly the rules at capture time.
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.matching("f", 1).len(), 1);
}
