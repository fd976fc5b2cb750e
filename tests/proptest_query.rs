//! Property tests for query execution: delivery order and idempotence.

use proptest::prelude::*;
use verdict::{Engine, Term};

/// Render integer facts `f(n);` in the given order.
fn facts_source(values: &[i64]) -> String {
    values
        .iter()
        .map(|n| format!("f({});", n))
        .collect::<Vec<_>>()
        .join("\n")
}

proptest! {
    // Searches spawn a thread per query; keep the case count moderate.
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn solutions_preserve_fact_registration_order(
        values in prop::collection::vec(any::<i64>(), 1..16),
    ) {
        let mut engine = Engine::new();
        engine.load_str("facts", &facts_source(&values)).unwrap();

        let results = engine.query_rule("f", [Term::var("x")]).collect().unwrap();
        let delivered: Vec<_> = results.iter().map(|b| b["x"].clone()).collect();
        let expected: Vec<_> = values.iter().map(|&n| Term::Integer(n)).collect();
        prop_assert_eq!(delivered, expected);
    }

    #[test]
    fn repeated_queries_deliver_identical_sequences(
        values in prop::collection::vec(any::<i64>(), 0..12),
    ) {
        let mut engine = Engine::new();
        engine.load_str("facts", &facts_source(&values)).unwrap();
        engine.load_str("derived", "g(x) if f(x);").unwrap();

        let first = engine.query_rule("g", [Term::var("x")]).collect().unwrap();
        let second = engine.query_rule("g", [Term::var("x")]).collect().unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn ground_queries_decide_membership(
        values in prop::collection::vec(-50..50i64, 1..12),
        probe in -50..50i64,
    ) {
        let mut engine = Engine::new();
        engine.load_str("facts", &facts_source(&values)).unwrap();

        let results = engine
            .query_rule("f", [Term::Integer(probe)])
            .collect()
            .unwrap();
        let occurrences = values.iter().filter(|&&n| n == probe).count();
        prop_assert_eq!(results.len(), occurrences);
    }
}
