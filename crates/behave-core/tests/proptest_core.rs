//! Property-based tests for dictionary sizing and registry wiring.

use behave_core::config::EngineConfig;
use behave_core::id::FunctionId;
use behave_core::prime::{MAX_PRIME, prime_gte};
use behave_core::registry::EngineRegistry;
use behave_core::test_utils::*;
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

/// A definition with `n` continuous variables and functions that each read
/// a random set of earlier variables and write one later variable.
fn arb_definition(max_vars: usize) -> impl Strategy<Value = String> {
    (2..=max_vars).prop_flat_map(|n| {
        proptest::collection::vec(
            (proptest::collection::vec(0..n, 0..4), 0..n),
            1..n * 2,
        )
        .prop_map(move |functions| {
            let mut doc = String::from("<definition>\n  <release number=\"1\" />\n");
            for i in 0..n {
                doc.push_str(&format!(
                    "  <variable name=\"v{i}\" type=\"continuous\" nativeUnits=\"ft/min\" />\n"
                ));
            }
            for (f, (inputs, output)) in functions.iter().enumerate() {
                doc.push_str(&format!("  <function name=\"f{f}\""));
                for input in inputs {
                    doc.push_str(&format!(" input=\"v{input}\""));
                }
                doc.push_str(&format!(" output=\"v{output}\" />\n"));
            }
            doc.push_str("</definition>\n");
            doc
        })
    })
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    /// Never below the request unless the table is exhausted.
    #[test]
    fn prime_gte_bounds(n in 0usize..20_000) {
        let p = prime_gte(n);
        if n <= MAX_PRIME {
            prop_assert!(p >= n);
        } else {
            prop_assert_eq!(p, MAX_PRIME);
        }
    }

    #[test]
    fn prime_gte_is_monotonic(a in 0usize..20_000, b in 0usize..20_000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(prime_gte(lo) <= prime_gte(hi));
    }

    #[test]
    fn prime_gte_is_idempotent(n in 0usize..20_000) {
        let p = prime_gte(n);
        prop_assert_eq!(prime_gte(p), p);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Each input and output attribute fills exactly one slot, and no slot
    /// is left empty.
    #[test]
    fn wiring_is_bijective(doc in arb_definition(20)) {
        let registry = EngineRegistry::from_definition(&doc, &EngineConfig::default())
            .expect("generated definition builds");

        let mut expected_consumers = vec![0usize; registry.variables().len()];
        let mut expected_producers = vec![0usize; registry.variables().len()];
        for (i, function) in registry.functions().iter().enumerate() {
            let id = FunctionId(i as u32);
            for v in &function.inputs {
                expected_consumers[v.index()] += 1;
                prop_assert!(registry.variable_by_id(*v).unwrap().consumers.iter().any(|&f| f == id));
            }
            for v in &function.outputs {
                expected_producers[v.index()] += 1;
                prop_assert!(registry.variable_by_id(*v).unwrap().producers.iter().any(|&f| f == id));
            }
        }
        for (i, variable) in registry.variables().iter().enumerate() {
            prop_assert!(variable.producers.is_filled());
            prop_assert!(variable.consumers.is_filled());
            prop_assert_eq!(variable.producers.len(), expected_producers[i]);
            prop_assert_eq!(variable.consumers.len(), expected_consumers[i]);
        }
    }

    /// Repeated attaches of one file leave a single value behind.
    #[test]
    fn reattach_is_idempotent(times in 1usize..6, number in 14u32..99) {
        let mut registry = sample_registry();
        let path = std::path::Path::new("FuelModels/custom.bpf");
        let text = fuel_model_with_code("CUSTOM", number);
        for _ in 0..times {
            registry.attach_fuel_model_str(path, &text).unwrap();
        }
        let list = registry.domain_list("FuelModelList").unwrap();
        prop_assert_eq!(list.len(), 14);
        prop_assert_eq!(
            list.values().iter().filter(|v| v.source.as_deref() == Some(path)).count(),
            1
        );
    }
}

#[test]
fn chain_definitions_build_at_every_size() {
    for n in [1, 2, 10, 200] {
        let registry =
            EngineRegistry::from_definition(&chain_definition(n), &EngineConfig::default())
                .unwrap();
        assert_eq!(registry.variables().len(), n);
        assert_eq!(registry.functions().len(), n - 1);
    }
}
