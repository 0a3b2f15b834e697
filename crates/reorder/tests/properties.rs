// Property-based tests for the reorder algorithm.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use topicorder_reorder::{reorder, Record};

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Small id alphabet so documents and order lists overlap often.
fn arb_id() -> impl Strategy<Value = String> {
    r"[a-f]{1,2}"
}

fn arb_extra() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<i32>().prop_map(|n| json!(n)),
        r"[a-zA-Zé中 ]{0,8}".prop_map(|s| json!(s)),
        proptest::collection::vec(any::<u8>(), 0..3).prop_map(|v| json!(v)),
    ]
}

fn make_record(id: &str, n: usize, extra: Value) -> Record {
    let mut fields = Map::new();
    fields.insert("id".to_string(), json!(id));
    fields.insert("title".to_string(), json!(format!("{id}-{n}")));
    fields.insert("extra".to_string(), extra);
    Record::from_fields(fields, "id").unwrap()
}

/// Documents with possibly repeated ids.
fn arb_document() -> impl Strategy<Value = Vec<Record>> {
    proptest::collection::vec((arb_id(), arb_extra()), 0..12).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(n, (id, extra))| make_record(&id, n, extra))
            .collect()
    })
}

/// Documents with unique ids.
fn arb_unique_document() -> impl Strategy<Value = Vec<Record>> {
    arb_document().prop_map(|records| {
        let mut seen = HashSet::new();
        records.into_iter().filter(|r| seen.insert(r.id.clone())).collect()
    })
}

fn arb_order() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(arb_id(), 0..12)
}

fn first_occurrences(order: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    order.iter().filter(|id| seen.insert(id.as_str())).cloned().collect()
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    /// Output is exactly the listed ids present in the document, in order-list order.
    #[test]
    fn output_is_listed_subset_in_order(doc in arb_document(), order in arb_order()) {
        let present: HashSet<String> = doc.iter().map(|r| r.id.clone()).collect();
        let expected: Vec<String> = first_occurrences(&order)
            .into_iter()
            .filter(|id| present.contains(id))
            .collect();

        let outcome = reorder(doc, &order);
        let ids: Vec<String> = outcome.ids().iter().map(|s| s.to_string()).collect();
        prop_assert_eq!(ids, expected);
    }

    /// dropped / missing partition the symmetric difference of the two id sets.
    #[test]
    fn report_accounts_for_every_id(doc in arb_document(), order in arb_order()) {
        let doc_ids: HashSet<String> = doc.iter().map(|r| r.id.clone()).collect();
        let order_ids: HashSet<String> = order.iter().cloned().collect();

        let outcome = reorder(doc, &order);
        let dropped: HashSet<String> = outcome.dropped.iter().cloned().collect();
        let missing: HashSet<String> = outcome.missing.iter().cloned().collect();

        prop_assert_eq!(dropped.len(), outcome.dropped.len());
        prop_assert_eq!(missing.len(), outcome.missing.len());
        prop_assert_eq!(dropped, doc_ids.difference(&order_ids).cloned().collect::<HashSet<_>>());
        prop_assert_eq!(missing, order_ids.difference(&doc_ids).cloned().collect::<HashSet<_>>());
    }

    /// Reordering an already reordered sequence changes nothing.
    #[test]
    fn idempotent(doc in arb_document(), order in arb_order()) {
        let once = reorder(doc, &order);
        let twice = reorder(once.records.clone(), &order);
        prop_assert_eq!(&twice.records, &once.records);
        prop_assert!(!twice.changed);
        prop_assert!(twice.dropped.is_empty());
        prop_assert!(twice.shadowed.is_empty());
    }

    /// Each kept record is the last document record with that id, field for field.
    #[test]
    fn records_pass_through(doc in arb_document(), order in arb_order()) {
        let mut last: HashMap<String, Record> = HashMap::new();
        for r in &doc {
            last.insert(r.id.clone(), r.clone());
        }

        let outcome = reorder(doc, &order);
        for r in &outcome.records {
            prop_assert_eq!(Some(r), last.get(&r.id));
        }
    }

    /// A permutation of a unique-id document keeps every record.
    #[test]
    fn permutation_is_exact(doc in arb_unique_document(), seed in any::<u64>()) {
        let mut order: Vec<String> = doc.iter().map(|r| r.id.clone()).collect();
        if !order.is_empty() {
            let k = (seed as usize) % order.len();
            order.rotate_left(k);
        }

        let outcome = reorder(doc.clone(), &order);
        prop_assert!(outcome.is_exact());
        prop_assert_eq!(outcome.records.len(), doc.len());
    }
}
