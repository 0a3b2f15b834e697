use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::config::MismatchPolicy;
use crate::error::ReorderError;
use crate::model::{Record, ReorderOutcome};

/// Rebuild `records` in the order given by `order`.
///
/// Records are indexed by id (last occurrence wins), then emitted in
/// order-list sequence. Ids the document lacks are skipped, records the
/// order list does not mention are left out. Both cases are reported on the
/// outcome rather than treated as errors; see [`check_policy`].
pub fn reorder<S: AsRef<str>>(records: Vec<Record>, order: &[S]) -> ReorderOutcome {
    let input_ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();

    let mut by_id: HashMap<String, Record> = HashMap::with_capacity(records.len());
    let mut shadowed: Vec<String> = Vec::new();
    for record in records {
        let id = record.id.clone();
        if by_id.insert(id.clone(), record).is_some() && !shadowed.contains(&id) {
            shadowed.push(id);
        }
    }

    let mut listed: HashSet<&str> = HashSet::with_capacity(order.len());
    let mut out = Vec::with_capacity(by_id.len());
    let mut missing = Vec::new();
    let mut repeated: Vec<String> = Vec::new();

    for id in order {
        let id = id.as_ref();
        if !listed.insert(id) {
            if !repeated.iter().any(|r| r == id) {
                repeated.push(id.to_string());
            }
            continue;
        }
        match by_id.remove(id) {
            Some(record) => out.push(record),
            None => missing.push(id.to_string()),
        }
    }

    let mut dropped: Vec<String> = Vec::new();
    for id in &input_ids {
        if !listed.contains(id.as_str()) && !dropped.contains(id) {
            dropped.push(id.clone());
        }
    }

    let changed = out.len() != input_ids.len()
        || out.iter().zip(&input_ids).any(|(r, id)| &r.id != id);

    log::debug!(
        "reordered {} -> {} record(s): {} dropped, {} missing, {} shadowed, {} repeated",
        input_ids.len(),
        out.len(),
        dropped.len(),
        missing.len(),
        shadowed.len(),
        repeated.len()
    );

    ReorderOutcome {
        records: out,
        dropped,
        missing,
        shadowed,
        repeated,
        changed,
    }
}

// ---------------------------------------------------------------------------
// Mismatch policy
// ---------------------------------------------------------------------------

/// Something the caller should surface to the user under the `warn` policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyNotice {
    Dropped(Vec<String>),
    Missing(Vec<String>),
    Shadowed(Vec<String>),
    Repeated(Vec<String>),
}

impl fmt::Display for PolicyNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dropped(ids) => write!(
                f,
                "{} record(s) not listed in the order were dropped: {}",
                ids.len(),
                ids.join(", ")
            ),
            Self::Missing(ids) => write!(
                f,
                "{} listed id(s) not found in the document: {}",
                ids.len(),
                ids.join(", ")
            ),
            Self::Shadowed(ids) => write!(
                f,
                "{} id(s) occur more than once in the document, last occurrence kept: {}",
                ids.len(),
                ids.join(", ")
            ),
            Self::Repeated(ids) => write!(
                f,
                "{} id(s) listed more than once in the order, first position used: {}",
                ids.len(),
                ids.join(", ")
            ),
        }
    }
}

/// Apply `policy` to the correspondence report of `outcome`.
///
/// `drop` never complains, `warn` returns one notice per kind of mismatch,
/// `fail` rejects any dropped, missing or shadowed id.
pub fn check_policy(
    outcome: &ReorderOutcome,
    policy: MismatchPolicy,
) -> Result<Vec<PolicyNotice>, ReorderError> {
    match policy {
        MismatchPolicy::Drop => Ok(Vec::new()),
        MismatchPolicy::Fail if !outcome.is_exact() => Err(ReorderError::Mismatch {
            dropped: outcome.dropped.clone(),
            missing: outcome.missing.clone(),
            shadowed: outcome.shadowed.clone(),
        }),
        MismatchPolicy::Fail | MismatchPolicy::Warn => {
            let mut notices = Vec::new();
            if !outcome.dropped.is_empty() {
                notices.push(PolicyNotice::Dropped(outcome.dropped.clone()));
            }
            if !outcome.missing.is_empty() {
                notices.push(PolicyNotice::Missing(outcome.missing.clone()));
            }
            if !outcome.shadowed.is_empty() {
                notices.push(PolicyNotice::Shadowed(outcome.shadowed.clone()));
            }
            if !outcome.repeated.is_empty() {
                notices.push(PolicyNotice::Repeated(outcome.repeated.clone()));
            }
            Ok(notices)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn rec(id: &str, title: &str) -> Record {
        rec_value(json!({"id": id, "title": title}))
    }

    fn rec_value(v: Value) -> Record {
        match v {
            Value::Object(m) => Record::from_fields(m, "id").unwrap(),
            _ => panic!("expected object"),
        }
    }

    fn abc() -> Vec<Record> {
        vec![rec("a", "A"), rec("b", "B"), rec("c", "C")]
    }

    #[test]
    fn subset_in_listed_order() {
        let out = reorder(abc(), &["b", "a"]);
        assert_eq!(out.ids(), vec!["b", "a"]);
        assert_eq!(out.titles("title"), vec!["B", "A"]);
        assert_eq!(out.dropped, vec!["c"]);
        assert!(out.missing.is_empty());
        assert!(out.changed);
        assert!(!out.is_exact());
    }

    #[test]
    fn unknown_id_is_skipped() {
        let out = reorder(abc(), &["z", "c", "b", "a"]);
        assert_eq!(out.ids(), vec!["c", "b", "a"]);
        assert_eq!(out.missing, vec!["z"]);
        assert!(out.dropped.is_empty());
    }

    #[test]
    fn duplicate_input_id_last_wins() {
        let records = vec![rec("a", "first"), rec("b", "B"), rec("a", "second")];
        let out = reorder(records, &["a", "b"]);
        assert_eq!(out.titles("title"), vec!["second", "B"]);
        assert_eq!(out.shadowed, vec!["a"]);
    }

    #[test]
    fn repeated_order_entry_emits_once() {
        let out = reorder(abc(), &["a", "b", "a", "c", "a"]);
        assert_eq!(out.ids(), vec!["a", "b", "c"]);
        assert_eq!(out.repeated, vec!["a"]);
        assert!(out.is_exact());
        assert!(!out.changed);
    }

    #[test]
    fn same_order_is_unchanged() {
        let out = reorder(abc(), &["a", "b", "c"]);
        assert!(!out.changed);
        assert!(out.is_exact());
    }

    #[test]
    fn fields_pass_through_untouched() {
        let original = json!({"title": "B", "id": "b", "nested": {"k": [1, 2.5, null]}, "emoji": "🎯"});
        let out = reorder(vec![rec("a", "A"), rec_value(original.clone())], &["b", "a"]);
        assert_eq!(serde_json::to_value(&out.records[0]).unwrap(), original);
    }

    #[test]
    fn empty_inputs() {
        let out = reorder(Vec::new(), &["a"]);
        assert!(out.records.is_empty());
        assert_eq!(out.missing, vec!["a"]);
        assert!(!out.changed);

        let none: [&str; 0] = [];
        let out = reorder(abc(), &none);
        assert!(out.records.is_empty());
        assert_eq!(out.dropped, vec!["a", "b", "c"]);
        assert!(out.changed);
    }

    #[test]
    fn policy_drop_is_silent() {
        let out = reorder(abc(), &["b", "z"]);
        assert!(check_policy(&out, MismatchPolicy::Drop).unwrap().is_empty());
    }

    #[test]
    fn policy_warn_lists_each_kind() {
        let out = reorder(abc(), &["b", "z", "b"]);
        let notices = check_policy(&out, MismatchPolicy::Warn).unwrap();
        assert_eq!(
            notices,
            vec![
                PolicyNotice::Dropped(vec!["a".into(), "c".into()]),
                PolicyNotice::Missing(vec!["z".into()]),
                PolicyNotice::Repeated(vec!["b".into()]),
            ]
        );
    }

    #[test]
    fn policy_fail_rejects_mismatch() {
        let out = reorder(abc(), &["b", "a"]);
        let err = check_policy(&out, MismatchPolicy::Fail).unwrap_err();
        match err {
            ReorderError::Mismatch { dropped, missing, shadowed } => {
                assert_eq!(dropped, vec!["c"]);
                assert!(missing.is_empty());
                assert!(shadowed.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn policy_fail_accepts_exact_permutation() {
        let out = reorder(abc(), &["c", "a", "b"]);
        assert!(check_policy(&out, MismatchPolicy::Fail).unwrap().is_empty());
    }

    #[test]
    fn notice_display() {
        let n = PolicyNotice::Missing(vec!["z".into(), "y".into()]);
        assert_eq!(n.to_string(), "2 listed id(s) not found in the document: z, y");
    }
}
