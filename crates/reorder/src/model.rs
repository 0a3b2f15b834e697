use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One topic entry. `fields` is the record exactly as read, identifier
/// included, in its original key order; `id` is a copy of the identifier
/// field for lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Record {
    /// Build a record from a JSON object, reading the identifier from `id_field`.
    /// Returns `None` if the field is absent or not a string.
    pub fn from_fields(fields: Map<String, Value>, id_field: &str) -> Option<Self> {
        let id = fields.get(id_field)?.as_str()?.to_string();
        Some(Self { id, fields })
    }

    /// The display field, if present and a string.
    pub fn title(&self, title_field: &str) -> Option<&str> {
        self.fields.get(title_field).and_then(Value::as_str)
    }

    /// Title for reports; falls back to the identifier.
    pub fn display_title<'a>(&'a self, title_field: &str) -> &'a str {
        self.title(title_field).unwrap_or(&self.id)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of [`crate::reorder`]: the new sequence plus how the order list
/// and the document lined up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReorderOutcome {
    /// Records in order-list order.
    pub records: Vec<Record>,
    /// Ids in the document that the order list does not mention, in document order.
    pub dropped: Vec<String>,
    /// Ids in the order list that the document does not contain, in order-list order.
    pub missing: Vec<String>,
    /// Ids that occur more than once in the document. The last occurrence is kept.
    pub shadowed: Vec<String>,
    /// Ids listed more than once in the order list. Only the first position counts.
    pub repeated: Vec<String>,
    /// Whether the output differs from the input in order or membership.
    pub changed: bool,
}

impl ReorderOutcome {
    /// True when every record is kept exactly once and every listed id was found.
    pub fn is_exact(&self) -> bool {
        self.dropped.is_empty() && self.missing.is_empty() && self.shadowed.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.id.as_str()).collect()
    }

    pub fn titles<'a>(&'a self, title_field: &str) -> Vec<&'a str> {
        self.records.iter().map(|r| r.display_title(title_field)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn from_fields_reads_id() {
        let r = Record::from_fields(obj(json!({"id": "hiroo", "title": "Hiroo"})), "id").unwrap();
        assert_eq!(r.id, "hiroo");
        assert_eq!(r.title("title"), Some("Hiroo"));
    }

    #[test]
    fn from_fields_custom_id_field() {
        let r = Record::from_fields(obj(json!({"slug": "mita"})), "slug").unwrap();
        assert_eq!(r.id, "mita");
    }

    #[test]
    fn from_fields_rejects_missing_or_non_string_id() {
        assert!(Record::from_fields(obj(json!({"title": "x"})), "id").is_none());
        assert!(Record::from_fields(obj(json!({"id": 7})), "id").is_none());
    }

    #[test]
    fn display_title_falls_back_to_id() {
        let r = Record::from_fields(obj(json!({"id": "mita", "title": 3})), "id").unwrap();
        assert_eq!(r.title("title"), None);
        assert_eq!(r.display_title("title"), "mita");
    }

    #[test]
    fn serializes_as_original_object() {
        let fields = obj(json!({"title": "B", "id": "b", "extra": [1, 2]}));
        let r = Record::from_fields(fields.clone(), "id").unwrap();
        let out = serde_json::to_string(&r).unwrap();
        // preserve_order keeps "title" before "id"
        assert_eq!(out, r#"{"title":"B","id":"b","extra":[1,2]}"#);
    }
}
