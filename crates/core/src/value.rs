//! Field values recorded in change deltas.
//!
//! The audit trail stores before/after values for arbitrary product fields,
//! so a single value type has to cover numbers, text, "no previous value",
//! and whole-record snapshots. `FieldValue` is that closed set; it is
//! compared by value and serialized untagged so snapshots read as plain
//! JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single field value as captured in a change delta.
///
/// Untagged on the wire: `Null` serializes as JSON null, `Number` as a JSON
/// number, `Text` as a string and `Snapshot` as an object, which keeps
/// persisted history readable without a tagging layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No value (e.g. the before-state of a freshly created record).
    Null,
    /// Numeric value. Integer fields are widened to f64 on capture.
    Number(f64),
    /// Textual value.
    Text(String),
    /// A structured snapshot of several fields at once.
    Snapshot(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<BTreeMap<String, FieldValue>> for FieldValue {
    fn from(value: BTreeMap<String, FieldValue>) -> Self {
        Self::Snapshot(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_wire_shape() {
        assert_eq!(serde_json::to_value(FieldValue::Null).unwrap(), serde_json::json!(null));
        assert_eq!(
            serde_json::to_value(FieldValue::Number(12.5)).unwrap(),
            serde_json::json!(12.5)
        );
        assert_eq!(
            serde_json::to_value(FieldValue::text("active")).unwrap(),
            serde_json::json!("active")
        );

        let mut snapshot = BTreeMap::new();
        snapshot.insert("price".to_string(), FieldValue::Number(10.0));
        snapshot.insert("name".to_string(), FieldValue::text("A"));
        assert_eq!(
            serde_json::to_value(FieldValue::Snapshot(snapshot)).unwrap(),
            serde_json::json!({"name": "A", "price": 10.0})
        );
    }

    #[test]
    fn null_deserializes_back_to_null_variant() {
        let value: FieldValue = serde_json::from_str("null").unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn compared_by_value() {
        assert_eq!(FieldValue::from(10_i64), FieldValue::Number(10.0));
        assert_ne!(FieldValue::text("a"), FieldValue::text("b"));
    }
}
