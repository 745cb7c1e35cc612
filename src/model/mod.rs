//! Record types shared by every layer.
//!
//! A [`Record`] is a plain JSON object. One field of it (the *key field*,
//! `"id"` unless configured otherwise) identifies the record for
//! deduplication and for keying the local store.

use serde_json::{Map, Number, Value};
use std::fmt::{self, Display};

/// A plain key-value mapping representing one domain object.
pub type Record = Map<String, Value>;

/// Key field used when a read does not name one.
pub const DEFAULT_KEY_FIELD: &str = "id";

/// Canonical, comparable form of a record's key-field value.
///
/// The key is stored as the JSON text of the value, so `1` and `"1"` are
/// different keys, the same way the server distinguishes them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey(String);

impl RecordKey {
    /// Extracts the key of `record` at `key_field`.
    ///
    /// Returns `None` when the field is absent or `null`.
    pub fn of(record: &Record, key_field: &str) -> Option<Self> {
        match record.get(key_field) {
            None | Some(Value::Null) => None,
            Some(value) => Some(Self::from_value(value)),
        }
    }

    /// Builds a key from a bare value, e.g. for a cache lookup.
    ///
    /// Numbers compare by value: `10` and `10.0` give the same key.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => Self(canonical_number(n)),
            other => Self(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Value> for RecordKey {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

impl From<&str> for RecordKey {
    fn from(value: &str) -> Self {
        Self::from_value(&Value::from(value))
    }
}

impl From<i64> for RecordKey {
    fn from(value: i64) -> Self {
        Self::from_value(&Value::from(value))
    }
}

fn canonical_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f)
            if n.is_f64()
                && f.fract() == 0.0
                && f >= i64::MIN as f64
                && f < i64::MAX as f64 =>
        {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}

/// Converts a JSON value into a [`Record`] if it is an object.
pub fn into_record(value: Value) -> Option<Record> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        into_record(value).unwrap()
    }

    #[test]
    fn test_key_of_present_field() {
        let r = record(json!({ "id": 7, "title": "x" }));
        assert_eq!(RecordKey::of(&r, "id"), Some(RecordKey::from(7)));
    }

    #[test]
    fn test_missing_and_null_keys_are_undefined() {
        let r = record(json!({ "title": "x", "slug": null }));
        assert_eq!(RecordKey::of(&r, "id"), None);
        assert_eq!(RecordKey::of(&r, "slug"), None);
    }

    #[test]
    fn test_number_and_string_keys_differ() {
        assert_ne!(RecordKey::from(1), RecordKey::from("1"));
        assert_eq!(RecordKey::from("1").as_str(), "\"1\"");
    }

    #[test]
    fn test_integral_floats_match_integer_keys() {
        assert_eq!(RecordKey::from(json!(10.0)), RecordKey::from(10));
        assert_eq!(RecordKey::from(json!(-0.0)), RecordKey::from(0));
        assert_ne!(RecordKey::from(json!(10.5)), RecordKey::from(10));
        assert_eq!(RecordKey::from(json!(10.5)).as_str(), "10.5");
    }

    #[test]
    fn test_into_record_rejects_non_objects() {
        assert!(into_record(json!([1, 2])).is_none());
        assert!(into_record(json!(null)).is_none());
        assert!(into_record(json!({})).is_some());
    }
}
