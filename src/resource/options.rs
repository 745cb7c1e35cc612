//! Per-resource and per-call configuration.
//!
//! Every option has a documented default, so `Default::default()` is always a
//! valid argument.

use crate::model::{Record, DEFAULT_KEY_FIELD};
use crate::transport::{Body, Headers, Method};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request settings that can be overridden per call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    pub headers: Headers,
}

impl RequestOptions {
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Options a resource applies to every request it issues.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceOptions {
    pub request: RequestOptions,
}

impl ResourceOptions {
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.request.headers.insert(name, value);
        self
    }
}

/// Options for [`Resource::create`](super::Resource::create).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateOptions {
    /// HTTP method; `POST` when unset.
    pub method: Option<Method>,
    /// Header overrides on top of the resource defaults.
    pub request: RequestOptions,
    /// Target URI; the resource's bound URI when unset.
    pub uri: Option<String>,
}

impl CreateOptions {
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.request.headers.insert(name, value);
        self
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }
}

/// Options for [`Resource::read`](super::Resource::read).
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOptions {
    /// Header overrides on top of the resource defaults.
    pub request: RequestOptions,
    /// Key field used for deduplication and persistence; `"id"` by default.
    pub key: String,
    /// Target URI; the resource's bound URI when unset.
    pub uri: Option<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            request: RequestOptions::default(),
            key: DEFAULT_KEY_FIELD.to_string(),
            uri: None,
        }
    }
}

impl ReadOptions {
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.request.headers.insert(name, value);
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }
}

/// What a create request carries.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Sent as a JSON body with `content-type: application/json`.
    Json(Record),
    /// Sent URL-encoded; the transport picks the content type.
    Form(Record),
    /// Sent untouched; tracked optimistically as an empty record.
    Binary(Vec<u8>),
}

impl Payload {
    /// The record tracked optimistically while the request is in flight.
    pub(crate) fn optimistic_record(&self) -> Record {
        match self {
            Payload::Json(record) | Payload::Form(record) => record.clone(),
            Payload::Binary(_) => Record::new(),
        }
    }

    pub(crate) fn is_json(&self) -> bool {
        matches!(self, Payload::Json(_))
    }

    pub(crate) fn into_body(self) -> Result<Body, serde_json::Error> {
        Ok(match self {
            Payload::Json(record) => Body::Json(serde_json::to_string(&record)?),
            Payload::Form(record) => Body::Form(
                record
                    .into_iter()
                    .map(|(name, value)| (name, form_value(value)))
                    .collect(),
            ),
            Payload::Binary(bytes) => Body::Bytes(bytes),
        })
    }
}

fn form_value(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl From<Record> for Payload {
    fn from(record: Record) -> Self {
        Payload::Json(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::into_record;
    use serde_json::json;

    #[test]
    fn test_read_defaults_to_id_key() {
        assert_eq!(ReadOptions::default().key, "id");
    }

    #[test]
    fn test_form_payload_flattens_values() {
        let record = into_record(json!({ "title": "Hi", "count": 2, "draft": null })).unwrap();
        let body = Payload::Form(record).into_body().unwrap();
        let Body::Form(mut fields) = body else {
            panic!("expected form body");
        };
        fields.sort();
        assert_eq!(
            fields,
            vec![
                ("count".to_string(), "2".to_string()),
                ("draft".to_string(), String::new()),
                ("title".to_string(), "Hi".to_string()),
            ]
        );
    }

    #[test]
    fn test_binary_payload_tracks_empty_record() {
        let payload = Payload::Binary(vec![1, 2, 3]);
        assert!(payload.optimistic_record().is_empty());
        assert_eq!(payload.into_body().unwrap(), Body::Bytes(vec![1, 2, 3]));
    }

    #[test]
    fn test_resource_options_from_json() {
        let options: ResourceOptions =
            serde_json::from_value(json!({ "request": { "headers": { "Authorization": "t" } } }))
                .unwrap();
        assert_eq!(options.request.headers.get("authorization"), Some("t"));
    }
}
