//! # Transport
//!
//! The network seam. A [`Resource`](crate::resource::Resource) never talks to
//! the network directly; it hands an [`HttpRequest`] to a [`Transport`] and
//! gets back an [`HttpResponse`].
//!
//! - [`HttpTransport`] is the production implementation over `reqwest`.
//! - [`crate::mock`] has in-memory implementations for tests.

mod error;
mod http;

pub use error::TransportError;
pub use http::HttpTransport;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display};

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request headers with case-insensitive names.
///
/// Names are stored lowercased, so `Content-Type` and `content-type` are the
/// same header and a later insert replaces an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>")]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.0.insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_ascii_lowercase())
    }

    /// Overlays `other` on top of `self`; `other` wins on conflicts.
    pub fn merge(&mut self, other: &Headers) {
        for (name, value) in &other.0 {
            self.0.insert(name.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, String>> for Headers {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Serialized JSON text.
    Json(String),
    /// URL-encoded form fields; the transport sets the content type.
    Form(Vec<(String, String)>),
    /// Raw bytes, sent as-is.
    Bytes(Vec<u8>),
}

/// An outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub uri: String,
    pub headers: Headers,
    pub body: Option<Body>,
}

impl HttpRequest {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the body as parsed JSON, if it is a JSON body.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        match &self.body {
            Some(Body::Json(text)) => serde_json::from_str(text).ok(),
            _ => None,
        }
    }
}

/// A fully received response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    /// A `200 OK` response carrying `value` as JSON.
    pub fn json(value: &serde_json::Value) -> Self {
        Self::new(200, "OK", value.to_string())
    }

    /// True for statuses in the 200–299 range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests and returns responses.
///
/// Implementations must not interpret the status code; a `404` or `500` is a
/// successful exchange from the transport's point of view.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_are_case_insensitive() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "text/plain");
        headers.insert("content-type", "application/json");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("CONTENT-TYPE"), Some("application/json"));
    }

    #[test]
    fn test_merge_overrides_defaults() {
        let mut base: Headers = [("Authorization", "a"), ("Accept", "x")].into_iter().collect();
        let overrides: Headers = [("authorization", "b")].into_iter().collect();
        base.merge(&overrides);
        assert_eq!(base.get("authorization"), Some("b"));
        assert_eq!(base.get("accept"), Some("x"));
    }

    #[test]
    fn test_success_range() {
        assert!(HttpResponse::new(201, "Created", "").is_success());
        assert!(!HttpResponse::new(199, "", "").is_success());
        assert!(!HttpResponse::new(404, "Not Found", "").is_success());
    }

    #[test]
    fn test_headers_deserialize_lowercases() {
        let headers: Headers = serde_json::from_str(r#"{"X-Token":"t"}"#).unwrap();
        assert_eq!(headers.get("x-token"), Some("t"));
    }
}
