//! `reqwest`-backed transport.

use super::{Body, HttpRequest, HttpResponse, Method, Transport, TransportError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, instrument};

/// HTTP client used by resources in production.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already configured client (proxies, TLS roots, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

fn header_map(request: &HttpRequest) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::with_capacity(request.headers.len());
    for (name, value) in request.headers.iter() {
        let invalid = || TransportError::InvalidHeader {
            name: name.to_string(),
        };
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        map.insert(name, value);
    }
    Ok(map)
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, uri = %request.uri))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let headers = header_map(&request)?;
        let HttpRequest {
            method, uri, body, ..
        } = request;

        let mut builder = self
            .client
            .request(method.into(), &uri)
            .headers(headers);
        builder = match body {
            Some(Body::Json(text)) => builder.body(text),
            Some(Body::Form(fields)) => builder.form(&fields),
            Some(Body::Bytes(bytes)) => builder.body(bytes),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|err| TransportError::Request {
                method,
                uri: uri.clone(),
                source: Box::new(err),
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| TransportError::Body {
                uri: uri.clone(),
                source: Box::new(err),
            })?;

        debug!(status = status.as_u16(), bytes = body.len(), "Response");
        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: body.to_vec(),
        })
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Headers;

    #[test]
    fn test_header_map_rejects_invalid_values() {
        let mut headers = Headers::new();
        headers.insert("x-bad", "line\nbreak");
        let request = HttpRequest::new(Method::Get, "http://localhost/").with_headers(headers);
        assert!(matches!(
            header_map(&request),
            Err(TransportError::InvalidHeader { name }) if name == "x-bad"
        ));
    }

    #[test]
    fn test_header_map_copies_headers() {
        let headers: Headers = [("Accept", "application/json")].into_iter().collect();
        let request = HttpRequest::new(Method::Get, "http://localhost/").with_headers(headers);
        let map = header_map(&request).unwrap();
        assert_eq!(map.get("accept").unwrap(), "application/json");
    }
}
