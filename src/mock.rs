//! # Mock Transports
//!
//! Test doubles for the [`Transport`] seam, so resources can be tested without
//! a server.
//!
//! | | [`MockTransport`] | [`ChannelTransport`] |
//! |---|---|---|
//! | **Responses** | Queued up front | Sent by the test, one by one |
//! | **Timing** | Immediate | Test decides when each request completes |
//! | **Use case** | Request/response logic | Interleaving of concurrent reads and creates |
//!
//! ## Expectation style
//!
//! ```rust
//! use takeout::mock::MockTransport;
//! use takeout::transport::Method;
//! use takeout::{InMemoryStore, ReadOptions, Takeout};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut transport = MockTransport::new();
//!     transport.expect(Method::Get).uri("/posts").return_json(json!([{ "id": 1 }]));
//!
//!     let takeout = Takeout::with_parts(transport.clone(), InMemoryStore::new());
//!     let posts = takeout.resource("/posts", Default::default());
//!     let collection = posts.read(ReadOptions::default()).await.unwrap();
//!
//!     assert_eq!(collection.len(), 1);
//!     transport.verify();
//! }
//! ```
//!
//! ## Channel style
//!
//! [`create_channel_transport`] returns the transport and the receiving end of
//! its request channel. Each request shows up as a [`PendingRequest`]; the
//! call stays suspended until the test answers it.

use crate::transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

struct Expectation {
    method: Option<Method>,
    uri: Option<String>,
    response: Result<HttpResponse, TransportError>,
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    requests: Vec<HttpRequest>,
}

/// A transport that answers from a queue of expectations.
///
/// Clones share the same queue and request log, so keep one clone in the test
/// and hand the other to the code under test.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects the next request to use `method`.
    pub fn expect(&mut self, method: Method) -> ExpectationBuilder {
        ExpectationBuilder {
            method: Some(method),
            uri: None,
            state: self.state.clone(),
        }
    }

    /// Expects a request with any method.
    pub fn expect_any(&mut self) -> ExpectationBuilder {
        ExpectationBuilder {
            method: None,
            uri: None,
            state: self.state.clone(),
        }
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut state = self.state.lock().unwrap();
        let expectation = state.expectations.pop_front().unwrap_or_else(|| {
            panic!("Unexpected request: {} {}", request.method, request.uri)
        });
        if let Some(method) = expectation.method {
            assert_eq!(request.method, method, "method mismatch for {}", request.uri);
        }
        if let Some(uri) = &expectation.uri {
            assert_eq!(&request.uri, uri, "uri mismatch");
        }
        state.requests.push(request);
        expectation.response
    }
}

/// Builder for one expected request.
pub struct ExpectationBuilder {
    method: Option<Method>,
    uri: Option<String>,
    state: Arc<Mutex<MockState>>,
}

impl ExpectationBuilder {
    /// Also asserts the request URI.
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Answers `200 OK` with `body` as JSON.
    pub fn return_json(self, body: Value) {
        self.return_response(HttpResponse::json(&body));
    }

    /// Answers with an empty body and the given status.
    pub fn return_status(self, status: u16, status_text: &str) {
        self.return_response(HttpResponse::new(status, status_text, Vec::new()));
    }

    pub fn return_response(self, response: HttpResponse) {
        self.push(Ok(response));
    }

    /// Fails the exchange itself, as an unreachable network would.
    pub fn return_err(self, error: TransportError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<HttpResponse, TransportError>) {
        self.state.lock().unwrap().expectations.push_back(Expectation {
            method: self.method,
            uri: self.uri,
            response,
        });
    }
}

/// A transport error for tests, as if the host were unreachable.
pub fn unreachable(method: Method, uri: &str) -> TransportError {
    TransportError::Request {
        method,
        uri: uri.to_string(),
        source: "connection refused".into(),
    }
}

// =============================================================================
// CHANNEL HELPERS
// =============================================================================

/// A request waiting for the test to answer it.
#[derive(Debug)]
pub struct PendingRequest {
    pub request: HttpRequest,
    pub respond_to: oneshot::Sender<Result<HttpResponse, TransportError>>,
}

impl PendingRequest {
    pub fn respond(self, response: Result<HttpResponse, TransportError>) {
        let _ = self.respond_to.send(response);
    }

    pub fn respond_json(self, body: Value) {
        self.respond(Ok(HttpResponse::json(&body)));
    }
}

/// A transport that forwards every request to a channel.
#[derive(Clone)]
pub struct ChannelTransport {
    sender: mpsc::Sender<PendingRequest>,
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let (respond_to, response) = oneshot::channel();
        let method = request.method;
        let uri = request.uri.clone();
        let closed = |what: &str| TransportError::Request {
            method,
            uri: uri.clone(),
            source: what.to_string().into(),
        };

        self.sender
            .send(PendingRequest {
                request,
                respond_to,
            })
            .await
            .map_err(|_| closed("mock channel closed"))?;
        response
            .await
            .map_err(|_| closed("mock responder dropped"))?
    }
}

/// Creates a channel transport and the receiver the test answers from.
pub fn create_channel_transport(
    buffer_size: usize,
) -> (ChannelTransport, mpsc::Receiver<PendingRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ChannelTransport { sender }, receiver)
}

/// Waits for the next request on the channel.
pub async fn expect_request(
    receiver: &mut mpsc::Receiver<PendingRequest>,
) -> Option<PendingRequest> {
    receiver.recv().await
}
