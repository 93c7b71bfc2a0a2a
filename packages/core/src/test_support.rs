//! In-crate transport double for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::transport::{FetchRequest, FetchResponse, Transport, TransportError};

/// Replays canned responses keyed by absolute URI and records every request.
#[derive(Default)]
pub(crate) struct RecordingTransport {
    responses: HashMap<String, FetchResponse>,
    fallback: Option<FetchResponse>,
    failures_left: Mutex<usize>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Serve `body` as `application/hal+json` at `uri`.
    pub(crate) fn hal(mut self, uri: &str, body: Value) -> Self {
        self.responses.insert(uri.to_string(), hal_response(200, body));
        self
    }

    pub(crate) fn respond(mut self, uri: &str, response: FetchResponse) -> Self {
        self.responses.insert(uri.to_string(), response);
        self
    }

    /// Response for any URI without a specific entry.
    pub(crate) fn fallback(mut self, response: FetchResponse) -> Self {
        self.fallback = Some(response);
        self
    }

    /// Fail the next `n` fetches with a transport error.
    pub(crate) fn failing(self, n: usize) -> Self {
        *self.failures_left.lock().unwrap() = n;
        self
    }

    pub(crate) fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Transport for RecordingTransport {
    fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());

        let mut failures = self.failures_left.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(TransportError::Other("connection refused".into()));
        }

        self.responses
            .get(request.uri.as_str())
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| TransportError::Other(format!("no route for {}", request.uri)))
    }
}

pub(crate) fn hal_response(status: u16, body: Value) -> FetchResponse {
    FetchResponse {
        status,
        headers: vec![("Content-Type".into(), "application/hal+json".into())],
        body: body.to_string().into_bytes(),
    }
}
