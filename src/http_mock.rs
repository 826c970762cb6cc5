// src/http_mock.rs
//
// Canned-response HTTP stub. Replays a scripted sequence of responses and
// records every request into a caller-supplied container, so tests can
// assert on what the code under test sent without touching the network.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, RwLock};

use eyre::{eyre, Result};
use log::debug;
use serde_json::Value;

use crate::fixtures::Fixtures;

/// Status codes for the scripted responses: one code for every response,
/// or one per response (must match the body count).
#[derive(Debug, Clone)]
pub enum StatusCodes {
    Uniform(u16),
    PerResponse(Vec<u16>),
}

/// Body source for a scripted response.
#[derive(Debug, Clone)]
pub enum MockBody {
    /// Literal text used as-is.
    Text(String),
    /// Structured data encoded as JSON.
    Json(Value),
    /// Name of a fixture file whose contents become the body.
    Fixture(String),
}

/// A request the stub client received, in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub body: Option<String>,
}

/// A canned response handed back by the stub client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl MockResponse {
    /// Parse the body as JSON.
    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body).map_err(|e| eyre!("mock response body is not JSON: {}", e))
    }
}

/// Stub HTTP client: replays its responses strictly in order and records
/// every request into the shared container it was built with.
#[derive(Debug)]
pub struct MockHttpClient {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    pub fn get(&self, url: &str) -> Result<MockResponse> {
        self.request("GET", url, None)
    }

    pub fn post(&self, url: &str, body: &str) -> Result<MockResponse> {
        self.request("POST", url, Some(body))
    }

    /// Record the request and pop the next canned response. Errors when
    /// the response queue is exhausted.
    pub fn request(&self, method: &str, url: &str, body: Option<&str>) -> Result<MockResponse> {
        self.requests
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedRequest {
                method: method.to_string(),
                url: url.to_string(),
                body: body.map(str::to_string),
            });

        debug!("mock HTTP {} {}", method, url);
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .ok_or_else(|| eyre!("mock response queue is empty for {} {}", method, url))
    }

    /// Responses still queued.
    pub fn remaining(&self) -> usize {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

/// Build a stub client from status codes and response bodies, recording
/// requests into `requests`. Fixture-file bodies resolve through
/// `fixtures`. With per-response codes, the counts must match.
pub fn build_mock_client(
    codes: StatusCodes,
    bodies: Vec<MockBody>,
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
    fixtures: &Fixtures,
) -> Result<MockHttpClient> {
    let codes = match codes {
        StatusCodes::Uniform(code) => vec![code; bodies.len()],
        StatusCodes::PerResponse(codes) => {
            if codes.len() != bodies.len() {
                return Err(eyre!(
                    "when using per-response status codes, the number of codes ({}) must match the number of bodies ({})",
                    codes.len(),
                    bodies.len(),
                ));
            }
            codes
        }
    };

    let mut responses = VecDeque::with_capacity(bodies.len());
    for (status, body) in codes.into_iter().zip(bodies) {
        let data = match body {
            MockBody::Text(text) => text,
            MockBody::Json(value) => value.to_string(),
            MockBody::Fixture(name) => fixtures.raw(&name)?,
        };
        responses.push_back(MockResponse {
            status,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: data,
        });
    }

    debug!("built mock HTTP client with {} canned response(s)", responses.len());
    Ok(MockHttpClient {
        responses: Mutex::new(responses),
        requests,
    })
}
