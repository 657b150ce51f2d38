//! Test doubles for the transport and sleep seams
//!
//! Kept in the library (not behind `cfg(test)`) so both unit tests and
//! integration tests can drive the retry engine without a network or a
//! real clock.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::transport::{RawResponse, Sleeper, Transport};

/// Build a canned response from a header slice.
pub fn response(status: u16, headers: &[(&str, &str)], body: &str) -> RawResponse {
    RawResponse {
        status,
        headers: headers
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect(),
        body: body.to_string(),
    }
}

/// One request captured by [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

/// Transport that replays a fixed sequence of canned outcomes and records
/// every request it receives.
///
/// Once the script is exhausted, further requests fail with
/// [`Error::Transport`], which the retry engine treats as retryable.
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<RawResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<RawResponse>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// All requests received so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("lock poisoned").clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("lock poisoned").len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: Option<&str>,
    ) -> Result<RawResponse> {
        self.requests
            .lock()
            .expect("lock poisoned")
            .push(RecordedRequest {
                url: url.to_string(),
                headers: headers.clone(),
                body: body.map(str::to_string),
            });
        self.responses
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(Error::Transport("scripted transport exhausted".to_string())))
    }
}

/// Sleeper that records requested pauses instead of waiting.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// All pauses requested so far, in order.
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().expect("lock poisoned").clone()
    }

    /// Sum of all requested pauses.
    pub fn total_paused(&self) -> Duration {
        self.pauses().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.pauses.lock().expect("lock poisoned").push(duration);
    }
}
