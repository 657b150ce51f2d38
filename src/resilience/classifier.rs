//! Status-code classification for Smartis API responses
//!
//! [`classify`] is a pure function; every pause it implies (rate-limit
//! waits, the pause after an unmodeled status) is executed by the retry
//! engine, never in here.

use std::collections::HashMap;

use crate::constants::headers::{RATELIMIT_REMAINING, RETRY_AFTER};

/// Verdict for a single HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 200, or a 429 with request quota still remaining — the latter is an
    /// advisory throttle, not an enforced block, and must not be treated
    /// as an error.
    Success,
    /// 400/403, carrying the server's error message. Never retried.
    Fatal(String),
    /// 429 with the quota exhausted; wait the given seconds before the
    /// next attempt.
    RateLimited(u64),
    /// 500/502, retryable with no wait hint.
    Retryable(u16),
    /// Any status code outside the modeled set. Treated as retryable by
    /// the engine, with its own configured pause.
    Unknown(u16),
}

/// Classify an HTTP response into its retry outcome.
///
/// Header lookups are case-insensitive. A 429 without a parseable
/// quota-remaining header counts as exhausted; a missing `Retry-After`
/// yields a zero wait.
pub fn classify(status: u16, headers: &HashMap<String, String>, body: &str) -> Outcome {
    match status {
        200 => Outcome::Success,
        400 | 403 => Outcome::Fatal(error_message(body)),
        429 => {
            let remaining = header_u64(headers, RATELIMIT_REMAINING).unwrap_or(0);
            if remaining > 0 {
                Outcome::Success
            } else {
                Outcome::RateLimited(header_u64(headers, RETRY_AFTER).unwrap_or(0))
            }
        }
        500 | 502 => Outcome::Retryable(status),
        other => Outcome::Unknown(other),
    }
}

fn header_u64(headers: &HashMap<String, String>, name: &str) -> Option<u64> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .and_then(|(_, value)| value.trim().parse().ok())
}

/// The body's JSON `error` field when present, otherwise the raw body text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("error")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
