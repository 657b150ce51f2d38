//! Retry control flow for report requests
//!
//! Bounded retry with per-class waits, escalating to a long cooldown and a
//! fresh budget once the attempt budget is exhausted. The cycle repeats
//! until the response classifies as success or fatal.

use std::future::Future;
use std::time::Duration;

use log::{info, warn};

use crate::error::{Error, Result};
use crate::resilience::classifier::{Outcome, classify};
use crate::transport::{RawResponse, Sleeper};

/// Configuration for report retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Attempts per budget cycle.
    pub max_attempts: u32,
    /// Pause before every request, including the first.
    pub request_pause: Duration,
    /// Pause after a budget cycle is exhausted, before the budget resets.
    pub cooldown: Duration,
    /// Pause after a status code outside the modeled set.
    pub unknown_status_pause: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            request_pause: Duration::from_secs(1),
            cooldown: Duration::from_secs(600),
            unknown_status_pause: Duration::from_secs(60),
        }
    }
}

/// Drives a report request until it succeeds or fails fatally.
///
/// The policy holds only configuration; every [`execute`](Self::execute)
/// call owns its own budget, so concurrent calls never share retry state.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Execute `send` until its response classifies as success, returning
    /// the response body.
    ///
    /// Rate limits, server errors, unmodeled statuses and transport
    /// failures are all absorbed; only a fatal classification surfaces as
    /// an error. With a sustained outage this loops through cooldown
    /// cycles indefinitely — bound it with a deadline if that is not
    /// acceptable.
    pub async fn execute<F, Fut>(&self, sleeper: &dyn Sleeper, send: F) -> Result<String>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<RawResponse>>,
    {
        let budget = self.config.max_attempts.max(1);
        let mut remaining = budget;
        let mut total_sent: u64 = 0;

        loop {
            if remaining == 0 {
                warn!(
                    "{} consecutive failures, cooling down for {:?}",
                    budget, self.config.cooldown
                );
                self.pause(sleeper, self.config.cooldown).await;
                remaining = budget;
            }
            let attempt = budget - remaining + 1;

            self.pause(sleeper, self.config.request_pause).await;
            total_sent += 1;

            let response = match send().await {
                Ok(response) => response,
                Err(error) => {
                    warn!(
                        "Report request failed on attempt {}/{} (retryable): {}",
                        attempt, budget, error
                    );
                    remaining -= 1;
                    continue;
                }
            };

            match classify(response.status, &response.headers, &response.body) {
                Outcome::Success => {
                    if total_sent > 1 {
                        info!("Report request succeeded after {} attempts", total_sent);
                    }
                    return Ok(response.body);
                }
                Outcome::Fatal(message) => {
                    warn!(
                        "Report request rejected with status {}: {}",
                        response.status, message
                    );
                    return Err(Error::Fatal {
                        status: response.status,
                        message,
                    });
                }
                Outcome::RateLimited(wait) => {
                    warn!(
                        "Rate limit exhausted on attempt {}/{}, waiting {}s",
                        attempt, budget, wait
                    );
                    self.pause(sleeper, Duration::from_secs(wait)).await;
                    remaining -= 1;
                }
                Outcome::Retryable(status) => {
                    warn!("Server error {} on attempt {}/{}", status, attempt, budget);
                    remaining -= 1;
                }
                Outcome::Unknown(status) => {
                    warn!(
                        "Unhandled status {} on attempt {}/{}, waiting {:?}",
                        status, attempt, budget, self.config.unknown_status_pause
                    );
                    self.pause(sleeper, self.config.unknown_status_pause).await;
                    remaining -= 1;
                }
            }
        }
    }

    async fn pause(&self, sleeper: &dyn Sleeper, delay: Duration) {
        if !delay.is_zero() {
            sleeper.sleep(delay).await;
        }
    }
}
