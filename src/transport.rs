//! HTTP transport seam
//!
//! Production code talks to the API through [`HttpTransport`]; tests
//! substitute scripted [`Transport`] and [`Sleeper`] implementations so no
//! network traffic or real time is involved.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use crate::error::{Error, Result};

/// Raw response surface consumed by the response classifier.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

/// Minimal POST-only transport the SDK is built on.
///
/// `body` is `None` for operations that take no parameters (channels,
/// placements); no request body is sent in that case.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: Option<&str>,
    ) -> Result<RawResponse>;
}

/// Pause primitive, injectable so tests never block on real time.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// reqwest-backed transport with connection pooling.
pub struct HttpTransport {
    http_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("smartis-sdk/0.1")
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(Self { http_client })
    }

    /// Wrap an existing reqwest client (custom pool sizes, proxies).
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: Option<&str>,
    ) -> Result<RawResponse> {
        let mut request = self.http_client.post(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        debug!("POST {}", url);
        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        debug!("POST {} -> {}", url, status);

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

/// Default sleeper backed by tokio's timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
