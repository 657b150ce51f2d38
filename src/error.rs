//! Error taxonomy for the SDK
//!
//! Retryable classes (`RateLimited`, `TransientServer`, `UnknownStatus`,
//! `Transport`) are absorbed by the report retry engine and only surface
//! from the non-retrying metadata accessors.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A CRM-scoped endpoint was called without a CRM token configured.
    /// Raised before any network call.
    #[error("CRM token is required for {endpoint}")]
    MissingCredential { endpoint: &'static str },

    /// 400/403 rejection carrying the server's message. Never retried.
    #[error("request rejected with status {status}: {message}")]
    Fatal { status: u16, message: String },

    /// Well-formed HTTP response whose body does not match the expected
    /// schema. Never retried.
    #[error("response validation failed: {0}")]
    SchemaValidation(String),

    /// 429 with the request quota exhausted.
    #[error("rate limited, retry after {wait_secs}s")]
    RateLimited { wait_secs: u64 },

    /// 500/502 server error.
    #[error("server error with status {status}")]
    TransientServer { status: u16 },

    /// Status code outside the modeled set.
    #[error("unexpected status code {status}")]
    UnknownStatus { status: u16 },

    /// Network-level failure (connect, timeout, broken body).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The deadline passed to [`fetch_report_with_deadline`] elapsed.
    ///
    /// [`fetch_report_with_deadline`]: crate::SmartisClient::fetch_report_with_deadline
    #[error("deadline elapsed before the report request succeeded")]
    DeadlineExceeded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::Fatal {
            status: 400,
            message: "bad project".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "request rejected with status 400: bad project"
        );

        let err = Error::MissingCredential {
            endpoint: "crm/crmCustomField/get",
        };
        assert!(err.to_string().contains("crm/crmCustomField/get"));

        let err = Error::RateLimited { wait_secs: 30 };
        assert_eq!(err.to_string(), "rate limited, retry after 30s");
    }
}
