use crate::constants::{DEVELOPMENT_HOST, PRODUCTION_HOST};

/// Target environment for API calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Host {
    #[default]
    Production,
    Development,
}

impl Host {
    /// Base URL for this environment, including the trailing `/api/` segment.
    pub const fn base_url(self) -> &'static str {
        match self {
            Host::Production => PRODUCTION_HOST,
            Host::Development => DEVELOPMENT_HOST,
        }
    }
}

/// API credentials, immutable for the client's lifetime.
///
/// The CRM token is a secondary credential required only by CRM-scoped
/// endpoints; its absence there is a precondition failure, not a transport
/// error.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub crm_token: Option<String>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            crm_token: None,
        }
    }

    pub fn with_crm_token(mut self, token: impl Into<String>) -> Self {
        self.crm_token = Some(token.into());
        self
    }
}
