//! API constants and the endpoint registry for the Smartis reporting API

/// Production API host
pub const PRODUCTION_HOST: &str = "https://my.smartis.bi/api/";

/// Development API host
pub const DEVELOPMENT_HOST: &str = "https://dev.smartis.bi/api/";

/// Standard headers for Smartis requests
pub mod headers {
    /// Content type for JSON requests
    pub const CONTENT_TYPE_JSON: &str = "application/json";

    /// Response header carrying the remaining request quota; 0 means the
    /// next call will be rejected
    pub const RATELIMIT_REMAINING: &str = "X-Ratelimit-Remaining";

    /// Response header carrying the wait (in seconds) mandated after a
    /// quota rejection
    pub const RETRY_AFTER: &str = "Retry-After";
}

/// Logical operations exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    GetProjects,
    GetMetrics,
    GetGroupings,
    GetAttributionModels,
    GetChannels,
    GetPlacements,
    GetCampaigns,
    GetAds,
    GetKeywords,
    GetCrmCustomFields,
    GetCrmCustomFieldGroups,
    GetReport,
}

/// Static request/response shape of one API operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointDescriptor {
    /// Path relative to the base host.
    pub path: &'static str,
    /// Top-level JSON key the result array is nested under; `None` when the
    /// body root is the payload itself.
    pub envelope_key: Option<&'static str>,
    /// Whether the operation goes through the retry engine.
    pub retryable: bool,
    /// Whether the operation requires the secondary CRM token.
    pub crm_scoped: bool,
}

impl Endpoint {
    /// Look up the static descriptor for this operation.
    pub const fn descriptor(self) -> EndpointDescriptor {
        match self {
            Endpoint::GetProjects => EndpointDescriptor {
                path: "projects/get",
                envelope_key: Some("projects"),
                retryable: false,
                crm_scoped: false,
            },
            Endpoint::GetMetrics => EndpointDescriptor {
                path: "metrics/get",
                envelope_key: Some("metrics"),
                retryable: false,
                crm_scoped: false,
            },
            Endpoint::GetGroupings => EndpointDescriptor {
                path: "reports/getGroupings",
                envelope_key: Some("groupings"),
                retryable: false,
                crm_scoped: false,
            },
            Endpoint::GetAttributionModels => EndpointDescriptor {
                path: "reports/getModelAttributions",
                envelope_key: Some("modelAttributions"),
                retryable: false,
                crm_scoped: false,
            },
            Endpoint::GetChannels => EndpointDescriptor {
                path: "reports/getChannels",
                envelope_key: Some("channels"),
                retryable: false,
                crm_scoped: false,
            },
            Endpoint::GetPlacements => EndpointDescriptor {
                path: "reports/getPlacements",
                envelope_key: Some("placements"),
                retryable: false,
                crm_scoped: false,
            },
            Endpoint::GetCampaigns => EndpointDescriptor {
                path: "reports/getCampaigns",
                envelope_key: Some("campaigns"),
                retryable: false,
                crm_scoped: false,
            },
            Endpoint::GetAds => EndpointDescriptor {
                path: "reports/getAds",
                envelope_key: Some("ads"),
                retryable: false,
                crm_scoped: false,
            },
            Endpoint::GetKeywords => EndpointDescriptor {
                path: "reports/getKeywords",
                envelope_key: Some("keywords"),
                retryable: false,
                crm_scoped: false,
            },
            Endpoint::GetCrmCustomFields => EndpointDescriptor {
                path: "crm/crmCustomField/get",
                envelope_key: Some("crmCustomFields"),
                retryable: false,
                crm_scoped: true,
            },
            Endpoint::GetCrmCustomFieldGroups => EndpointDescriptor {
                path: "crm/crmCustomFieldGroup/get",
                envelope_key: Some("crmCustomFieldGroups"),
                retryable: false,
                crm_scoped: true,
            },
            Endpoint::GetReport => EndpointDescriptor {
                path: "reports/getReport",
                envelope_key: None,
                retryable: true,
                crm_scoped: false,
            },
        }
    }

    /// Path relative to the base host.
    pub const fn path(self) -> &'static str {
        self.descriptor().path
    }
}

/// Build the full URL for an endpoint on the given host.
pub fn endpoint_url(base_host: &str, endpoint: Endpoint) -> String {
    format!("{}{}", base_host, endpoint.path())
}
