use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::constants::{self, Endpoint, EndpointDescriptor, headers};
use crate::credentials::{Credentials, Host};
use crate::entities::{
    Ad, Campaign, Channel, CrmCustomField, CrmCustomFieldGroup, EntityCollection, Keyword,
    Placement,
};
use crate::error::{Error, Result};
use crate::ids::{IdNamespace, IdToken, normalize_ids};
use crate::report::Payload;
use crate::resilience::{Outcome, RetryConfig, RetryPolicy, classify};
use crate::transport::{HttpTransport, Sleeper, TokioSleeper, Transport};

/// Smartis reporting API client.
///
/// Cheap to clone and safe to share across tasks: credentials and the
/// endpoint registry are read-only, and retry state is created fresh for
/// every call.
#[derive(Clone)]
pub struct SmartisClient {
    base_url: String,
    credentials: Credentials,
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
    retry_policy: RetryPolicy,
}

impl SmartisClient {
    /// Client against the production host with default retry behavior.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    /// Start building a client with custom host, credentials or retry
    /// configuration.
    pub fn builder(api_key: impl Into<String>) -> SmartisClientBuilder {
        SmartisClientBuilder {
            credentials: Credentials::new(api_key),
            host: Host::default(),
            base_url: None,
            retry_config: RetryConfig::default(),
            transport: None,
            sleeper: None,
        }
    }

    /// Fetch a report, retrying through rate limits and transient failures.
    ///
    /// Retryable failures are absorbed: after `max_attempts` consecutive
    /// failures the client sleeps out the cooldown and starts a fresh
    /// budget, indefinitely. During a sustained outage this call therefore
    /// blocks until the API recovers — use
    /// [`fetch_report_with_deadline`](Self::fetch_report_with_deadline) to
    /// bound it. Only a 400/403 rejection or a malformed success body
    /// terminates with an error.
    pub async fn fetch_report(&self, payload: &Payload) -> Result<Value> {
        let url = constants::endpoint_url(&self.base_url, Endpoint::GetReport);
        let request_headers = self.request_headers();
        let body = payload.to_json();

        let response_body = self
            .retry_policy
            .execute(self.sleeper.as_ref(), || {
                self.transport.post(&url, &request_headers, Some(&body))
            })
            .await?;

        serde_json::from_str(&response_body)
            .map_err(|e| Error::SchemaValidation(format!("invalid JSON body: {e}")))
    }

    /// Same as [`fetch_report`](Self::fetch_report), aborting with
    /// [`Error::DeadlineExceeded`] once `deadline` has elapsed.
    pub async fn fetch_report_with_deadline(
        &self,
        payload: &Payload,
        deadline: Duration,
    ) -> Result<Value> {
        match tokio::time::timeout(deadline, self.fetch_report(payload)).await {
            Ok(result) => result,
            Err(_) => Err(Error::DeadlineExceeded),
        }
    }

    /// Fetch all channels visible to the account.
    pub async fn fetch_channels(&self) -> Result<EntityCollection<Channel>> {
        self.fetch_entities(Endpoint::GetChannels, None).await
    }

    /// Fetch all placements visible to the account.
    pub async fn fetch_placements(&self) -> Result<EntityCollection<Placement>> {
        self.fetch_entities(Endpoint::GetPlacements, None).await
    }

    /// Fetch campaigns by id.
    pub async fn fetch_campaigns(&self, ids: &[i64]) -> Result<EntityCollection<Campaign>> {
        self.fetch_entities(Endpoint::GetCampaigns, Some(ids)).await
    }

    /// Fetch ads by id.
    pub async fn fetch_ads(&self, ids: &[i64]) -> Result<EntityCollection<Ad>> {
        self.fetch_entities(Endpoint::GetAds, Some(ids)).await
    }

    /// Fetch keywords by id.
    pub async fn fetch_keywords(&self, ids: &[i64]) -> Result<EntityCollection<Keyword>> {
        self.fetch_entities(Endpoint::GetKeywords, Some(ids)).await
    }

    /// Fetch CRM custom fields for a mixed bag of dashboard tokens.
    ///
    /// Tokens are normalized first (see [`normalize_ids`]); group-prefixed
    /// and unrecognized tokens are dropped. Requires a CRM token.
    pub async fn fetch_crm_custom_fields<I>(
        &self,
        tokens: I,
    ) -> Result<EntityCollection<CrmCustomField>>
    where
        I: IntoIterator,
        I::Item: Into<IdToken>,
    {
        let ids: Vec<i64> = normalize_ids(tokens, IdNamespace::Field)
            .into_iter()
            .collect();
        self.fetch_entities(Endpoint::GetCrmCustomFields, Some(&ids))
            .await
    }

    /// Fetch CRM custom field groups for a mixed bag of dashboard tokens.
    ///
    /// Requires a CRM token.
    pub async fn fetch_crm_custom_field_groups<I>(
        &self,
        tokens: I,
    ) -> Result<EntityCollection<CrmCustomFieldGroup>>
    where
        I: IntoIterator,
        I::Item: Into<IdToken>,
    {
        let ids: Vec<i64> = normalize_ids(tokens, IdNamespace::FieldGroup)
            .into_iter()
            .collect();
        self.fetch_entities(Endpoint::GetCrmCustomFieldGroups, Some(&ids))
            .await
    }

    /// Untyped reference lookups: projects, metrics, groupings, attribution
    /// models.
    pub async fn fetch_reference(&self, endpoint: Endpoint) -> Result<Vec<Value>> {
        let collection: EntityCollection<Value> = self.fetch_entities(endpoint, None).await?;
        Ok(collection.items)
    }

    /// Generic fetch/validate pipeline behind the typed accessors.
    ///
    /// Issues exactly one POST — retryable-class failures surface directly
    /// here instead of blocking, since metadata calls happen in bulk.
    pub async fn fetch_entities<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        ids: Option<&[i64]>,
    ) -> Result<EntityCollection<T>> {
        let descriptor = endpoint.descriptor();
        let body = self.entity_body(&descriptor, ids)?;
        let url = constants::endpoint_url(&self.base_url, endpoint);

        let response = self
            .transport
            .post(&url, &self.request_headers(), body.as_deref())
            .await?;

        match classify(response.status, &response.headers, &response.body) {
            Outcome::Success => {}
            Outcome::Fatal(message) => {
                return Err(Error::Fatal {
                    status: response.status,
                    message,
                });
            }
            Outcome::RateLimited(wait_secs) => return Err(Error::RateLimited { wait_secs }),
            Outcome::Retryable(status) => return Err(Error::TransientServer { status }),
            Outcome::Unknown(status) => return Err(Error::UnknownStatus { status }),
        }

        let root: Value = serde_json::from_str(&response.body)
            .map_err(|e| Error::SchemaValidation(format!("invalid JSON body: {e}")))?;
        let payload = match descriptor.envelope_key {
            Some(key) => root.get(key).cloned().ok_or_else(|| {
                Error::SchemaValidation(format!("missing `{key}` field in response"))
            })?,
            None => root,
        };
        let items: Vec<T> =
            serde_json::from_value(payload).map_err(|e| Error::SchemaValidation(e.to_string()))?;

        debug!("Fetched {} items from {}", items.len(), descriptor.path);
        Ok(EntityCollection::new(items))
    }

    /// Body for an entity fetch; `None` when the operation takes no
    /// parameters. Fails before any network traffic if a CRM-scoped
    /// endpoint lacks its token.
    fn entity_body(
        &self,
        descriptor: &EndpointDescriptor,
        ids: Option<&[i64]>,
    ) -> Result<Option<String>> {
        let mut body = serde_json::Map::new();
        if let Some(ids) = ids {
            body.insert("ids".to_string(), json!(ids));
        }
        if descriptor.crm_scoped {
            let token = self
                .credentials
                .crm_token
                .as_deref()
                .ok_or(Error::MissingCredential {
                    endpoint: descriptor.path,
                })?;
            body.insert(
                "smartis_crm_token".to_string(),
                Value::String(token.to_string()),
            );
        }

        if body.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Value::Object(body).to_string()))
        }
    }

    fn request_headers(&self) -> HashMap<String, String> {
        HashMap::from([
            (
                "Authorization".to_string(),
                format!("Bearer {}", self.credentials.api_key),
            ),
            (
                "Content-Type".to_string(),
                headers::CONTENT_TYPE_JSON.to_string(),
            ),
        ])
    }
}

/// Builder for [`SmartisClient`].
pub struct SmartisClientBuilder {
    credentials: Credentials,
    host: Host,
    base_url: Option<String>,
    retry_config: RetryConfig,
    transport: Option<Arc<dyn Transport>>,
    sleeper: Option<Arc<dyn Sleeper>>,
}

impl SmartisClientBuilder {
    /// Select the production or development environment.
    pub fn host(mut self, host: Host) -> Self {
        self.host = host;
        self
    }

    /// Point the client at an explicit base URL instead of a [`Host`]
    /// (self-hosted gateways, mock servers). A trailing slash is appended
    /// when missing.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Secondary credential for CRM-scoped endpoints.
    pub fn crm_token(mut self, token: impl Into<String>) -> Self {
        self.credentials = self.credentials.with_crm_token(token);
        self
    }

    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Substitute the transport implementation (used by tests).
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Substitute the sleep implementation (used by tests).
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    pub fn build(self) -> Result<SmartisClient> {
        let mut base_url = self
            .base_url
            .unwrap_or_else(|| self.host.base_url().to_string());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new()?),
        };
        let sleeper = self.sleeper.unwrap_or_else(|| Arc::new(TokioSleeper));

        Ok(SmartisClient {
            base_url,
            credentials: self.credentials,
            transport,
            sleeper,
            retry_policy: RetryPolicy::new(self.retry_config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Attribution, AttributionModel, GroupBy};
    use crate::testing::{RecordingSleeper, ScriptedTransport, response};
    use crate::transport::RawResponse;

    fn client_with(
        responses: Vec<Result<RawResponse>>,
        crm_token: Option<&str>,
    ) -> (SmartisClient, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::new(responses));
        let mut builder = SmartisClient::builder("test-key")
            .transport(transport.clone())
            .sleeper(Arc::new(RecordingSleeper::new()))
            .retry_config(RetryConfig {
                request_pause: Duration::ZERO,
                ..RetryConfig::default()
            });
        if let Some(token) = crm_token {
            builder = builder.crm_token(token);
        }
        (builder.build().unwrap(), transport)
    }

    fn sample_payload() -> Payload {
        Payload::new(
            "test",
            ["test"],
            "2023-01-01",
            "2023-01-31",
            GroupBy::Ads,
            Attribution::new(AttributionModel::LinearWithPostview, 1, true),
        )
    }

    #[tokio::test]
    async fn test_missing_crm_token_fails_before_network() {
        let (client, transport) = client_with(vec![], None);

        let err = client
            .fetch_crm_custom_fields(["field_1"])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingCredential { .. }));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_channels_request_shape() {
        let (client, transport) = client_with(
            vec![Ok(response(
                200,
                &[],
                r#"{"channels":[{"id":1,"title":"SEO"},{"id":2,"title":"Context"}]}"#,
            ))],
            None,
        );

        let channels = client.fetch_channels().await.unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels.items[0].title, "SEO");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://my.smartis.bi/api/reports/getChannels"
        );
        assert_eq!(requests[0].body, None);
        assert_eq!(
            requests[0].headers.get("Authorization").map(String::as_str),
            Some("Bearer test-key")
        );
        assert_eq!(
            requests[0].headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn test_campaigns_send_ids_body() {
        let (client, transport) =
            client_with(vec![Ok(response(200, &[], r#"{"campaigns":[]}"#))], None);

        let campaigns = client.fetch_campaigns(&[10, 20]).await.unwrap();
        assert!(campaigns.is_empty());

        let body = transport.requests()[0].body.clone().unwrap();
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body, json!({"ids": [10, 20]}));
    }

    #[tokio::test]
    async fn test_crm_fields_normalize_tokens_and_send_token() {
        let (client, transport) = client_with(
            vec![Ok(response(200, &[], r#"{"crmCustomFields":[]}"#))],
            Some("crm-token"),
        );

        client
            .fetch_crm_custom_fields(["field_3", "2", "field_cf_group_9"])
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].url, "https://my.smartis.bi/api/crm/crmCustomField/get");
        let body: Value = serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"ids": [2, 3], "smartis_crm_token": "crm-token"})
        );
    }

    #[tokio::test]
    async fn test_crm_field_groups_use_group_namespace() {
        let (client, transport) = client_with(
            vec![Ok(response(200, &[], r#"{"crmCustomFieldGroups":[]}"#))],
            Some("crm-token"),
        );

        client
            .fetch_crm_custom_field_groups(["field_cf_group_4", "field_2", "1"])
            .await
            .unwrap();

        let body: Value =
            serde_json::from_str(transport.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"ids": [1, 4], "smartis_crm_token": "crm-token"})
        );
    }

    #[tokio::test]
    async fn test_missing_envelope_is_schema_error() {
        let (client, _) = client_with(vec![Ok(response(200, &[], r#"{"rows":[]}"#))], None);

        let err = client.fetch_channels().await.unwrap_err();
        match err {
            Error::SchemaValidation(message) => assert!(message.contains("channels")),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_field_mismatch_is_schema_error() {
        let (client, _) = client_with(
            vec![Ok(response(
                200,
                &[],
                r#"{"channels":[{"id":"not a number","title":"SEO"}]}"#,
            ))],
            None,
        );

        let err = client.fetch_channels().await.unwrap_err();
        assert!(matches!(err, Error::SchemaValidation(_)));
    }

    #[tokio::test]
    async fn test_entity_fetch_does_not_retry() {
        let (client, transport) = client_with(
            vec![Ok(response(
                429,
                &[("X-Ratelimit-Remaining", "0"), ("Retry-After", "30")],
                "",
            ))],
            None,
        );

        let err = client.fetch_channels().await.unwrap_err();
        assert!(matches!(err, Error::RateLimited { wait_secs: 30 }));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_fatal_propagates_server_message() {
        let (client, _) = client_with(
            vec![Ok(response(400, &[], r#"{"error":"bad project"}"#))],
            None,
        );

        let err = client.fetch_channels().await.unwrap_err();
        match err {
            Error::Fatal { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad project");
            }
            other => panic!("expected fatal error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_reference_unwraps_envelope() {
        let (client, transport) = client_with(
            vec![Ok(response(
                200,
                &[],
                r#"{"projects":[{"id":1,"title":"a"},{"id":2,"title":"b"}]}"#,
            ))],
            None,
        );

        let projects = client.fetch_reference(Endpoint::GetProjects).await.unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(transport.requests()[0].url, "https://my.smartis.bi/api/projects/get");
        assert_eq!(transport.requests()[0].body, None);
    }

    #[tokio::test]
    async fn test_fetch_report_sends_payload_and_parses_body() {
        let (client, transport) = client_with(
            vec![Ok(response(200, &[], r#"{"reports":[{"ad_id":7}]}"#))],
            None,
        );

        let payload = sample_payload();
        let report = client.fetch_report(&payload).await.unwrap();
        assert_eq!(report["reports"][0]["ad_id"], json!(7));

        let requests = transport.requests();
        assert_eq!(requests[0].url, "https://my.smartis.bi/api/reports/getReport");
        assert_eq!(requests[0].body.as_deref(), Some(payload.to_json().as_str()));
    }

    #[tokio::test]
    async fn test_fetch_report_rejects_malformed_success_body() {
        let (client, _) = client_with(vec![Ok(response(200, &[], "not json"))], None);

        let err = client.fetch_report(&sample_payload()).await.unwrap_err();
        assert!(matches!(err, Error::SchemaValidation(_)));
    }

    #[tokio::test]
    async fn test_fetch_report_deadline_interrupts_cooldown() {
        // Real (but tiny) pauses so the timeout has something to interrupt.
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(response(500, &[], "")),
            Ok(response(500, &[], "")),
        ]));
        let client = SmartisClient::builder("test-key")
            .transport(transport.clone())
            .retry_config(RetryConfig {
                max_attempts: 2,
                request_pause: Duration::from_millis(5),
                cooldown: Duration::from_secs(10),
                unknown_status_pause: Duration::ZERO,
            })
            .build()
            .unwrap();

        let err = client
            .fetch_report_with_deadline(&sample_payload(), Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DeadlineExceeded));
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_builder_host_and_base_url_selection() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(response(
            200,
            &[],
            r#"{"channels":[]}"#,
        ))]));
        let client = SmartisClient::builder("k")
            .host(Host::Development)
            .transport(transport.clone())
            .build()
            .unwrap();
        client.fetch_channels().await.unwrap();
        assert_eq!(
            transport.requests()[0].url,
            "https://dev.smartis.bi/api/reports/getChannels"
        );

        let transport = Arc::new(ScriptedTransport::new(vec![Ok(response(
            200,
            &[],
            r#"{"channels":[]}"#,
        ))]));
        let client = SmartisClient::builder("k")
            .base_url("http://localhost:9")
            .transport(transport.clone())
            .build()
            .unwrap();
        client.fetch_channels().await.unwrap();
        assert_eq!(
            transport.requests()[0].url,
            "http://localhost:9/reports/getChannels"
        );
    }
}
