//! Client SDK for the Smartis.bi reporting API.
//!
//! Covers report queries with resilient retry handling, typed metadata
//! lookups (channels, placements, campaigns, ads, keywords, CRM custom
//! fields), and the identifier normalization the CRM endpoints expect.
//!
//! ```no_run
//! use smartis_sdk::{Attribution, AttributionModel, GroupBy, Payload, SmartisClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), smartis_sdk::Error> {
//!     let client = SmartisClient::new("api-key")?;
//!
//!     let payload = Payload::new(
//!         "my-project",
//!         ["visits"],
//!         "2023-01-01",
//!         "2023-01-31",
//!         GroupBy::Day,
//!         Attribution::new(AttributionModel::LastClick, 30, true),
//!     );
//!     let report = client.fetch_report(&payload).await?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod constants;
pub mod credentials;
pub mod entities;
pub mod error;
pub mod ids;
pub mod report;
pub mod resilience;
pub mod testing;
pub mod transport;

pub use client::{SmartisClient, SmartisClientBuilder};
pub use constants::{Endpoint, EndpointDescriptor};
pub use credentials::{Credentials, Host};
pub use entities::{
    Ad, Campaign, Channel, CrmCustomField, CrmCustomFieldGroup, EntityCollection, Keyword,
    Placement, PlacementChannel,
};
pub use error::{Error, Result};
pub use ids::{IdNamespace, IdToken, normalize_ids};
pub use report::{
    Attribution, AttributionModel, Filter, FilterCategory, GroupBy, Payload, ReportDate,
    ReportType,
};
pub use resilience::{Outcome, RetryConfig, RetryPolicy, classify};
pub use transport::{HttpTransport, RawResponse, Sleeper, TokioSleeper, Transport};
