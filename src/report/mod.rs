//! Report query construction
//!
//! [`Payload`] carries everything the `reports/getReport` endpoint accepts
//! and serializes to its exact wire layout.

pub mod attribution;
pub mod filters;
pub mod payload;

pub use attribution::{Attribution, AttributionModel};
pub use filters::{Filter, FilterCategory};
pub use payload::{GroupBy, Payload, ReportDate, ReportType};
