use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::Serialize;

use super::attribution::Attribution;
use super::filters::Filter;

const Y_M_D: &str = "%Y-%m-%d";

/// Report boundary date in `YYYY-MM-DD` wire form.
///
/// Strings are passed through untouched; chrono dates and datetimes are
/// formatted down to their date part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDate(String);

impl ReportDate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ReportDate {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ReportDate {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<NaiveDate> for ReportDate {
    fn from(value: NaiveDate) -> Self {
        Self(value.format(Y_M_D).to_string())
    }
}

impl From<NaiveDateTime> for ReportDate {
    fn from(value: NaiveDateTime) -> Self {
        value.date().into()
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for ReportDate {
    fn from(value: DateTime<Tz>) -> Self {
        value.date_naive().into()
    }
}

/// Row grouping for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GroupBy {
    #[serde(rename = "ad_id")]
    Ads,
    #[serde(rename = "day")]
    Day,
    #[serde(rename = "placement_id")]
    Placement,
    #[serde(rename = "campaigns")]
    Campaign,
    #[serde(rename = "smartis_object")]
    Objects,
}

/// Report aggregation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Raw,
    Aggregated,
}

/// Parameters for a `reports/getReport` request.
///
/// Serialization follows the exact wire layout: `project`, `metrics`,
/// `datetimeFrom`, `datetimeTo`, `groupBy`, `type`, `filters` (omitted when
/// empty), `attribution`, `fields` (omitted when empty).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    project: String,
    metrics: String,
    #[serde(rename = "datetimeFrom")]
    datetime_from: String,
    #[serde(rename = "datetimeTo")]
    datetime_to: String,
    #[serde(rename = "groupBy")]
    group_by: GroupBy,
    #[serde(rename = "type")]
    report_type: ReportType,
    #[serde(skip_serializing_if = "Option::is_none")]
    filters: Option<Vec<Filter>>,
    attribution: Attribution,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<String>,
}

impl Payload {
    /// Aggregated report over the given metrics and date range.
    ///
    /// Metric codes are joined with `;` for the wire form.
    pub fn new<M>(
        project: impl Into<String>,
        metrics: impl IntoIterator<Item = M>,
        datetime_from: impl Into<ReportDate>,
        datetime_to: impl Into<ReportDate>,
        group_by: GroupBy,
        attribution: Attribution,
    ) -> Self
    where
        M: Into<String>,
    {
        let metrics: Vec<String> = metrics.into_iter().map(Into::into).collect();
        Self {
            project: project.into(),
            metrics: metrics.join(";"),
            datetime_from: datetime_from.into().0,
            datetime_to: datetime_to.into().0,
            group_by,
            report_type: ReportType::Aggregated,
            filters: None,
            attribution,
            fields: None,
        }
    }

    pub fn with_report_type(mut self, report_type: ReportType) -> Self {
        self.report_type = report_type;
        self
    }

    /// An empty filter list is treated as no filters at all.
    pub fn with_filters(mut self, filters: Vec<Filter>) -> Self {
        self.filters = if filters.is_empty() {
            None
        } else {
            Some(filters)
        };
        self
    }

    /// CRM field codes to include, joined with `;` for the wire form.
    pub fn with_fields<F>(mut self, fields: impl IntoIterator<Item = F>) -> Self
    where
        F: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        self.fields = if fields.is_empty() {
            None
        } else {
            Some(fields.join(";"))
        };
        self
    }

    /// Wire-format JSON body for the report request.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("payload serializes to JSON")
    }
}
