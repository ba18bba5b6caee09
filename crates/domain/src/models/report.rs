//! Analytics report domain models.
//!
//! Reports are computed on demand from the stored intervals and are never
//! persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of hour-of-day buckets in a report histogram.
pub const HOURS_PER_DAY: usize = 24;

/// Energy consumed by intervals starting in one hour of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyConsumption {
    /// Hour of day, 0 through 23.
    pub hour: u32,
    /// Watt-hours of intervals starting in this hour.
    pub consumption: f64,
}

/// Aggregated usage statistics for one device over one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub device_id: Uuid,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    /// Number of intervals the report was computed from.
    pub interval_count: usize,
    /// Sum of interval energy, Wh.
    pub total_power_consumption: f64,
    /// Sum of interval durations, hours.
    pub total_usage_time: f64,
    /// Energy of the single largest interval, Wh.
    pub peak_power_usage: f64,
    /// `total_power_consumption / total_usage_time`; absent when no time accrued.
    pub avg_power_consumption: Option<f64>,
    pub first_usage_time: DateTime<Utc>,
    pub last_usage_time: DateTime<Utc>,
    /// Always 24 entries, ordered by hour.
    pub hourly_data: Vec<HourlyConsumption>,
    /// Estimated emissions, kg CO2.
    pub carbon_consumption: f64,
}

/// Result of building a report: either statistics or an explicit empty marker.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    /// No intervals were fully contained in the window.
    NoData,
    Report(AnalyticsReport),
}

impl ReportOutcome {
    pub fn is_no_data(&self) -> bool {
        matches!(self, ReportOutcome::NoData)
    }
}

/// Carbon footprint of a device over a window, with reduction advice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvFootprint {
    pub device_id: Uuid,
    pub total_power_consumption: f64,
    pub carbon_consumption: f64,
    pub reduction_suggestions: Vec<String>,
}

/// Query parameters for date-windowed analytics endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    /// Inclusive start date, `YYYY-MM-DD`.
    #[serde(default)]
    pub start_date: Option<String>,
    /// Inclusive end date, `YYYY-MM-DD`.
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Status of an analytics response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsStatus {
    Ok,
    NoData,
}

/// Response body for the report endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub status: AnalyticsStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics: Option<AnalyticsReport>,
}

impl From<ReportOutcome> for ReportResponse {
    fn from(outcome: ReportOutcome) -> Self {
        match outcome {
            ReportOutcome::NoData => Self {
                status: AnalyticsStatus::NoData,
                message: Some("No usage data found for the given time range".to_string()),
                analytics: None,
            },
            ReportOutcome::Report(report) => Self {
                status: AnalyticsStatus::Ok,
                message: None,
                analytics: Some(report),
            },
        }
    }
}

/// Response body for the environmental footprint endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct FootprintResponse {
    pub status: AnalyticsStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footprint: Option<EnvFootprint>,
}

impl From<Option<EnvFootprint>> for FootprintResponse {
    fn from(footprint: Option<EnvFootprint>) -> Self {
        match footprint {
            None => Self {
                status: AnalyticsStatus::NoData,
                message: Some("No usage data found".to_string()),
                footprint: None,
            },
            Some(footprint) => Self {
                status: AnalyticsStatus::Ok,
                message: Some("Environmental footprint fetched".to_string()),
                footprint: Some(footprint),
            },
        }
    }
}
