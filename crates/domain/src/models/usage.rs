//! Usage interval domain models.
//!
//! A usage interval is one completed on→off episode of a device. Duration and
//! energy are derived once, when the interval is built, and stored with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::AnalyticsError;

/// Seconds in one hour, used to express durations in hours.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// A device power-state transition reported by device control when a device
/// is switched off after having been on.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerTransition {
    pub user_id: Uuid,
    pub device_id: Uuid,
    /// Rated power draw of the device in watts.
    pub watts: f64,
    /// When the device was switched on.
    pub start_time: DateTime<Utc>,
    /// When the device was switched off.
    pub end_time: DateTime<Utc>,
}

/// One stored, immutable usage interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageInterval {
    pub id: Uuid,
    pub user_id: Uuid,
    pub device_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// `(end_time - start_time)` in hours.
    pub duration_hours: f64,
    /// `watts * duration_hours`, in watt-hours.
    pub energy_consumed_wh: f64,
    pub created_at: DateTime<Utc>,
}

impl UsageInterval {
    /// Builds a new interval from a transition, deriving duration and energy.
    ///
    /// Fails with `InvalidInterval` when the transition does not describe a
    /// positive duration or the wattage is negative.
    pub fn from_transition(transition: &PowerTransition) -> Result<Self, AnalyticsError> {
        if !transition.watts.is_finite() || transition.watts < 0.0 {
            return Err(AnalyticsError::InvalidInterval(format!(
                "wattage must be non-negative, got {}",
                transition.watts
            )));
        }

        let elapsed = (transition.end_time - transition.start_time)
            .to_std()
            .ok()
            .filter(|d| !d.is_zero())
            .ok_or_else(|| {
                AnalyticsError::InvalidInterval("endTime must be after startTime".to_string())
            })?;

        let duration_hours = elapsed.as_secs_f64() / SECONDS_PER_HOUR;

        Ok(Self {
            id: Uuid::new_v4(),
            user_id: transition.user_id,
            device_id: transition.device_id,
            start_time: transition.start_time,
            end_time: transition.end_time,
            duration_hours,
            energy_consumed_wh: transition.watts * duration_hours,
            created_at: Utc::now(),
        })
    }

    /// Checks the invariants every stored interval must hold.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if self.user_id.is_nil() {
            return Err(AnalyticsError::Validation("userId is required".to_string()));
        }
        if self.device_id.is_nil() {
            return Err(AnalyticsError::Validation("deviceId is required".to_string()));
        }
        if self.end_time <= self.start_time {
            return Err(AnalyticsError::Validation(
                "endTime must be after startTime".to_string(),
            ));
        }
        if !self.duration_hours.is_finite() || self.duration_hours <= 0.0 {
            return Err(AnalyticsError::Validation(
                "duration must be positive".to_string(),
            ));
        }
        if !self.energy_consumed_wh.is_finite() || self.energy_consumed_wh < 0.0 {
            return Err(AnalyticsError::Validation(
                "energy consumed must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Request payload sent by device control when a device is switched off.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordUsageRequest {
    pub user_id: Uuid,
    pub device_id: Uuid,
    #[validate(custom(function = "shared::validation::validate_wattage"))]
    pub watts: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl From<RecordUsageRequest> for PowerTransition {
    fn from(request: RecordUsageRequest) -> Self {
        Self {
            user_id: request.user_id,
            device_id: request.device_id,
            watts: request.watts,
            start_time: request.start_time,
            end_time: request.end_time,
        }
    }
}

/// Response payload for a recorded interval.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUsageResponse {
    pub id: Uuid,
    pub duration_hours: f64,
    pub energy_consumed_wh: f64,
}

/// Query parameters for listing a device's raw usage intervals.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageListQuery {
    /// Only intervals starting at or after this instant.
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// Only intervals ending at or before this instant.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

/// One entry of the raw usage listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageListEntry {
    pub id: Uuid,
    pub device_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_hours: f64,
    /// Elapsed time rounded to whole minutes.
    pub duration_minutes: i64,
    pub energy_consumed_wh: f64,
    pub created_at: DateTime<Utc>,
}

impl From<UsageInterval> for UsageListEntry {
    fn from(interval: UsageInterval) -> Self {
        let elapsed_ms = (interval.end_time - interval.start_time).num_milliseconds();
        Self {
            id: interval.id,
            device_id: interval.device_id,
            start_time: interval.start_time,
            end_time: interval.end_time,
            duration_hours: interval.duration_hours,
            duration_minutes: (elapsed_ms as f64 / 60_000.0).round() as i64,
            energy_consumed_wh: interval.energy_consumed_wh,
            created_at: interval.created_at,
        }
    }
}

/// Response for the raw usage listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageListResponse {
    pub usage: Vec<UsageListEntry>,
}

/// Response for the cascade delete endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteUsageResponse {
    pub deleted: u64,
}
