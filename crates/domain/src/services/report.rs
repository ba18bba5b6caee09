//! Usage report aggregation.
//!
//! Reports are a pure function of the interval set in a window. The set is
//! put into chronological order before folding, so the same intervals in any
//! input order produce bit-identical aggregates.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::error::AnalyticsError;
use crate::models::{
    AnalyticsReport, EnvFootprint, HourlyConsumption, ReportOutcome, UsageInterval,
    HOURS_PER_DAY,
};
use crate::services::carbon::{carbon_kg, suggest_reductions};
use crate::services::store::{chronological, UsageRecordStore};

/// Builds analytics reports over a device's usage intervals.
#[derive(Clone)]
pub struct ReportAggregator {
    store: Arc<dyn UsageRecordStore>,
    /// Offset used to turn calendar dates into instants and to bucket by hour.
    offset: FixedOffset,
}

impl ReportAggregator {
    pub fn new(store: Arc<dyn UsageRecordStore>, offset: FixedOffset) -> Self {
        Self { store, offset }
    }

    /// Builds a report over the inclusive calendar-date range `[start, end]`.
    pub async fn build_report(
        &self,
        device_id: Uuid,
        user_id: Option<Uuid>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ReportOutcome, AnalyticsError> {
        let (window_start, window_end) = self.date_window(start, end)?;
        self.build_report_for_window(device_id, user_id, window_start, window_end)
            .await
    }

    /// Builds a report over intervals fully contained in `[start, end]`.
    pub async fn build_report_for_window(
        &self,
        device_id: Uuid,
        user_id: Option<Uuid>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ReportOutcome, AnalyticsError> {
        ensure_ordered(start, end)?;

        let intervals = self
            .store
            .query_by_device_and_window(device_id, user_id, start, end)
            .await?;

        debug!(
            device_id = %device_id,
            interval_count = intervals.len(),
            "Loaded intervals for report"
        );

        Ok(match summarize(device_id, start, end, &intervals, self.offset) {
            Some(report) => ReportOutcome::Report(report),
            None => ReportOutcome::NoData,
        })
    }

    /// Carbon footprint and reduction advice over a calendar-date range.
    ///
    /// Returns `None` when the window holds no intervals.
    pub async fn env_footprint(
        &self,
        device_id: Uuid,
        user_id: Option<Uuid>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<EnvFootprint>, AnalyticsError> {
        let (window_start, window_end) = self.date_window(start, end)?;
        let mut intervals = self
            .store
            .query_by_device_and_window(device_id, user_id, window_start, window_end)
            .await?;

        if intervals.is_empty() {
            return Ok(None);
        }

        intervals.sort_by(chronological);
        let total: f64 = intervals.iter().map(|i| i.energy_consumed_wh).sum();
        let carbon = carbon_kg(total);

        Ok(Some(EnvFootprint {
            device_id,
            total_power_consumption: total,
            carbon_consumption: carbon,
            reduction_suggestions: suggest_reductions(carbon),
        }))
    }

    fn date_window(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>), AnalyticsError> {
        if start > end {
            return Err(AnalyticsError::InvalidRange(
                "Start date must be before end date".to_string(),
            ));
        }
        shared::validation::day_window(start, end, self.offset)
            .map_err(|e| AnalyticsError::InvalidRange(e.to_string()))
    }
}

fn ensure_ordered(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), AnalyticsError> {
    if start > end {
        Err(AnalyticsError::InvalidRange(
            "Window start must not be after window end".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Computes report statistics for an interval set, or `None` if it is empty.
///
/// `first_usage_time` and `last_usage_time` come from the first and last
/// interval in chronological order.
pub fn summarize(
    device_id: Uuid,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    intervals: &[UsageInterval],
    offset: FixedOffset,
) -> Option<AnalyticsReport> {
    let mut ordered: Vec<&UsageInterval> = intervals.iter().collect();
    ordered.sort_by(|a, b| chronological(a, b));

    let first = *ordered.first()?;
    let last = *ordered.last()?;

    let mut total_energy = 0.0;
    let mut total_hours = 0.0;
    let mut peak = 0.0_f64;
    let mut hourly = [0.0_f64; HOURS_PER_DAY];

    for interval in &ordered {
        total_energy += interval.energy_consumed_wh;
        total_hours += interval.duration_hours;
        peak = peak.max(interval.energy_consumed_wh);

        let hour = interval.start_time.with_timezone(&offset).hour() as usize;
        hourly[hour] += interval.energy_consumed_wh;
    }

    let avg_power_consumption = if total_hours > 0.0 {
        Some(total_energy / total_hours)
    } else {
        None
    };

    Some(AnalyticsReport {
        device_id,
        window_start,
        window_end,
        interval_count: ordered.len(),
        total_power_consumption: total_energy,
        total_usage_time: total_hours,
        peak_power_usage: peak,
        avg_power_consumption,
        first_usage_time: first.start_time,
        last_usage_time: last.end_time,
        hourly_data: hourly
            .iter()
            .enumerate()
            .map(|(hour, consumption)| HourlyConsumption {
                hour: hour as u32,
                consumption: *consumption,
            })
            .collect(),
        carbon_consumption: carbon_kg(total_energy),
    })
}
