//! Usage recorder.
//!
//! Turns device on→off transitions into stored usage intervals.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AnalyticsError;
use crate::models::{PowerTransition, UsageInterval};
use crate::services::store::UsageRecordStore;

/// Port through which device control reports a completed on→off episode.
///
/// The transport (HTTP, queue, direct call) is an adapter around this trait.
#[async_trait::async_trait]
pub trait UsageSink: Send + Sync {
    /// Records one transition and returns the stored interval.
    async fn record_transition(
        &self,
        transition: PowerTransition,
    ) -> Result<UsageInterval, AnalyticsError>;
}

/// Derives usage intervals and appends them to the store.
///
/// Repeated calls with identical parameters store duplicate intervals.
#[derive(Clone)]
pub struct UsageRecorder {
    store: Arc<dyn UsageRecordStore>,
}

impl UsageRecorder {
    pub fn new(store: Arc<dyn UsageRecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl UsageSink for UsageRecorder {
    async fn record_transition(
        &self,
        transition: PowerTransition,
    ) -> Result<UsageInterval, AnalyticsError> {
        let interval = UsageInterval::from_transition(&transition).inspect_err(|e| {
            debug!(
                device_id = %transition.device_id,
                error = %e,
                "Rejected device transition"
            );
        })?;

        self.store.append(interval.clone()).await?;

        info!(
            interval_id = %interval.id,
            device_id = %interval.device_id,
            user_id = %interval.user_id,
            duration_hours = interval.duration_hours,
            energy_wh = interval.energy_consumed_wh,
            "Recorded usage interval"
        );

        Ok(interval)
    }
}

/// Convenience wrapper returning only the new interval's id.
pub async fn record_transition(
    sink: &dyn UsageSink,
    transition: PowerTransition,
) -> Result<Uuid, AnalyticsError> {
    sink.record_transition(transition).await.map(|i| i.id)
}
