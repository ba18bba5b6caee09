//! Usage record store port.
//!
//! The store holds closed usage intervals. Every read returns intervals
//! ordered by `start_time` ascending; the report aggregator relies on it.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AnalyticsError;
use crate::models::UsageInterval;

/// Durable store of closed usage intervals.
#[async_trait::async_trait]
pub trait UsageRecordStore: Send + Sync {
    /// Persists one fully-formed interval.
    ///
    /// Fails with `Validation` if the interval breaks its invariants.
    async fn append(&self, interval: UsageInterval) -> Result<(), AnalyticsError>;

    /// Intervals fully contained in `[start, end]`: `start_time >= start` and
    /// `end_time <= end`. Intervals that only overlap the window are excluded.
    async fn query_by_device_and_window(
        &self,
        device_id: Uuid,
        user_id: Option<Uuid>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<UsageInterval>, AnalyticsError>;

    /// Full, unwindowed history of a device.
    async fn query_by_device(&self, device_id: Uuid) -> Result<Vec<UsageInterval>, AnalyticsError>;

    /// A user's intervals for a device with optional bounds on either end.
    async fn query_by_owner(
        &self,
        user_id: Uuid,
        device_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<UsageInterval>, AnalyticsError>;

    /// Removes every interval owned by the user. Returns the number removed.
    async fn delete_by_owner(&self, user_id: Uuid) -> Result<u64, AnalyticsError>;

    /// Removes every interval of the device. Returns the number removed.
    async fn delete_by_device(&self, device_id: Uuid) -> Result<u64, AnalyticsError>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), AnalyticsError>;
}

/// Total order used for interval listings: start time, then end time, then id.
pub fn chronological(a: &UsageInterval, b: &UsageInterval) -> Ordering {
    a.start_time
        .cmp(&b.start_time)
        .then_with(|| a.end_time.cmp(&b.end_time))
        .then_with(|| a.id.cmp(&b.id))
}

/// Intervals of one device, behind their own lock.
type DeviceShard = Arc<RwLock<Vec<UsageInterval>>>;

/// In-memory store for tests and local runs.
///
/// Intervals are sharded by device, each shard under its own lock, so
/// appends for different devices do not contend. Each append is a single
/// insert under the shard's write lock, so readers never see a partially
/// written interval.
#[derive(Debug, Default)]
pub struct InMemoryUsageStore {
    devices: RwLock<HashMap<Uuid, DeviceShard>>,
}

impl InMemoryUsageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored intervals.
    pub async fn len(&self) -> usize {
        let mut total = 0;
        for shard in self.shards().await {
            total += shard.read().await.len();
        }
        total
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn shards(&self) -> Vec<DeviceShard> {
        self.devices.read().await.values().cloned().collect()
    }

    async fn shard(&self, device_id: Uuid) -> Option<DeviceShard> {
        self.devices.read().await.get(&device_id).cloned()
    }

    async fn shard_or_insert(&self, device_id: Uuid) -> DeviceShard {
        if let Some(shard) = self.shard(device_id).await {
            return shard;
        }
        self.devices
            .write()
            .await
            .entry(device_id)
            .or_default()
            .clone()
    }

    async fn select<F>(&self, device_id: Uuid, predicate: F) -> Vec<UsageInterval>
    where
        F: Fn(&UsageInterval) -> bool,
    {
        let Some(shard) = self.shard(device_id).await else {
            return Vec::new();
        };
        let intervals = shard.read().await;
        let mut selected: Vec<UsageInterval> =
            intervals.iter().filter(|i| predicate(i)).cloned().collect();
        selected.sort_by(chronological);
        selected
    }
}

#[async_trait::async_trait]
impl UsageRecordStore for InMemoryUsageStore {
    async fn append(&self, interval: UsageInterval) -> Result<(), AnalyticsError> {
        interval.validate()?;
        let shard = self.shard_or_insert(interval.device_id).await;
        shard.write().await.push(interval);
        Ok(())
    }

    async fn query_by_device_and_window(
        &self,
        device_id: Uuid,
        user_id: Option<Uuid>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<UsageInterval>, AnalyticsError> {
        Ok(self
            .select(device_id, |i| {
                user_id.map_or(true, |u| i.user_id == u)
                    && i.start_time >= start
                    && i.end_time <= end
            })
            .await)
    }

    async fn query_by_device(&self, device_id: Uuid) -> Result<Vec<UsageInterval>, AnalyticsError> {
        Ok(self.select(device_id, |_| true).await)
    }

    async fn query_by_owner(
        &self,
        user_id: Uuid,
        device_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<UsageInterval>, AnalyticsError> {
        Ok(self
            .select(device_id, |i| {
                i.user_id == user_id
                    && from.map_or(true, |f| i.start_time >= f)
                    && to.map_or(true, |t| i.end_time <= t)
            })
            .await)
    }

    async fn delete_by_owner(&self, user_id: Uuid) -> Result<u64, AnalyticsError> {
        let mut deleted = 0;
        for shard in self.shards().await {
            let mut intervals = shard.write().await;
            let before = intervals.len();
            intervals.retain(|i| i.user_id != user_id);
            deleted += (before - intervals.len()) as u64;
        }
        Ok(deleted)
    }

    async fn delete_by_device(&self, device_id: Uuid) -> Result<u64, AnalyticsError> {
        let Some(shard) = self.devices.write().await.remove(&device_id) else {
            return Ok(0);
        };
        let deleted = shard.read().await.len() as u64;
        Ok(deleted)
    }

    async fn ping(&self) -> Result<(), AnalyticsError> {
        Ok(())
    }
}
