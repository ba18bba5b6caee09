//! PostgreSQL-backed usage record store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::models::UsageInterval;
use domain::services::UsageRecordStore;
use domain::AnalyticsError;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use crate::entities::UsageIntervalEntity;
use crate::metrics::QueryTimer;

const SELECT_COLUMNS: &str = "SELECT id, user_id, device_id, start_time, end_time, \
     duration_hours, energy_consumed_wh, created_at FROM usage_intervals";

const ORDER_CHRONOLOGICAL: &str = "ORDER BY start_time ASC, end_time ASC, id ASC";

/// Usage record store over the usage_intervals table.
#[derive(Clone)]
pub struct PgUsageRecordStore {
    pool: PgPool,
}

impl PgUsageRecordStore {
    /// Creates a new store with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> AnalyticsError {
    move |e| {
        error!(operation, error = %e, "Usage store query failed");
        AnalyticsError::StorageUnavailable(format!("{operation} failed"))
    }
}

fn into_domain(rows: Vec<UsageIntervalEntity>) -> Vec<UsageInterval> {
    rows.into_iter().map(Into::into).collect()
}

#[async_trait]
impl UsageRecordStore for PgUsageRecordStore {
    async fn append(&self, interval: UsageInterval) -> Result<(), AnalyticsError> {
        interval.validate()?;

        let timer = QueryTimer::new("usage_append");
        let result = sqlx::query(
            r#"
            INSERT INTO usage_intervals
                (id, user_id, device_id, start_time, end_time, duration_hours, energy_consumed_wh, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(interval.id)
        .bind(interval.user_id)
        .bind(interval.device_id)
        .bind(interval.start_time)
        .bind(interval.end_time)
        .bind(interval.duration_hours)
        .bind(interval.energy_consumed_wh)
        .bind(interval.created_at)
        .execute(&self.pool)
        .await;

        timer.finish(result).map_err(storage_error("append"))?;
        Ok(())
    }

    async fn query_by_device_and_window(
        &self,
        device_id: Uuid,
        user_id: Option<Uuid>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<UsageInterval>, AnalyticsError> {
        let sql = format!(
            "{SELECT_COLUMNS} \
             WHERE device_id = $1 \
               AND ($2::uuid IS NULL OR user_id = $2) \
               AND start_time >= $3 AND end_time <= $4 \
             {ORDER_CHRONOLOGICAL}"
        );

        let timer = QueryTimer::new("usage_query_by_device_and_window");
        let result = sqlx::query_as::<_, UsageIntervalEntity>(&sql)
            .bind(device_id)
            .bind(user_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await;

        timer
            .finish(result)
            .map(into_domain)
            .map_err(storage_error("query_by_device_and_window"))
    }

    async fn query_by_device(&self, device_id: Uuid) -> Result<Vec<UsageInterval>, AnalyticsError> {
        let sql = format!("{SELECT_COLUMNS} WHERE device_id = $1 {ORDER_CHRONOLOGICAL}");

        let timer = QueryTimer::new("usage_query_by_device");
        let result = sqlx::query_as::<_, UsageIntervalEntity>(&sql)
            .bind(device_id)
            .fetch_all(&self.pool)
            .await;

        timer
            .finish(result)
            .map(into_domain)
            .map_err(storage_error("query_by_device"))
    }

    async fn query_by_owner(
        &self,
        user_id: Uuid,
        device_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<UsageInterval>, AnalyticsError> {
        let sql = format!(
            "{SELECT_COLUMNS} \
             WHERE user_id = $1 AND device_id = $2 \
               AND ($3::timestamptz IS NULL OR start_time >= $3) \
               AND ($4::timestamptz IS NULL OR end_time <= $4) \
             {ORDER_CHRONOLOGICAL}"
        );

        let timer = QueryTimer::new("usage_query_by_owner");
        let result = sqlx::query_as::<_, UsageIntervalEntity>(&sql)
            .bind(user_id)
            .bind(device_id)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await;

        timer
            .finish(result)
            .map(into_domain)
            .map_err(storage_error("query_by_owner"))
    }

    async fn delete_by_owner(&self, user_id: Uuid) -> Result<u64, AnalyticsError> {
        let timer = QueryTimer::new("usage_delete_by_owner");
        let result = sqlx::query("DELETE FROM usage_intervals WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await;

        timer
            .finish(result)
            .map(|r| r.rows_affected())
            .map_err(storage_error("delete_by_owner"))
    }

    async fn delete_by_device(&self, device_id: Uuid) -> Result<u64, AnalyticsError> {
        let timer = QueryTimer::new("usage_delete_by_device");
        let result = sqlx::query("DELETE FROM usage_intervals WHERE device_id = $1")
            .bind(device_id)
            .execute(&self.pool)
            .await;

        timer
            .finish(result)
            .map(|r| r.rows_affected())
            .map_err(storage_error("delete_by_device"))
    }

    async fn ping(&self) -> Result<(), AnalyticsError> {
        let timer = QueryTimer::new("usage_ping");
        let result = sqlx::query("SELECT 1").execute(&self.pool).await;

        timer.finish(result).map_err(storage_error("ping"))?;
        crate::metrics::record_pool_metrics(&self.pool);
        Ok(())
    }
}
