//! Usage interval entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the usage_intervals table.
#[derive(Debug, Clone, FromRow)]
pub struct UsageIntervalEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub device_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_hours: f64,
    pub energy_consumed_wh: f64,
    pub created_at: DateTime<Utc>,
}

impl From<UsageIntervalEntity> for domain::models::UsageInterval {
    fn from(entity: UsageIntervalEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            device_id: entity.device_id,
            start_time: entity.start_time,
            end_time: entity.end_time,
            duration_hours: entity.duration_hours,
            energy_consumed_wh: entity.energy_consumed_wh,
            created_at: entity.created_at,
        }
    }
}
