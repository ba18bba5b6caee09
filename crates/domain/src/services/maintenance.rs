//! Maintenance prediction from cumulative device usage.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::error::AnalyticsError;
use crate::models::{
    DeviceCategory, MaintenanceHeadroom, MaintenanceThreshold, MaintenanceThresholds,
    MaintenanceVerdict, UsageInterval, IMMEDIATE_MAINTENANCE,
};
use crate::services::store::{chronological, UsageRecordStore};

const HOURS_RECOMMENDATION: &str = "Check and service components frequently used during operation.";
const ENERGY_RECOMMENDATION: &str = "Inspect power supply and energy-intensive components.";
const NO_MAINTENANCE_RECOMMENDATION: &str =
    "No immediate maintenance required. Continue regular checks.";

/// Compares a device's full usage history against its category thresholds.
#[derive(Clone)]
pub struct MaintenancePredictor {
    store: Arc<dyn UsageRecordStore>,
    thresholds: MaintenanceThresholds,
}

impl MaintenancePredictor {
    pub fn new(store: Arc<dyn UsageRecordStore>, thresholds: MaintenanceThresholds) -> Self {
        Self { store, thresholds }
    }

    /// Evaluates a device of the named category over its whole history.
    pub async fn evaluate(
        &self,
        device_id: Uuid,
        category: &str,
    ) -> Result<MaintenanceVerdict, AnalyticsError> {
        let (category, threshold) = self.thresholds.lookup(category)?;
        let history = self.store.query_by_device(device_id).await?;

        let verdict = assess(device_id, category, threshold, &history);

        debug!(
            device_id = %device_id,
            category = %category,
            total_hours = verdict.total_hours,
            total_energy = verdict.total_energy,
            maintenance_needed = verdict.maintenance_needed,
            "Evaluated maintenance"
        );

        Ok(verdict)
    }
}

/// Pure verdict over a set of intervals. Both checks are independent.
pub fn assess(
    device_id: Uuid,
    category: DeviceCategory,
    threshold: MaintenanceThreshold,
    intervals: &[UsageInterval],
) -> MaintenanceVerdict {
    let mut ordered: Vec<&UsageInterval> = intervals.iter().collect();
    ordered.sort_by(|a, b| chronological(a, b));

    let total_hours: f64 = ordered.iter().map(|i| i.duration_hours).sum();
    let total_energy: f64 = ordered.iter().map(|i| i.energy_consumed_wh).sum();

    verdict_for_totals(device_id, category, threshold, total_hours, total_energy)
}

/// Verdict for already-accumulated totals.
pub fn verdict_for_totals(
    device_id: Uuid,
    category: DeviceCategory,
    threshold: MaintenanceThreshold,
    total_hours: f64,
    total_energy: f64,
) -> MaintenanceVerdict {
    let mut reasons = Vec::new();
    let mut recommendations = Vec::new();

    if total_hours >= threshold.hours {
        reasons.push(format!(
            "Exceeded recommended operational hours: {} hrs",
            total_hours
        ));
        recommendations.push(HOURS_RECOMMENDATION.to_string());
    }

    if total_energy >= threshold.energy {
        reasons.push(format!(
            "Exceeded recommended energy consumption: {} watt-hours",
            total_energy
        ));
        recommendations.push(ENERGY_RECOMMENDATION.to_string());
    }

    let maintenance_needed = !reasons.is_empty();

    let (next_maintenance_in, headroom) = if maintenance_needed {
        (IMMEDIATE_MAINTENANCE.to_string(), None)
    } else {
        recommendations.push(NO_MAINTENANCE_RECOMMENDATION.to_string());
        let headroom = MaintenanceHeadroom {
            hours: threshold.hours - total_hours,
            energy: threshold.energy - total_energy,
        };
        (
            format!(
                "{} hours or {} watt-hours",
                headroom.hours, headroom.energy
            ),
            Some(headroom),
        )
    };

    MaintenanceVerdict {
        device_id,
        category,
        total_hours,
        total_energy,
        maintenance_needed,
        reasons,
        recommendations,
        next_maintenance_in,
        headroom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PowerTransition;
    use crate::services::store::InMemoryUsageStore;
    use chrono::{Duration, TimeZone, Utc};

    fn climate() -> MaintenanceThreshold {
        MaintenanceThresholds::default().get(DeviceCategory::Climate)
    }

    fn lighting() -> MaintenanceThreshold {
        MaintenanceThresholds::default().get(DeviceCategory::Lighting)
    }

    #[test]
    fn test_hours_exceeded_only() {
        let verdict =
            verdict_for_totals(Uuid::nil(), DeviceCategory::Climate, climate(), 1200.0, 40_000.0);

        assert!(verdict.maintenance_needed);
        assert_eq!(
            verdict.reasons,
            vec!["Exceeded recommended operational hours: 1200 hrs".to_string()]
        );
        assert_eq!(verdict.recommendations, vec![HOURS_RECOMMENDATION.to_string()]);
        assert_eq!(verdict.next_maintenance_in, "Immediate maintenance required");
        assert!(verdict.headroom.is_none());
    }

    #[test]
    fn test_energy_exceeded_only() {
        let verdict =
            verdict_for_totals(Uuid::nil(), DeviceCategory::Climate, climate(), 10.0, 50_000.0);

        assert!(verdict.maintenance_needed);
        assert_eq!(verdict.reasons.len(), 1);
        assert_eq!(verdict.recommendations, vec![ENERGY_RECOMMENDATION.to_string()]);
    }

    #[test]
    fn test_both_thresholds_fire() {
        let verdict =
            verdict_for_totals(Uuid::nil(), DeviceCategory::Lighting, lighting(), 200.0, 5_000.0);

        assert!(verdict.maintenance_needed);
        assert_eq!(verdict.reasons.len(), 2);
        assert_eq!(
            verdict.recommendations,
            vec![
                HOURS_RECOMMENDATION.to_string(),
                ENERGY_RECOMMENDATION.to_string()
            ]
        );
    }

    #[test]
    fn test_headroom_reports_both_values() {
        let verdict =
            verdict_for_totals(Uuid::nil(), DeviceCategory::Lighting, lighting(), 100.0, 1_000.0);

        assert!(!verdict.maintenance_needed);
        assert!(verdict.reasons.is_empty());
        assert_eq!(
            verdict.recommendations,
            vec![NO_MAINTENANCE_RECOMMENDATION.to_string()]
        );
        assert_eq!(verdict.next_maintenance_in, "100 hours or 4000 watt-hours");
        assert_eq!(
            verdict.headroom,
            Some(MaintenanceHeadroom {
                hours: 100.0,
                energy: 4000.0
            })
        );
    }

    #[tokio::test]
    async fn test_evaluate_uses_full_history() {
        let store = Arc::new(InMemoryUsageStore::new());
        let device = Uuid::new_v4();
        let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();

        // 3 × 100 h at 20 W spread over different months
        for month in 0..3 {
            let s = start + Duration::days(31 * month);
            store
                .append(
                    UsageInterval::from_transition(&PowerTransition {
                        user_id: Uuid::new_v4(),
                        device_id: device,
                        watts: 20.0,
                        start_time: s,
                        end_time: s + Duration::hours(100),
                    })
                    .unwrap(),
                )
                .await
                .unwrap();
        }

        let predictor = MaintenancePredictor::new(store, MaintenanceThresholds::default());
        let verdict = predictor.evaluate(device, "lighting").await.unwrap();

        assert_eq!(verdict.total_hours, 300.0);
        assert_eq!(verdict.total_energy, 6000.0);
        assert_eq!(verdict.reasons.len(), 2);
        assert_eq!(verdict.category, DeviceCategory::Lighting);
    }

    #[tokio::test]
    async fn test_evaluate_without_history() {
        let predictor = MaintenancePredictor::new(
            Arc::new(InMemoryUsageStore::new()),
            MaintenanceThresholds::default(),
        );

        let verdict = predictor.evaluate(Uuid::new_v4(), "kitchen").await.unwrap();

        assert!(!verdict.maintenance_needed);
        assert_eq!(verdict.next_maintenance_in, "300 hours or 10000 watt-hours");
    }

    #[tokio::test]
    async fn test_evaluate_unknown_category() {
        let predictor = MaintenancePredictor::new(
            Arc::new(InMemoryUsageStore::new()),
            MaintenanceThresholds::default(),
        );

        let result = predictor.evaluate(Uuid::new_v4(), "garden").await;

        assert_eq!(
            result,
            Err(AnalyticsError::UnknownCategory("garden".to_string()))
        );
    }
}
