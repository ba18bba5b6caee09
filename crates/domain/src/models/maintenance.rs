//! Maintenance domain models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AnalyticsError;

/// Device categories with maintenance thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceCategory {
    /// Air conditioners, heaters
    Climate,
    Lighting,
    Entertainment,
    /// Kitchen appliances
    Kitchen,
}

impl DeviceCategory {
    pub const ALL: [DeviceCategory; 4] = [
        DeviceCategory::Climate,
        DeviceCategory::Lighting,
        DeviceCategory::Entertainment,
        DeviceCategory::Kitchen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceCategory::Climate => "climate",
            DeviceCategory::Lighting => "lighting",
            DeviceCategory::Entertainment => "entertainment",
            DeviceCategory::Kitchen => "kitchen",
        }
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceCategory {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "climate" => Ok(DeviceCategory::Climate),
            "lighting" => Ok(DeviceCategory::Lighting),
            "entertainment" => Ok(DeviceCategory::Entertainment),
            "kitchen" => Ok(DeviceCategory::Kitchen),
            other => Err(AnalyticsError::UnknownCategory(other.to_string())),
        }
    }
}

/// Cumulative ceilings for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceThreshold {
    /// Operating hours
    pub hours: f64,
    /// Watt-hours
    pub energy: f64,
}

impl MaintenanceThreshold {
    pub const fn new(hours: f64, energy: f64) -> Self {
        Self { hours, energy }
    }
}

/// Threshold table for every category, loaded once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceThresholds {
    #[serde(default = "default_climate")]
    pub climate: MaintenanceThreshold,
    #[serde(default = "default_lighting")]
    pub lighting: MaintenanceThreshold,
    #[serde(default = "default_entertainment")]
    pub entertainment: MaintenanceThreshold,
    #[serde(default = "default_kitchen")]
    pub kitchen: MaintenanceThreshold,
}

fn default_climate() -> MaintenanceThreshold {
    MaintenanceThreshold::new(1000.0, 50_000.0)
}
fn default_lighting() -> MaintenanceThreshold {
    MaintenanceThreshold::new(200.0, 5_000.0)
}
fn default_entertainment() -> MaintenanceThreshold {
    MaintenanceThreshold::new(800.0, 30_000.0)
}
fn default_kitchen() -> MaintenanceThreshold {
    MaintenanceThreshold::new(300.0, 10_000.0)
}

impl Default for MaintenanceThresholds {
    fn default() -> Self {
        Self {
            climate: default_climate(),
            lighting: default_lighting(),
            entertainment: default_entertainment(),
            kitchen: default_kitchen(),
        }
    }
}

impl MaintenanceThresholds {
    pub fn get(&self, category: DeviceCategory) -> MaintenanceThreshold {
        match category {
            DeviceCategory::Climate => self.climate,
            DeviceCategory::Lighting => self.lighting,
            DeviceCategory::Entertainment => self.entertainment,
            DeviceCategory::Kitchen => self.kitchen,
        }
    }

    /// Looks up thresholds by category name.
    pub fn lookup(&self, category: &str) -> Result<(DeviceCategory, MaintenanceThreshold), AnalyticsError> {
        let category: DeviceCategory = category.parse()?;
        Ok((category, self.get(category)))
    }

    /// Returns the first category whose thresholds are not strictly positive.
    pub fn first_invalid(&self) -> Option<DeviceCategory> {
        DeviceCategory::ALL.into_iter().find(|category| {
            let threshold = self.get(*category);
            !(threshold.hours.is_finite()
                && threshold.hours > 0.0
                && threshold.energy.is_finite()
                && threshold.energy > 0.0)
        })
    }
}

/// Remaining usage before maintenance is due.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaintenanceHeadroom {
    pub hours: f64,
    pub energy: f64,
}

/// Text reported when a threshold has been crossed.
pub const IMMEDIATE_MAINTENANCE: &str = "Immediate maintenance required";

/// Maintenance assessment for one device.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceVerdict {
    pub device_id: Uuid,
    pub category: DeviceCategory,
    pub total_hours: f64,
    pub total_energy: f64,
    pub maintenance_needed: bool,
    pub reasons: Vec<String>,
    pub recommendations: Vec<String>,
    /// Either [`IMMEDIATE_MAINTENANCE`] or both remaining headrooms as text.
    pub next_maintenance_in: String,
    /// Structured headroom, present only when no maintenance is needed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headroom: Option<MaintenanceHeadroom>,
}

/// Response body for the maintenance endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceResponse {
    /// Device display name from the registry.
    pub device: String,
    #[serde(flatten)]
    pub verdict: MaintenanceVerdict,
}
