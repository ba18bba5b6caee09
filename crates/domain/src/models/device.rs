//! Device metadata consumed from the device registry.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registry view of a device, as needed by the analytics pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    #[serde(alias = "_id")]
    pub id: Uuid,
    pub name: String,
    /// Owning user, when the registry reports one.
    #[serde(default)]
    pub user_id: Option<Uuid>,
    /// Category name, e.g. `climate`.
    pub category: String,
    /// Rated power draw in watts, when registered.
    #[serde(default)]
    pub watts: Option<f64>,
}
