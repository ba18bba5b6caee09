//! Device registry lookup port.

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::AnalyticsError;
use crate::models::DeviceInfo;

/// Resolves device metadata (name, category, wattage) by id.
#[async_trait::async_trait]
pub trait DeviceDirectory: Send + Sync {
    /// Looks up a device on behalf of the caller holding `bearer_token`.
    ///
    /// Returns `Ok(None)` when the registry does not know the device.
    async fn find_device(
        &self,
        device_id: Uuid,
        bearer_token: &str,
    ) -> Result<Option<DeviceInfo>, AnalyticsError>;
}

/// Fixed device table, for tests and local runs without a registry.
#[derive(Debug, Clone, Default)]
pub struct StaticDeviceDirectory {
    devices: HashMap<Uuid, DeviceInfo>,
}

impl StaticDeviceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(mut self, device: DeviceInfo) -> Self {
        self.devices.insert(device.id, device);
        self
    }
}

#[async_trait::async_trait]
impl DeviceDirectory for StaticDeviceDirectory {
    async fn find_device(
        &self,
        device_id: Uuid,
        _bearer_token: &str,
    ) -> Result<Option<DeviceInfo>, AnalyticsError> {
        Ok(self.devices.get(&device_id).cloned())
    }
}
