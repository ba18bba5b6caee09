//! Device-register service client.
//!
//! Resolves device metadata over HTTP for the maintenance endpoint. The
//! caller's Bearer token is forwarded so the registry applies its own
//! ownership checks.

use std::time::Duration;

use async_trait::async_trait;
use domain::models::DeviceInfo;
use domain::services::DeviceDirectory;
use domain::AnalyticsError;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::DeviceRegistryConfig;

/// Registry response envelope: `{ "data": { "device": { ... } } }`.
#[derive(Debug, Deserialize)]
struct RegistryEnvelope {
    data: RegistryData,
}

#[derive(Debug, Deserialize)]
struct RegistryData {
    #[serde(default)]
    device: Option<DeviceInfo>,
}

/// [`DeviceDirectory`] backed by the device-register HTTP service.
pub struct HttpDeviceDirectory {
    client: Client,
    base_url: String,
    timeout_ms: u64,
}

impl HttpDeviceDirectory {
    pub fn new(config: &DeviceRegistryConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            timeout_ms: config.timeout_ms,
        })
    }

    fn device_url(&self, device_id: Uuid) -> String {
        format!("{}/{}", self.base_url, device_id)
    }
}

fn unavailable(reason: impl Into<String>) -> AnalyticsError {
    AnalyticsError::StorageUnavailable(format!("Device registry: {}", reason.into()))
}

#[async_trait]
impl DeviceDirectory for HttpDeviceDirectory {
    async fn find_device(
        &self,
        device_id: Uuid,
        bearer_token: &str,
    ) -> Result<Option<DeviceInfo>, AnalyticsError> {
        let url = self.device_url(device_id);
        debug!(url = %url, "Fetching device from registry");

        let response = self
            .client
            .get(&url)
            .bearer_auth(bearer_token)
            .send()
            .await
            .map_err(|e| {
                warn!(device_id = %device_id, error = %e, "Device registry request failed");
                if e.is_timeout() {
                    unavailable(format!("timeout after {}ms", self.timeout_ms))
                } else {
                    unavailable("request failed")
                }
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            warn!(device_id = %device_id, status = %status, "Device registry returned error");
            return Err(unavailable(format!("HTTP {}", status)));
        }

        let envelope: RegistryEnvelope = response
            .json()
            .await
            .map_err(|e| unavailable(format!("invalid response: {}", e)))?;

        Ok(envelope.data.device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory(url: &str) -> HttpDeviceDirectory {
        HttpDeviceDirectory::new(&DeviceRegistryConfig {
            url: url.to_string(),
            timeout_ms: 1000,
        })
        .unwrap()
    }

    #[test]
    fn test_device_url_trims_trailing_slash() {
        let id = Uuid::nil();
        let directory = directory("http://registry:8080/api/v1/devices/");
        assert_eq!(
            directory.device_url(id),
            format!("http://registry:8080/api/v1/devices/{}", id)
        );
    }

    #[test]
    fn test_envelope_parses_device() {
        let json = serde_json::json!({
            "data": {
                "device": {
                    "_id": "0b9a3f0e-9c0e-4c43-a7b8-3f0c1c1d2e01",
                    "name": "Living room AC",
                    "category": "climate",
                    "watts": 1500
                }
            }
        });

        let envelope: RegistryEnvelope = serde_json::from_value(json).unwrap();
        let device = envelope.data.device.unwrap();
        assert_eq!(device.name, "Living room AC");
        assert_eq!(device.category, "climate");
        assert_eq!(device.watts, Some(1500.0));
    }

    #[test]
    fn test_envelope_without_device() {
        let envelope: RegistryEnvelope =
            serde_json::from_value(serde_json::json!({ "data": {} })).unwrap();
        assert!(envelope.data.device.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_registry_is_unavailable() {
        // Port 9 (discard) on localhost is not expected to accept connections.
        let directory = directory("http://127.0.0.1:9/devices");

        let result = directory.find_device(Uuid::new_v4(), "token").await;

        assert!(matches!(result, Err(AnalyticsError::StorageUnavailable(_))));
    }
}
