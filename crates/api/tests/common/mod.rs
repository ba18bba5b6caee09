//! Common test utilities for integration tests.
//!
//! The router is built over the in-memory usage store and a static device
//! directory, so these tests need no database or device registry.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use domain::models::{DeviceInfo, MaintenanceThresholds};
use domain::services::{InMemoryUsageStore, StaticDeviceDirectory};
use shared::jwt::IdentityVerifier;
use smart_home_analytics_api::{
    app::create_app,
    config::{
        AnalyticsConfig, AuthConfig, Config, DatabaseConfig, DeviceRegistryConfig, LoggingConfig,
        SecurityConfig, ServerConfig,
    },
};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Test configuration; the database section is never used.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 30,
        },
        database: DatabaseConfig {
            url: "postgres://unused@localhost/unused".to_string(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_secs: 1,
            idle_timeout_secs: 60,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig::default(),
        auth: AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            leeway_secs: 0,
        },
        device_registry: DeviceRegistryConfig {
            url: String::new(),
            timeout_ms: 1000,
        },
        analytics: AnalyticsConfig::default(),
        maintenance: MaintenanceThresholds::default(),
    }
}

/// Application under test plus handles to its adapters.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryUsageStore>,
}

pub fn create_test_app(devices: Vec<DeviceInfo>) -> TestApp {
    create_test_app_with_config(test_config(), devices)
}

pub fn create_test_app_with_config(config: Config, devices: Vec<DeviceInfo>) -> TestApp {
    let store = Arc::new(InMemoryUsageStore::new());
    let directory = devices
        .into_iter()
        .fold(StaticDeviceDirectory::new(), |dir, device| dir.with_device(device));

    let router = tokio_test::assert_ok!(create_app(config, store.clone(), Arc::new(directory)));

    TestApp { router, store }
}

/// Issues a valid identity token for `user_id`.
pub fn token_for(user_id: Uuid) -> String {
    IdentityVerifier::new(TEST_JWT_SECRET)
        .unwrap()
        .issue_token(user_id, 3600)
        .unwrap()
}

/// Build a JSON request with authentication.
pub fn json_request_with_auth(
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a GET request with authentication.
pub fn get_request_with_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Build a DELETE request with authentication.
pub fn delete_request_with_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Helper to parse JSON response body.
pub async fn parse_response_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}

/// Body for `POST /api/v1/analytics/usage`.
pub fn usage_body(
    user_id: Uuid,
    device_id: Uuid,
    watts: f64,
    start_time: &str,
    end_time: &str,
) -> serde_json::Value {
    serde_json::json!({
        "userId": user_id,
        "deviceId": device_id,
        "watts": watts,
        "startTime": start_time,
        "endTime": end_time
    })
}
