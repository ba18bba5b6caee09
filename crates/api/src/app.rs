use axum::{
    middleware,
    routing::get,
    Router,
};
use domain::services::{
    DeviceDirectory, MaintenancePredictor, ReportAggregator, UsageRecordStore, UsageRecorder,
};
use shared::jwt::IdentityVerifier;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{analytics, health};

/// Error building the application from its configuration.
#[derive(Debug, thiserror::Error)]
pub enum AppBuildError {
    #[error("Invalid identity token secret: {0}")]
    Verifier(#[from] shared::jwt::JwtError),

    #[error("Invalid analytics UTC offset: {0}")]
    Offset(String),
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn UsageRecordStore>,
    pub directory: Arc<dyn DeviceDirectory>,
    pub verifier: IdentityVerifier,
    pub recorder: UsageRecorder,
    pub aggregator: ReportAggregator,
    pub predictor: MaintenancePredictor,
}

impl AppState {
    /// Wires the analytics components over the given store and device directory.
    pub fn new(
        config: Config,
        store: Arc<dyn UsageRecordStore>,
        directory: Arc<dyn DeviceDirectory>,
    ) -> Result<Self, AppBuildError> {
        let verifier =
            IdentityVerifier::with_leeway(&config.auth.jwt_secret, config.auth.leeway_secs)?;
        let offset = shared::validation::fixed_offset(config.analytics.utc_offset_minutes)
            .map_err(|e| AppBuildError::Offset(e.to_string()))?;

        Ok(Self {
            recorder: UsageRecorder::new(store.clone()),
            aggregator: ReportAggregator::new(store.clone(), offset),
            predictor: MaintenancePredictor::new(store.clone(), config.maintenance),
            config: Arc::new(config),
            store,
            directory,
            verifier,
        })
    }
}

pub fn create_app(
    config: Config,
    store: Arc<dyn UsageRecordStore>,
    directory: Arc<dyn DeviceDirectory>,
) -> Result<Router, AppBuildError> {
    let state = AppState::new(config, store, directory)?;
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Ok(Router::new()
        .merge(public_routes)
        // Analytics routes authenticate through the UserAuth extractor.
        .nest("/api/v1/analytics", analytics::router())
        // Bottom layers run first
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state))
}
