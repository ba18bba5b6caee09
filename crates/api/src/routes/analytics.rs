//! Usage analytics endpoints.
//!
//! Every handler authenticates the caller through [`UserAuth`].

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::{
    record_maintenance_evaluation, record_report_built, record_usage_recorded,
};
use domain::models::{
    DateRangeQuery, DeleteUsageResponse, FootprintResponse, MaintenanceResponse,
    RecordUsageRequest, RecordUsageResponse, ReportResponse, UsageListEntry, UsageListQuery,
    UsageListResponse,
};
use domain::services::UsageSink;

/// Routes mounted under `/api/v1/analytics`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/usage", post(record_usage))
        .route("/usage/:device_id", get(list_usage))
        .route("/report/:device_id", get(get_report))
        .route("/env-footprint/:device_id", get(get_env_footprint))
        .route("/maintenance/:device_id", get(get_maintenance))
        .route("/users/:user_id/usage", delete(delete_user_usage))
        .route("/devices/:device_id/usage", delete(delete_device_usage))
}

/// Parses the required `startDate`/`endDate` pair.
fn parse_date_range(query: &DateRangeQuery) -> Result<(NaiveDate, NaiveDate), ApiError> {
    let (Some(start), Some(end)) = (query.start_date.as_deref(), query.end_date.as_deref()) else {
        return Err(ApiError::Validation(
            "startDate and endDate are required".to_string(),
        ));
    };

    let parse = |name: &str, value: &str| {
        shared::validation::parse_calendar_date(value)
            .map_err(|_| ApiError::Validation(format!("Invalid {}: {}", name, value)))
    };

    Ok((parse("startDate", start)?, parse("endDate", end)?))
}

/// Record a completed on→off episode.
///
/// POST /api/v1/analytics/usage
pub async fn record_usage(
    State(state): State<AppState>,
    _auth: UserAuth,
    Json(request): Json<RecordUsageRequest>,
) -> Result<(StatusCode, Json<RecordUsageResponse>), ApiError> {
    request.validate()?;

    let interval = state.recorder.record_transition(request.into()).await?;
    record_usage_recorded();

    Ok((
        StatusCode::CREATED,
        Json(RecordUsageResponse {
            id: interval.id,
            duration_hours: interval.duration_hours,
            energy_consumed_wh: interval.energy_consumed_wh,
        }),
    ))
}

/// Usage report for the caller's intervals on a device.
///
/// GET /api/v1/analytics/report/:device_id?startDate=YYYY-MM-DD&endDate=YYYY-MM-DD
pub async fn get_report(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(device_id): Path<Uuid>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<ReportResponse>, ApiError> {
    let (start, end) = parse_date_range(&query)?;

    let outcome = state
        .aggregator
        .build_report(device_id, Some(auth.user_id), start, end)
        .await?;

    record_report_built(if outcome.is_no_data() { "no_data" } else { "ok" });

    Ok(Json(outcome.into()))
}

/// Carbon footprint of a device over a date range, across all owners.
///
/// GET /api/v1/analytics/env-footprint/:device_id?startDate&endDate
pub async fn get_env_footprint(
    State(state): State<AppState>,
    _auth: UserAuth,
    Path(device_id): Path<Uuid>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<FootprintResponse>, ApiError> {
    let (start, end) = parse_date_range(&query)?;

    let footprint = state
        .aggregator
        .env_footprint(device_id, None, start, end)
        .await?;

    Ok(Json(footprint.into()))
}

/// Maintenance verdict for a registered device.
///
/// GET /api/v1/analytics/maintenance/:device_id
pub async fn get_maintenance(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(device_id): Path<Uuid>,
) -> Result<Json<MaintenanceResponse>, ApiError> {
    let device = state
        .directory
        .find_device(device_id, &auth.token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Device not found".to_string()))?;

    let verdict = state.predictor.evaluate(device_id, &device.category).await?;
    record_maintenance_evaluation(verdict.maintenance_needed);

    Ok(Json(MaintenanceResponse {
        device: device.name,
        verdict,
    }))
}

/// The caller's raw intervals for a device.
///
/// GET /api/v1/analytics/usage/:device_id?startTime&endTime
pub async fn list_usage(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(device_id): Path<Uuid>,
    Query(query): Query<UsageListQuery>,
) -> Result<Json<UsageListResponse>, ApiError> {
    if let (Some(from), Some(to)) = (query.start_time, query.end_time) {
        if from > to {
            return Err(ApiError::Validation(
                "startTime must not be after endTime".to_string(),
            ));
        }
    }

    let intervals = state
        .store
        .query_by_owner(auth.user_id, device_id, query.start_time, query.end_time)
        .await?;

    if intervals.is_empty() {
        return Err(ApiError::NotFound(
            "No usage data found for this device".to_string(),
        ));
    }

    Ok(Json(UsageListResponse {
        usage: intervals.into_iter().map(UsageListEntry::from).collect(),
    }))
}

/// Purge every interval of a user. Callers may only purge themselves.
///
/// DELETE /api/v1/analytics/users/:user_id/usage
pub async fn delete_user_usage(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(user_id): Path<Uuid>,
) -> Result<Json<DeleteUsageResponse>, ApiError> {
    if user_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "Cannot delete another user's usage data".to_string(),
        ));
    }

    let deleted = state.store.delete_by_owner(user_id).await?;
    info!(user_id = %user_id, deleted, "Deleted user usage intervals");

    Ok(Json(DeleteUsageResponse { deleted }))
}

/// Purge every interval of a device. The device must resolve in the registry
/// for the caller, and its owner (when reported) must be the caller.
///
/// DELETE /api/v1/analytics/devices/:device_id/usage
pub async fn delete_device_usage(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(device_id): Path<Uuid>,
) -> Result<Json<DeleteUsageResponse>, ApiError> {
    let device = state
        .directory
        .find_device(device_id, &auth.token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Device not found".to_string()))?;

    if device.user_id.is_some_and(|owner| owner != auth.user_id) {
        return Err(ApiError::Forbidden(
            "Cannot delete usage data of another user's device".to_string(),
        ));
    }

    let deleted = state.store.delete_by_device(device_id).await?;
    info!(device_id = %device_id, deleted, "Deleted device usage intervals");

    Ok(Json(DeleteUsageResponse { deleted }))
}
