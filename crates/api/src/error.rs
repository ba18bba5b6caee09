use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::AnalyticsError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service_unavailable",
                    msg.clone(),
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<AnalyticsError> for ApiError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::Validation(msg)
            | AnalyticsError::InvalidInterval(msg)
            | AnalyticsError::InvalidRange(msg) => ApiError::Validation(msg),
            e @ AnalyticsError::UnknownCategory(_) => ApiError::Validation(e.to_string()),
            AnalyticsError::NotFound(msg) => ApiError::NotFound(msg),
            AnalyticsError::StorageUnavailable(msg) => ApiError::ServiceUnavailable(msg),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect();

        let message = if messages.len() == 1 {
            messages[0].clone()
        } else {
            format!("{} validation errors", messages.len())
        };

        ApiError::Validation(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_api_error_status_codes() {
        let cases = [
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ApiError::ServiceUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_analytics_error_mapping() {
        assert!(matches!(
            ApiError::from(AnalyticsError::InvalidRange("bad".into())),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            ApiError::from(AnalyticsError::InvalidInterval("bad".into())),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            ApiError::from(AnalyticsError::NotFound("gone".into())),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(AnalyticsError::StorageUnavailable("down".into())),
            ApiError::ServiceUnavailable(_)
        ));
    }

    #[test]
    fn test_unknown_category_keeps_category_name() {
        match ApiError::from(AnalyticsError::UnknownCategory("garden".into())) {
            ApiError::Validation(msg) => {
                assert_eq!(msg, "No maintenance thresholds defined for category: garden")
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[derive(Validate)]
    struct Reading {
        #[validate(custom(function = "shared::validation::validate_wattage"))]
        watts: f64,
    }

    #[test]
    fn test_from_validation_errors_uses_field_message() {
        let errors = Reading { watts: -1.0 }.validate().unwrap_err();

        match ApiError::from(errors) {
            ApiError::Validation(msg) => assert_eq!(msg, "Wattage must be a non-negative number"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            ApiError::Forbidden("test".into()).to_string(),
            "Forbidden: test"
        );
        assert_eq!(
            ApiError::ServiceUnavailable("test".into()).to_string(),
            "Service unavailable: test"
        );
    }
}
