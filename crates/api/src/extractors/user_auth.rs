//! Identity token extractor.
//!
//! Resolves the caller's opaque user id from the Bearer token issued by the
//! user service.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated caller.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// User ID from the token subject claim.
    pub user_id: Uuid,
    /// Raw Bearer token, forwarded to the device registry.
    pub token: String,
}

/// Returns the token of a `Bearer <token>` header value.
pub(crate) fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = bearer_token(auth_header).ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        let user_id = state.verifier.resolve_user_id(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected identity token");
            ApiError::Unauthorized("Invalid or expired token".to_string())
        })?;

        Ok(UserAuth {
            user_id,
            token: token.to_string(),
        })
    }
}
