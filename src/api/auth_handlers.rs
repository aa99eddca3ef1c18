//! Authentication route handlers
//!
//! Endpoints:
//! - `GET /auth/me`           — Returns the resolved local user (protected)
//! - `GET /auth/verify-token` — Verifies an ID token and echoes its claims

use crate::api::handlers::{ApiState, AppError};
use crate::auth::{CurrentUser, TokenClaims};
use crate::neo4j::models::User;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

/// Query parameters for GET /auth/verify-token
#[derive(Debug, Deserialize)]
pub struct VerifyTokenQuery {
    pub id_token: String,
}

/// GET /auth/me — the authenticated caller's local user record.
///
/// The `require_auth` middleware has already verified the token and
/// created the user on first contact, so this is a pure echo.
pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

/// GET /auth/verify-token — verify an ID token without provisioning.
///
/// Failure is a generic 401; the cause is never distinguished.
pub async fn verify_token(
    State(state): State<ApiState>,
    Query(query): Query<VerifyTokenQuery>,
) -> Result<Json<TokenClaims>, AppError> {
    let claims = state.verifier.verify(&query.id_token).await.map_err(|e| {
        tracing::debug!("verify-token rejected: {}", e);
        AppError::Unauthorized("Invalid authentication credentials".to_string())
    })?;

    Ok(Json(claims))
}

// ============================================================================
// Tests
// ============================================================================
