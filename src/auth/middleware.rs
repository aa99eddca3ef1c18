//! Auth middleware for Axum routes.
//!
//! Verifies the bearer credential with the identity provider, then
//! resolves-or-creates the local user and injects it into request
//! extensions for downstream handlers.

use crate::api::handlers::{ApiState, AppError};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Middleware that requires a valid identity-provider bearer token.
///
/// # Behavior
/// 1. Extract `Authorization: Bearer <token>` header → 401 if missing/malformed
/// 2. Verify the token with the identity provider → 401 on any failure,
///    with a generic message that never distinguishes the cause
/// 3. Resolve-or-create the local user (MERGE keyed by subject id)
/// 4. Inject the `User` into request extensions
pub async fn require_auth(
    State(state): State<ApiState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header format".to_string()))?;

    let claims = state.verifier.verify(token).await.map_err(|e| {
        tracing::debug!("Bearer token rejected: {}", e);
        AppError::Unauthorized("Invalid or expired token".to_string())
    })?;

    let user = state.graph.upsert_user(&claims).await?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

// ============================================================================
// Tests
// ============================================================================
