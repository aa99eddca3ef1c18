//! CurrentUser extractor for Axum handlers.
//!
//! Reads the resolved user from request extensions (populated by the
//! `require_auth` middleware).

use crate::api::handlers::{ApiState, AppError};
use crate::neo4j::models::User;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// The authenticated, locally provisioned user.
///
/// Use as a handler parameter on routes behind `require_auth`:
///
/// ```rust,ignore
/// async fn my_handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<ApiState> for CurrentUser {
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &ApiState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async {
            let user = parts.extensions.get::<User>().cloned().ok_or_else(|| {
                AppError::Unauthorized("Authentication required — no user in request".to_string())
            })?;

            Ok(CurrentUser(user))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
