//! Shared server state, error type, and the health handler

use crate::auth::TokenVerifier;
use crate::neo4j::GraphStore;
use crate::Config;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;

/// Shared server state
pub struct ServerState {
    /// Graph store handle, constructed once at startup.
    pub graph: Arc<dyn GraphStore>,
    /// Identity-provider token verifier.
    pub verifier: Arc<dyn TokenVerifier>,
    pub config: Arc<Config>,
}

/// Shared server state handle
pub type ApiState = Arc<ServerState>;

// ============================================================================
// Health check
// ============================================================================

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub graph: String,
}

/// Health check handler — verifies actual connectivity to the graph store.
///
/// Returns 200 + `"ok"` when connected, 503 + `"unhealthy"` otherwise.
pub async fn health(State(state): State<ApiState>) -> (StatusCode, Json<HealthResponse>) {
    let graph_ok = state.graph.health_check().await.unwrap_or(false);

    let (http_status, status) = if graph_ok {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        http_status,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            graph: if graph_ok {
                "connected".to_string()
            } else {
                "disconnected".to_string()
            },
        }),
    )
}

// ============================================================================
// Shared validation
// ============================================================================

/// Reject record payloads referencing an emotion name absent from the
/// catalog.
pub(crate) async fn ensure_emotion_exists(state: &ApiState, name: &str) -> Result<(), AppError> {
    if state.graph.get_emotion_by_name(name).await?.is_none() {
        return Err(AppError::BadRequest(format!("Unknown emotion: {}", name)));
    }
    Ok(())
}

// ============================================================================
// Error handling
// ============================================================================

/// Error type returned by every handler, translated into an HTTP response
/// at the boundary. Infrastructure failures are logged here and surfaced
/// with a generic body.
#[derive(Debug)]
pub enum AppError {
    Internal(anyhow::Error),
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

// ============================================================================
// Tests
// ============================================================================
