//! API handlers for the symptom catalog and its time-pattern aggregate

use crate::api::handlers::{ApiState, AppError};
use crate::auth::CurrentUser;
use crate::neo4j::models::{Symptom, SymptomTimePattern};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

/// Request body for POST /symptoms
#[derive(Debug, Deserialize)]
pub struct CreateSymptomRequest {
    pub name: String,
    pub description: Option<String>,
}

/// POST /symptoms — create-or-return by normalized name.
pub async fn add_symptom(
    State(state): State<ApiState>,
    Json(req): Json<CreateSymptomRequest>,
) -> Result<(StatusCode, Json<Symptom>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("Symptom name must not be empty".to_string()));
    }

    let symptom = state
        .graph
        .upsert_symptom(&req.name, req.description.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(symptom)))
}

/// GET /symptoms — all known symptoms.
pub async fn list_symptoms(
    State(state): State<ApiState>,
) -> Result<Json<Vec<Symptom>>, AppError> {
    let symptoms = state.graph.list_symptoms().await?;
    Ok(Json(symptoms))
}

/// GET /symptoms/symptoms-time-patterns — symptom × hour-of-day counts
/// over the caller's thought records.
pub async fn symptom_time_patterns(
    State(state): State<ApiState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<SymptomTimePattern>>, AppError> {
    let patterns = state.graph.get_symptom_time_patterns(&user.uid).await?;
    Ok(Json(patterns))
}

// ============================================================================
// Tests
// ============================================================================
