//! API handlers for the emotion catalog

use crate::api::handlers::{ApiState, AppError};
use crate::auth::CurrentUser;
use crate::neo4j::models::{Emotion, EmotionCount};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

/// Request body for POST /emotions
#[derive(Debug, Deserialize)]
pub struct CreateEmotionRequest {
    pub name: String,
    pub description: Option<String>,
}

/// POST /emotions — insert a catalog entry (admin-style).
pub async fn add_emotion(
    State(state): State<ApiState>,
    Json(req): Json<CreateEmotionRequest>,
) -> Result<(StatusCode, Json<Emotion>), AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Emotion name must not be empty".to_string()));
    }

    let emotion = state
        .graph
        .add_emotion(name, req.description.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(emotion)))
}

/// GET /emotions — the whole catalog.
pub async fn list_emotions(
    State(state): State<ApiState>,
) -> Result<Json<Vec<Emotion>>, AppError> {
    let emotions = state.graph.list_emotions().await?;
    Ok(Json(emotions))
}

/// GET /emotions/frequency — top 5 emotions across the caller's thought
/// records.
pub async fn emotion_frequency(
    State(state): State<ApiState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<EmotionCount>>, AppError> {
    let frequency = state.graph.get_emotion_frequency(&user.uid).await?;
    Ok(Json(frequency))
}

// ============================================================================
// Tests
// ============================================================================
