//! API handlers for emotion records
//!
//! Same contract as the thought-record endpoints minus the symptom list:
//! protected, owner-scoped, uniform not-found on failed ownership checks.

use crate::api::handlers::{ensure_emotion_exists, ApiState, AppError};
use crate::auth::CurrentUser;
use crate::neo4j::models::{
    CreateEmotionRecordRequest, EmotionCount, EmotionRecord, RecordFilter,
    UpdateEmotionRecordRequest,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

/// Response body for DELETE /emotion-records/{record_id}
#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

async fn find_owned_record(
    state: &ApiState,
    user_id: &str,
    record_id: &str,
) -> Result<Uuid, AppError> {
    let records = state
        .graph
        .get_user_emotion_records(user_id, &RecordFilter::default())
        .await?;

    records
        .iter()
        .find(|r| r.id.to_string() == record_id)
        .map(|r| r.id)
        .ok_or_else(|| AppError::NotFound("Record not found".to_string()))
}

/// POST /emotion-records — create a record owned by the caller.
pub async fn create_emotion_record(
    State(state): State<ApiState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateEmotionRecordRequest>,
) -> Result<(StatusCode, Json<EmotionRecord>), AppError> {
    ensure_emotion_exists(&state, &req.emotion).await?;

    let now = Utc::now();
    let record = EmotionRecord {
        id: Uuid::new_v4(),
        user_id: user.uid,
        timestamp: req.timestamp.unwrap_or(now),
        title: req.title,
        situation_description: req.situation_description,
        emotion: req.emotion,
        underlying_belief: req.underlying_belief,
        created_at: now,
        updated_at: now,
    };

    let stored = state.graph.create_emotion_record(&record).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /emotion-records — the caller's records, newest first.
pub async fn list_emotion_records(
    State(state): State<ApiState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<RecordFilter>,
) -> Result<Json<Vec<EmotionRecord>>, AppError> {
    let records = state
        .graph
        .get_user_emotion_records(&user.uid, &filter)
        .await?;
    Ok(Json(records))
}

/// GET /emotion-records/patterns — top 5 emotions by record count.
pub async fn emotion_patterns(
    State(state): State<ApiState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<EmotionCount>>, AppError> {
    let patterns = state.graph.get_emotion_patterns(&user.uid).await?;
    Ok(Json(patterns))
}

/// PUT /emotion-records/{record_id} — partial update of an owned record.
pub async fn update_emotion_record(
    State(state): State<ApiState>,
    CurrentUser(user): CurrentUser,
    Path(record_id): Path<String>,
    Json(updates): Json<UpdateEmotionRecordRequest>,
) -> Result<Json<EmotionRecord>, AppError> {
    let owned_id = find_owned_record(&state, &user.uid, &record_id).await?;

    if let Some(emotion) = &updates.emotion {
        ensure_emotion_exists(&state, emotion).await?;
    }

    let updated = state
        .graph
        .update_emotion_record(owned_id, &updates)
        .await?
        .ok_or_else(|| AppError::NotFound("Record not found".to_string()))?;

    Ok(Json(updated))
}

/// DELETE /emotion-records/{record_id} — delete an owned record.
pub async fn delete_emotion_record(
    State(state): State<ApiState>,
    CurrentUser(user): CurrentUser,
    Path(record_id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let owned_id = find_owned_record(&state, &user.uid, &record_id).await?;

    let deleted = state.graph.delete_emotion_record(owned_id).await?;
    if !deleted {
        return Err(AppError::NotFound("Record not found".to_string()));
    }

    Ok(Json(DeleteResponse {
        message: "Record deleted successfully".to_string(),
    }))
}

// ============================================================================
// Tests
// ============================================================================
