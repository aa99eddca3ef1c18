//! API handlers for thought records
//!
//! All endpoints run behind `require_auth`. Mutation and deletion check
//! ownership by fetching the caller's records and confirming membership
//! before acting; a failed check is a uniform not-found so existence is
//! never confirmed to non-owners.

use crate::api::handlers::{ensure_emotion_exists, ApiState, AppError};
use crate::auth::CurrentUser;
use crate::neo4j::models::{
    CreateThoughtRecordRequest, EmotionCount, InsightsSummary, RecordFilter, ThoughtRecord,
    UpdateThoughtRecordRequest,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

/// Response body for DELETE /thought-records/{record_id}
#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Resolve a path id to one of the caller's own records.
///
/// Ids that don't parse, don't exist, or belong to another user all
/// resolve to the same not-found error.
async fn find_owned_record(
    state: &ApiState,
    user_id: &str,
    record_id: &str,
) -> Result<Uuid, AppError> {
    let records = state
        .graph
        .get_user_thought_records(user_id, &RecordFilter::default())
        .await?;

    records
        .iter()
        .find(|r| r.id.to_string() == record_id)
        .map(|r| r.id)
        .ok_or_else(|| AppError::NotFound("Record not found".to_string()))
}

/// POST /thought-records — create a record owned by the caller.
///
/// `user_id` always comes from the verified token; any value in the
/// request body is ignored by construction.
pub async fn create_thought_record(
    State(state): State<ApiState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateThoughtRecordRequest>,
) -> Result<(StatusCode, Json<ThoughtRecord>), AppError> {
    ensure_emotion_exists(&state, &req.emotion).await?;

    let now = Utc::now();
    let record = ThoughtRecord {
        id: Uuid::new_v4(),
        user_id: user.uid,
        timestamp: req.timestamp.unwrap_or(now),
        title: req.title,
        situation_description: req.situation_description,
        emotion: req.emotion,
        underlying_belief: req.underlying_belief,
        symptoms: req.symptoms,
        created_at: now,
        updated_at: now,
    };

    let stored = state.graph.create_thought_record(&record).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /thought-records — the caller's records, newest first.
///
/// Accepts `start_date`, `end_date`, `emotion`, and `symptom` query
/// parameters; an empty result is an empty list, not an error.
pub async fn list_thought_records(
    State(state): State<ApiState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<RecordFilter>,
) -> Result<Json<Vec<ThoughtRecord>>, AppError> {
    let records = state
        .graph
        .get_user_thought_records(&user.uid, &filter)
        .await?;
    Ok(Json(records))
}

/// GET /thought-records/patterns — top 5 emotions by record count.
pub async fn thought_patterns(
    State(state): State<ApiState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<EmotionCount>>, AppError> {
    let patterns = state.graph.get_thought_patterns(&user.uid).await?;
    Ok(Json(patterns))
}

/// GET /thought-records/insights-summary — record count, top emotions,
/// and keywords extracted from situation descriptions.
pub async fn insights_summary(
    State(state): State<ApiState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<InsightsSummary>, AppError> {
    let summary = state.graph.get_insights_summary(&user.uid).await?;
    Ok(Json(summary))
}

/// PUT /thought-records/{record_id} — partial update of an owned record.
pub async fn update_thought_record(
    State(state): State<ApiState>,
    CurrentUser(user): CurrentUser,
    Path(record_id): Path<String>,
    Json(updates): Json<UpdateThoughtRecordRequest>,
) -> Result<Json<ThoughtRecord>, AppError> {
    let owned_id = find_owned_record(&state, &user.uid, &record_id).await?;

    if let Some(emotion) = &updates.emotion {
        ensure_emotion_exists(&state, emotion).await?;
    }

    let updated = state
        .graph
        .update_thought_record(owned_id, &updates)
        .await?
        .ok_or_else(|| AppError::NotFound("Record not found".to_string()))?;

    Ok(Json(updated))
}

/// DELETE /thought-records/{record_id} — delete an owned record.
pub async fn delete_thought_record(
    State(state): State<ApiState>,
    CurrentUser(user): CurrentUser,
    Path(record_id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let owned_id = find_owned_record(&state, &user.uid, &record_id).await?;

    let deleted = state.graph.delete_thought_record(owned_id).await?;
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
