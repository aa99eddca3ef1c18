//! GraphStore trait definition
//!
//! Abstract interface for all graph database operations. Mirrors the
//! public async methods of `Neo4jClient`, enabling testing with the
//! in-memory mock implementation.

use crate::auth::TokenClaims;
use crate::neo4j::models::*;
use anyhow::Result;
use uuid::Uuid;

/// Abstract interface for all graph database operations.
#[async_trait::async_trait]
pub trait GraphStore: Send + Sync {
    // ========================================================================
    // Health
    // ========================================================================

    /// True when a trivial query round-trips to the store.
    async fn health_check(&self) -> Result<bool>;

    // ========================================================================
    // User operations
    // ========================================================================

    /// Get a user by the identity provider's subject id.
    async fn get_user_by_uid(&self, uid: &str) -> Result<Option<User>>;

    /// Create-or-return a user from verified token claims.
    ///
    /// A single MERGE keyed on `uid` so concurrent first requests from the
    /// same identity cannot create duplicates.
    async fn upsert_user(&self, claims: &TokenClaims) -> Result<User>;

    // ========================================================================
    // Emotion catalog
    // ========================================================================

    /// Insert a new emotion catalog entry.
    async fn add_emotion(&self, name: &str, description: Option<&str>) -> Result<Emotion>;

    /// Look up an emotion by exact name (record validation).
    async fn get_emotion_by_name(&self, name: &str) -> Result<Option<Emotion>>;

    /// List the whole emotion catalog.
    async fn list_emotions(&self) -> Result<Vec<Emotion>>;

    /// Top 5 emotions across the user's thought records, by descending count.
    async fn get_emotion_frequency(&self, user_id: &str) -> Result<Vec<EmotionCount>>;

    // ========================================================================
    // Symptom catalog
    // ========================================================================

    /// Create-or-return a symptom keyed by its normalized name.
    async fn upsert_symptom(&self, name: &str, description: Option<&str>) -> Result<Symptom>;

    /// List all known symptoms.
    async fn list_symptoms(&self) -> Result<Vec<Symptom>>;

    /// Symptom × hour-of-day correlation over the user's thought records.
    async fn get_symptom_time_patterns(&self, user_id: &str)
        -> Result<Vec<SymptomTimePattern>>;

    // ========================================================================
    // Thought records
    // ========================================================================

    /// Store a thought record and link it to its owner.
    async fn create_thought_record(&self, record: &ThoughtRecord) -> Result<ThoughtRecord>;

    /// List the user's thought records, newest first, with optional filters.
    async fn get_user_thought_records(
        &self,
        user_id: &str,
        filter: &RecordFilter,
    ) -> Result<Vec<ThoughtRecord>>;

    /// Top 5 emotions across the user's thought records.
    async fn get_thought_patterns(&self, user_id: &str) -> Result<Vec<EmotionCount>>;

    /// Record count, top emotions, and keywords extracted from situation
    /// descriptions — all computed inside the database.
    async fn get_insights_summary(&self, user_id: &str) -> Result<InsightsSummary>;

    /// Apply a partial update; returns None when the id does not exist.
    async fn update_thought_record(
        &self,
        record_id: Uuid,
        updates: &UpdateThoughtRecordRequest,
    ) -> Result<Option<ThoughtRecord>>;

    /// Delete by id; the flag reflects the reported deletion count.
    async fn delete_thought_record(&self, record_id: Uuid) -> Result<bool>;

    // ========================================================================
    // Emotion records
    // ========================================================================

    /// Store an emotion record and link it to its owner.
    async fn create_emotion_record(&self, record: &EmotionRecord) -> Result<EmotionRecord>;

    /// List the user's emotion records, newest first, with optional filters.
    /// The `symptom` filter field is ignored for this record kind.
    async fn get_user_emotion_records(
        &self,
        user_id: &str,
        filter: &RecordFilter,
    ) -> Result<Vec<EmotionRecord>>;

    /// Top 5 emotions across the user's emotion records.
    async fn get_emotion_patterns(&self, user_id: &str) -> Result<Vec<EmotionCount>>;

    /// Apply a partial update; returns None when the id does not exist.
    async fn update_emotion_record(
        &self,
        record_id: Uuid,
        updates: &UpdateEmotionRecordRequest,
    ) -> Result<Option<EmotionRecord>>;

    /// Delete by id; the flag reflects the reported deletion count.
    async fn delete_emotion_record(&self, record_id: Uuid) -> Result<bool>;
}
