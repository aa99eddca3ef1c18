//! `GraphStore` implementation for `Neo4jClient`.
//!
//! Every method delegates to the corresponding inherent method.

use async_trait::async_trait;
use uuid::Uuid;

use super::client::Neo4jClient;
use super::models::*;
use super::traits::GraphStore;
use crate::auth::TokenClaims;

#[async_trait]
impl GraphStore for Neo4jClient {
    async fn health_check(&self) -> anyhow::Result<bool> {
        self.health_check().await
    }

    // ========================================================================
    // User operations
    // ========================================================================

    async fn get_user_by_uid(&self, uid: &str) -> anyhow::Result<Option<User>> {
        self.get_user_by_uid(uid).await
    }

    async fn upsert_user(&self, claims: &TokenClaims) -> anyhow::Result<User> {
        self.upsert_user(claims).await
    }

    // ========================================================================
    // Emotion catalog
    // ========================================================================

    async fn add_emotion(&self, name: &str, description: Option<&str>) -> anyhow::Result<Emotion> {
        self.add_emotion(name, description).await
    }

    async fn get_emotion_by_name(&self, name: &str) -> anyhow::Result<Option<Emotion>> {
        self.get_emotion_by_name(name).await
    }

    async fn list_emotions(&self) -> anyhow::Result<Vec<Emotion>> {
        self.list_emotions().await
    }

    async fn get_emotion_frequency(&self, user_id: &str) -> anyhow::Result<Vec<EmotionCount>> {
        self.get_emotion_frequency(user_id).await
    }

    // ========================================================================
    // Symptom catalog
    // ========================================================================

    async fn upsert_symptom(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> anyhow::Result<Symptom> {
        self.upsert_symptom(name, description).await
    }

    async fn list_symptoms(&self) -> anyhow::Result<Vec<Symptom>> {
        self.list_symptoms().await
    }

    async fn get_symptom_time_patterns(
        &self,
        user_id: &str,
    ) -> anyhow::Result<Vec<SymptomTimePattern>> {
        self.get_symptom_time_patterns(user_id).await
    }

    // ========================================================================
    // Thought records
    // ========================================================================

    async fn create_thought_record(
        &self,
        record: &ThoughtRecord,
    ) -> anyhow::Result<ThoughtRecord> {
        self.create_thought_record(record).await
    }

    async fn get_user_thought_records(
        &self,
        user_id: &str,
        filter: &RecordFilter,
    ) -> anyhow::Result<Vec<ThoughtRecord>> {
        self.get_user_thought_records(user_id, filter).await
    }

    async fn get_thought_patterns(&self, user_id: &str) -> anyhow::Result<Vec<EmotionCount>> {
        self.get_thought_patterns(user_id).await
    }

    async fn get_insights_summary(&self, user_id: &str) -> anyhow::Result<InsightsSummary> {
        self.get_insights_summary(user_id).await
    }

    async fn update_thought_record(
        &self,
        record_id: Uuid,
        updates: &UpdateThoughtRecordRequest,
    ) -> anyhow::Result<Option<ThoughtRecord>> {
        self.update_thought_record(record_id, updates).await
    }

    async fn delete_thought_record(&self, record_id: Uuid) -> anyhow::Result<bool> {
        self.delete_thought_record(record_id).await
    }

    // ========================================================================
    // Emotion records
    // ========================================================================

    async fn create_emotion_record(
        &self,
        record: &EmotionRecord,
    ) -> anyhow::Result<EmotionRecord> {
        self.create_emotion_record(record).await
    }

    async fn get_user_emotion_records(
        &self,
        user_id: &str,
        filter: &RecordFilter,
    ) -> anyhow::Result<Vec<EmotionRecord>> {
        self.get_user_emotion_records(user_id, filter).await
    }

    async fn get_emotion_patterns(&self, user_id: &str) -> anyhow::Result<Vec<EmotionCount>> {
        self.get_emotion_patterns(user_id).await
    }

    async fn update_emotion_record(
        &self,
        record_id: Uuid,
        updates: &UpdateEmotionRecordRequest,
    ) -> anyhow::Result<Option<EmotionRecord>> {
        self.update_emotion_record(record_id, updates).await
    }

    async fn delete_emotion_record(&self, record_id: Uuid) -> anyhow::Result<bool> {
        self.delete_emotion_record(record_id).await
    }
}
