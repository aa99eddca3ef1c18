//! In-memory mock implementation of GraphStore for testing.
//!
//! Mirrors the Cypher semantics of `Neo4jClient` over
//! `tokio::sync::RwLock<HashMap<K, V>>` collections. Conditionally
//! compiled with `#[cfg(test)]`.

use crate::auth::TokenClaims;
use crate::neo4j::models::*;
use crate::neo4j::traits::GraphStore;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{Timelike, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory mock implementation of GraphStore for testing.
pub struct MockGraphStore {
    pub users: RwLock<HashMap<String, User>>,
    pub emotions: RwLock<HashMap<Uuid, Emotion>>,
    pub symptoms: RwLock<HashMap<String, Symptom>>,
    pub thought_records: RwLock<HashMap<Uuid, ThoughtRecord>>,
    pub emotion_records: RwLock<HashMap<Uuid, EmotionRecord>>,
}

impl MockGraphStore {
    /// Create a new empty MockGraphStore.
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            emotions: RwLock::new(HashMap::new()),
            symptoms: RwLock::new(HashMap::new()),
            thought_records: RwLock::new(HashMap::new()),
            emotion_records: RwLock::new(HashMap::new()),
        }
    }

    // ========================================================================
    // Builder / seeding methods for tests
    // ========================================================================

    /// Seed a user into the store.
    pub async fn with_user(self, user: User) -> Self {
        self.users.write().await.insert(user.uid.clone(), user);
        self
    }

    /// Seed an emotion into the catalog.
    pub async fn with_emotion(self, emotion: Emotion) -> Self {
        self.emotions.write().await.insert(emotion.id, emotion);
        self
    }

    /// Seed a thought record into the store.
    pub async fn with_thought_record(self, record: ThoughtRecord) -> Self {
        self.thought_records
            .write()
            .await
            .insert(record.id, record);
        self
    }

    /// Seed an emotion record into the store.
    pub async fn with_emotion_record(self, record: EmotionRecord) -> Self {
        self.emotion_records
            .write()
            .await
            .insert(record.id, record);
        self
    }
}

impl Default for MockGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Count emotions, order by (count desc, name asc), truncate to the
/// top 5. Same shape as the Cypher LIMIT queries.
fn top_emotions<'a, I: Iterator<Item = &'a str>>(emotions: I) -> Vec<EmotionCount> {
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for emotion in emotions {
        *counts.entry(emotion).or_insert(0) += 1;
    }
    let mut rows: Vec<EmotionCount> = counts
        .into_iter()
        .map(|(emotion, count)| EmotionCount {
            emotion: emotion.to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.emotion.cmp(&b.emotion)));
    rows.truncate(5);
    rows
}

fn matches_filter_common(
    filter: &RecordFilter,
    timestamp: &chrono::DateTime<Utc>,
    emotion: &str,
) -> bool {
    if let Some(start) = &filter.start_date {
        if timestamp < start {
            return false;
        }
    }
    if let Some(end) = &filter.end_date {
        if timestamp > end {
            return false;
        }
    }
    if let Some(wanted) = &filter.emotion {
        if emotion != wanted {
            return false;
        }
    }
    true
}

#[async_trait]
impl GraphStore for MockGraphStore {
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    // ========================================================================
    // User operations
    // ========================================================================

    async fn get_user_by_uid(&self, uid: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(uid).cloned())
    }

    async fn upsert_user(&self, claims: &TokenClaims) -> Result<User> {
        let mut users = self.users.write().await;
        if let Some(existing) = users.get(&claims.uid) {
            return Ok(existing.clone());
        }
        let user = User {
            uid: claims.uid.clone(),
            email: claims.email.clone(),
            name: claims.name.clone(),
            photo_url: claims.photo_url.clone(),
            created_at: Utc::now(),
        };
        users.insert(user.uid.clone(), user.clone());
        Ok(user)
    }

    // ========================================================================
    // Emotion catalog
    // ========================================================================

    async fn add_emotion(&self, name: &str, description: Option<&str>) -> Result<Emotion> {
        let emotion = Emotion {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.map(|s| s.to_string()),
        };
        self.emotions
            .write()
            .await
            .insert(emotion.id, emotion.clone());
        Ok(emotion)
    }

    async fn get_emotion_by_name(&self, name: &str) -> Result<Option<Emotion>> {
        Ok(self
            .emotions
            .read()
            .await
            .values()
            .find(|e| e.name == name)
            .cloned())
    }

    async fn list_emotions(&self) -> Result<Vec<Emotion>> {
        let mut emotions: Vec<Emotion> = self.emotions.read().await.values().cloned().collect();
        emotions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(emotions)
    }

    async fn get_emotion_frequency(&self, user_id: &str) -> Result<Vec<EmotionCount>> {
        let records = self.thought_records.read().await;
        Ok(top_emotions(
            records
                .values()
                .filter(|r| r.user_id == user_id)
                .map(|r| r.emotion.as_str()),
        ))
    }

    // ========================================================================
    // Symptom catalog
    // ========================================================================

    async fn upsert_symptom(&self, name: &str, description: Option<&str>) -> Result<Symptom> {
        let normalized = normalize_symptom(name);
        anyhow::ensure!(!normalized.is_empty(), "symptom name must not be blank");

        let mut symptoms = self.symptoms.write().await;
        if let Some(existing) = symptoms.get(&normalized) {
            return Ok(existing.clone());
        }
        let symptom = Symptom {
            name: normalized.clone(),
            description: description.map(|s| s.to_string()),
        };
        symptoms.insert(normalized, symptom.clone());
        Ok(symptom)
    }

    async fn list_symptoms(&self) -> Result<Vec<Symptom>> {
        let mut symptoms: Vec<Symptom> = self.symptoms.read().await.values().cloned().collect();
        symptoms.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(symptoms)
    }

    async fn get_symptom_time_patterns(&self, user_id: &str) -> Result<Vec<SymptomTimePattern>> {
        let records = self.thought_records.read().await;
        let mut counts: HashMap<(String, i64), i64> = HashMap::new();
        for record in records.values().filter(|r| r.user_id == user_id) {
            let hour = record.timestamp.hour() as i64;
            for symptom in &record.symptoms {
                *counts.entry((symptom.clone(), hour)).or_insert(0) += 1;
            }
        }
        let mut rows: Vec<SymptomTimePattern> = counts
            .into_iter()
            .map(|((symptom, hour), count)| SymptomTimePattern {
                symptom,
                hour,
                count,
            })
            .collect();
        rows.sort_by(|a, b| {
            a.symptom
                .cmp(&b.symptom)
                .then(b.count.cmp(&a.count))
                .then(a.hour.cmp(&b.hour))
        });
        Ok(rows)
    }

    // ========================================================================
    // Thought records
    // ========================================================================

    async fn create_thought_record(&self, record: &ThoughtRecord) -> Result<ThoughtRecord> {
        anyhow::ensure!(
            self.users.read().await.contains_key(&record.user_id),
            "create_thought_record: owner node not found for {}",
            record.user_id
        );

        let symptoms = normalize_symptoms(&record.symptoms);
        for symptom in &symptoms {
            self.upsert_symptom(symptom, None).await?;
        }

        let now = Utc::now();
        let stored = ThoughtRecord {
            symptoms,
            created_at: now,
            updated_at: now,
            ..record.clone()
        };
        self.thought_records
            .write()
            .await
            .insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_user_thought_records(
        &self,
        user_id: &str,
        filter: &RecordFilter,
    ) -> Result<Vec<ThoughtRecord>> {
        let wanted_symptom = filter.symptom.as_deref().map(normalize_symptom);
        let records = self.thought_records.read().await;
        let mut matching: Vec<ThoughtRecord> = records
            .values()
            .filter(|r| r.user_id == user_id)
            .filter(|r| matches_filter_common(filter, &r.timestamp, &r.emotion))
            .filter(|r| match &wanted_symptom {
                Some(symptom) => r.symptoms.iter().any(|s| s == symptom),
                None => true,
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(matching)
    }

    async fn get_thought_patterns(&self, user_id: &str) -> Result<Vec<EmotionCount>> {
        self.get_emotion_frequency(user_id).await
    }

    async fn get_insights_summary(&self, user_id: &str) -> Result<InsightsSummary> {
        let records = self.thought_records.read().await;
        let user_records: Vec<&ThoughtRecord> =
            records.values().filter(|r| r.user_id == user_id).collect();

        let mut keyword_counts: HashMap<String, i64> = HashMap::new();
        for record in &user_records {
            let text = record
                .situation_description
                .as_deref()
                .unwrap_or_default()
                .to_lowercase();
            for word in text.split(' ') {
                let keyword = word.trim();
                if keyword.chars().count() > 3 {
                    *keyword_counts.entry(keyword.to_string()).or_insert(0) += 1;
                }
            }
        }
        let mut top_keywords: Vec<KeywordCount> = keyword_counts
            .into_iter()
            .map(|(keyword, count)| KeywordCount { keyword, count })
            .collect();
        top_keywords.sort_by(|a, b| b.count.cmp(&a.count).then(a.keyword.cmp(&b.keyword)));
        top_keywords.truncate(10);

        Ok(InsightsSummary {
            total_records: user_records.len() as i64,
            top_emotions: top_emotions(user_records.iter().map(|r| r.emotion.as_str())),
            top_keywords,
        })
    }

    async fn update_thought_record(
        &self,
        record_id: Uuid,
        updates: &UpdateThoughtRecordRequest,
    ) -> Result<Option<ThoughtRecord>> {
        let mut records = self.thought_records.write().await;
        let Some(record) = records.get_mut(&record_id) else {
            return Ok(None);
        };

        if let Some(title) = &updates.title {
            record.title = Some(title.clone());
        }
        if let Some(desc) = &updates.situation_description {
            record.situation_description = Some(desc.clone());
        }
        if let Some(emotion) = &updates.emotion {
            record.emotion = emotion.clone();
        }
        if let Some(belief) = &updates.underlying_belief {
            record.underlying_belief = Some(belief.clone());
        }
        if let Some(symptoms) = &updates.symptoms {
            record.symptoms = normalize_symptoms(symptoms);
        }
        if let Some(ts) = &updates.timestamp {
            record.timestamp = *ts;
        }
        record.updated_at = Utc::now();

        Ok(Some(record.clone()))
    }

    async fn delete_thought_record(&self, record_id: Uuid) -> Result<bool> {
        Ok(self
            .thought_records
            .write()
            .await
            .remove(&record_id)
            .is_some())
    }

    // ========================================================================
    // Emotion records
    // ========================================================================

    async fn create_emotion_record(&self, record: &EmotionRecord) -> Result<EmotionRecord> {
        anyhow::ensure!(
            self.users.read().await.contains_key(&record.user_id),
            "create_emotion_record: owner node not found for {}",
            record.user_id
        );

        let now = Utc::now();
        let stored = EmotionRecord {
            created_at: now,
            updated_at: now,
            ..record.clone()
        };
        self.emotion_records
            .write()
            .await
            .insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_user_emotion_records(
        &self,
        user_id: &str,
        filter: &RecordFilter,
    ) -> Result<Vec<EmotionRecord>> {
        let records = self.emotion_records.read().await;
        let mut matching: Vec<EmotionRecord> = records
            .values()
            .filter(|r| r.user_id == user_id)
            .filter(|r| matches_filter_common(filter, &r.timestamp, &r.emotion))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(matching)
    }

    async fn get_emotion_patterns(&self, user_id: &str) -> Result<Vec<EmotionCount>> {
        let records = self.emotion_records.read().await;
        Ok(top_emotions(
            records
                .values()
                .filter(|r| r.user_id == user_id)
                .map(|r| r.emotion.as_str()),
        ))
    }

    async fn update_emotion_record(
        &self,
        record_id: Uuid,
        updates: &UpdateEmotionRecordRequest,
    ) -> Result<Option<EmotionRecord>> {
        let mut records = self.emotion_records.write().await;
        let Some(record) = records.get_mut(&record_id) else {
            return Ok(None);
        };

        if let Some(title) = &updates.title {
            record.title = Some(title.clone());
        }
        if let Some(desc) = &updates.situation_description {
            record.situation_description = Some(desc.clone());
        }
        if let Some(emotion) = &updates.emotion {
            record.emotion = emotion.clone();
        }
        if let Some(belief) = &updates.underlying_belief {
            record.underlying_belief = Some(belief.clone());
        }
        if let Some(ts) = &updates.timestamp {
            record.timestamp = *ts;
        }
        record.updated_at = Utc::now();

        Ok(Some(record.clone()))
    }

    async fn delete_emotion_record(&self, record_id: Uuid) -> Result<bool> {
        Ok(self
            .emotion_records
            .write()
            .await
            .remove(&record_id)
            .is_some())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{test_claims, test_thought_record, test_user};

    #[tokio::test]
    async fn test_upsert_user_is_idempotent() {
        let store = MockGraphStore::new();
        let claims = test_claims("uid-1");

        let first = store.upsert_user(&claims).await.unwrap();
        let second = store.upsert_user(&claims).await.unwrap();

        assert_eq!(first.uid, second.uid);
        assert_eq!(store.users.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_symptom_variants_resolve_to_one_entity() {
        let store = MockGraphStore::new();

        store.upsert_symptom("Fatigue ", None).await.unwrap();
        store.upsert_symptom("fatigue", None).await.unwrap();
        store.upsert_symptom(" FATIGUE", None).await.unwrap();

        let symptoms = store.list_symptoms().await.unwrap();
        assert_eq!(symptoms.len(), 1);
        assert_eq!(symptoms[0].name, "fatigue");
    }

    #[tokio::test]
    async fn test_create_thought_record_dedupes_symptoms() {
        let user = test_user("uid-1");
        let store = MockGraphStore::new().with_user(user).await;

        let mut record = test_thought_record("uid-1", "Anxiety");
        record.symptoms = vec!["Racing Heart".to_string(), "racing heart ".to_string()];

        let stored = store.create_thought_record(&record).await.unwrap();
        assert_eq!(stored.symptoms, vec!["racing heart".to_string()]);
    }

    #[tokio::test]
    async fn test_patterns_cap_at_five_descending() {
        let user = test_user("uid-1");
        let mut store = MockGraphStore::new().with_user(user).await;

        for (emotion, n) in [
            ("Anxiety", 6),
            ("Calm", 5),
            ("Anger", 4),
            ("Joy", 3),
            ("Fear", 2),
            ("Sadness", 1),
        ] {
            for _ in 0..n {
                store = store
                    .with_thought_record(test_thought_record("uid-1", emotion))
                    .await;
            }
        }

        let patterns = store.get_thought_patterns("uid-1").await.unwrap();
        assert_eq!(patterns.len(), 5);
        assert_eq!(patterns[0].emotion, "Anxiety");
        assert_eq!(patterns[0].count, 6);
        assert!(patterns.windows(2).all(|w| w[0].count >= w[1].count));
        assert!(!patterns.iter().any(|p| p.emotion == "Sadness"));
    }

    #[tokio::test]
    async fn test_symptom_time_patterns_group_by_hour() {
        use chrono::TimeZone;

        let user = test_user("uid-1");
        let mut store = MockGraphStore::new().with_user(user).await;

        // Two records at 09:xx with fatigue, one at 22:xx with insomnia
        for (hour, symptom) in [(9, "fatigue"), (9, "fatigue"), (22, "insomnia")] {
            let mut record = test_thought_record("uid-1", "Anxiety");
            record.timestamp = Utc.with_ymd_and_hms(2026, 3, 14, hour, 30, 0).unwrap();
            record.symptoms = vec![symptom.to_string()];
            store = store.with_thought_record(record).await;
        }

        let patterns = store.get_symptom_time_patterns("uid-1").await.unwrap();
        assert_eq!(
            patterns,
            vec![
                SymptomTimePattern {
                    symptom: "fatigue".to_string(),
                    hour: 9,
                    count: 2
                },
                SymptomTimePattern {
                    symptom: "insomnia".to_string(),
                    hour: 22,
                    count: 1
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_missing_record_reports_false() {
        let store = MockGraphStore::new();
        let deleted = store.delete_thought_record(Uuid::new_v4()).await.unwrap();
        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_update_missing_record_returns_none() {
        let store = MockGraphStore::new();
        let updated = store
            .update_thought_record(Uuid::new_v4(), &UpdateThoughtRecordRequest::default())
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_insights_summary_counts_keywords() {
        let user = test_user("uid-1");
        let mut record = test_thought_record("uid-1", "Anxiety");
        record.situation_description =
            Some("Crowded train platform during rush hour train delays".to_string());
        let store = MockGraphStore::new()
            .with_user(user)
            .await
            .with_thought_record(record)
            .await;

        let summary = store.get_insights_summary("uid-1").await.unwrap();
        assert_eq!(summary.total_records, 1);
        assert_eq!(summary.top_emotions[0].emotion, "Anxiety");
        let train = summary
            .top_keywords
            .iter()
            .find(|k| k.keyword == "train")
            .expect("'train' should be extracted");
        assert_eq!(train.count, 2);
        // Short words are filtered out
        assert!(!summary.top_keywords.iter().any(|k| k.keyword == "hour"));
    }

    #[tokio::test]
    async fn test_thought_record_filters() {
        let user = test_user("uid-1");
        let mut anxious = test_thought_record("uid-1", "Anxiety");
        anxious.symptoms = vec!["fatigue".to_string()];
        let calm = test_thought_record("uid-1", "Calm");
        let store = MockGraphStore::new()
            .with_user(user)
            .await
            .with_thought_record(anxious)
            .await
            .with_thought_record(calm)
            .await;

        let by_emotion = store
            .get_user_thought_records(
                "uid-1",
                &RecordFilter {
                    emotion: Some("Anxiety".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(by_emotion.len(), 1);
        assert_eq!(by_emotion[0].emotion, "Anxiety");

        // Symptom filter normalizes its argument
        let by_symptom = store
            .get_user_thought_records(
                "uid-1",
                &RecordFilter {
                    symptom: Some(" FATIGUE".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(by_symptom.len(), 1);

        let all = store
            .get_user_thought_records("uid-1", &RecordFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }
}
