//! Graph models for users, the emotion/symptom catalogs, and journal records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

// ============================================================================
// User Node
// ============================================================================

/// A user provisioned from a verified identity-provider token.
///
/// `uid` is the provider's stable subject id and the natural key for the
/// node; the app never deletes users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Catalog Nodes
// ============================================================================

/// An emotion catalog entry. Inserted admin-style, read-only afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Emotion {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// A physical symptom. The normalized name is the natural key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symptom {
    pub name: String,
    pub description: Option<String>,
}

/// Normalize a symptom name: trim surrounding whitespace and lower-case.
///
/// Applied before every storage or lookup so `"Fatigue "`, `"fatigue"` and
/// `" FATIGUE"` all resolve to the same node.
pub fn normalize_symptom(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Normalize a list of symptom names, dropping empties and duplicates
/// while preserving first-seen order.
pub fn normalize_symptoms(names: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for name in names {
        let normalized = normalize_symptom(name);
        if !normalized.is_empty() && !seen.contains(&normalized) {
            seen.push(normalized);
        }
    }
    seen
}

// ============================================================================
// Journal Records
// ============================================================================

/// A thought record: situation, emotion, underlying belief, and the
/// symptoms experienced at the time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThoughtRecord {
    pub id: Uuid,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub title: Option<String>,
    pub situation_description: Option<String>,
    pub emotion: String,
    pub underlying_belief: Option<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An emotion record — a thought record without the symptom list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionRecord {
    pub id: Uuid,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub title: Option<String>,
    pub situation_description: Option<String>,
    pub emotion: String,
    pub underlying_belief: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Request / filter types
// ============================================================================

/// Body for POST /thought-records. The caller's identity comes from the
/// bearer token, never from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateThoughtRecordRequest {
    pub title: Option<String>,
    pub situation_description: Option<String>,
    pub emotion: String,
    pub underlying_belief: Option<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    /// Defaults to now (UTC) when absent.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Body for POST /emotion-records.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEmotionRecordRequest {
    pub title: Option<String>,
    pub situation_description: Option<String>,
    pub emotion: String,
    pub underlying_belief: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Partial update for a thought record. Only present fields are written.
///
/// `symptoms` accepts either a single string or a list, matching what
/// clients actually send.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateThoughtRecordRequest {
    pub title: Option<String>,
    pub situation_description: Option<String>,
    pub emotion: Option<String>,
    pub underlying_belief: Option<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub symptoms: Option<Vec<String>>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl UpdateThoughtRecordRequest {
    /// True when no field is present (nothing to write).
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.situation_description.is_none()
            && self.emotion.is_none()
            && self.underlying_belief.is_none()
            && self.symptoms.is_none()
            && self.timestamp.is_none()
    }
}

/// Partial update for an emotion record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEmotionRecordRequest {
    pub title: Option<String>,
    pub situation_description: Option<String>,
    pub emotion: Option<String>,
    pub underlying_belief: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl UpdateEmotionRecordRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.situation_description.is_none()
            && self.emotion.is_none()
            && self.underlying_belief.is_none()
            && self.timestamp.is_none()
    }
}

/// Optional predicates for record list queries. Each present field becomes
/// one named-parameter clause in the generated Cypher.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordFilter {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub emotion: Option<String>,
    pub symptom: Option<String>,
}

/// Accept `"headache"` or `["headache", "nausea"]` for a symptoms field.
fn string_or_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        One(String),
        Many(Vec<String>),
    }

    Ok(Option::<StringOrList>::deserialize(deserializer)?.map(|v| match v {
        StringOrList::One(s) => vec![s],
        StringOrList::Many(list) => list,
    }))
}

// ============================================================================
// Aggregate query rows
// ============================================================================

/// One row of an emotion frequency query: emotion name and how many of the
/// user's records carry it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmotionCount {
    pub emotion: String,
    pub count: i64,
}

/// One row of the symptom time-of-day correlation: a symptom, an hour of
/// the day (0-23, UTC), and the number of records matching both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymptomTimePattern {
    pub symptom: String,
    pub hour: i64,
    pub count: i64,
}

/// One row of the keyword extraction query over situation descriptions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: i64,
}

/// Aggregate summary for GET /thought-records/insights-summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsSummary {
    pub total_records: i64,
    pub top_emotions: Vec<EmotionCount>,
    pub top_keywords: Vec<KeywordCount>,
}

// ============================================================================
// Tests
// ============================================================================
