//! Neo4j client for the journaling graph

use super::models::*;
use crate::auth::TokenClaims;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use neo4rs::{query, Graph, Node, Query, Row};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Builder for optional WHERE predicates in record list queries.
///
/// Each predicate is a fixed clause referencing a named parameter; values
/// are always bound through `Query::param`, never interpolated into the
/// Cypher text.
#[derive(Default)]
pub struct FilterClauses {
    conditions: Vec<&'static str>,
}

impl FilterClauses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower bound on the record timestamp (`$start_date`).
    pub fn add_start_date(&mut self, start: Option<&DateTime<Utc>>) -> &mut Self {
        if start.is_some() {
            self.conditions.push("r.timestamp >= datetime($start_date)");
        }
        self
    }

    /// Upper bound on the record timestamp (`$end_date`).
    pub fn add_end_date(&mut self, end: Option<&DateTime<Utc>>) -> &mut Self {
        if end.is_some() {
            self.conditions.push("r.timestamp <= datetime($end_date)");
        }
        self
    }

    /// Exact emotion match (`$emotion`).
    pub fn add_emotion(&mut self, emotion: Option<&str>) -> &mut Self {
        if emotion.is_some() {
            self.conditions.push("r.emotion = $emotion");
        }
        self
    }

    /// Symptom list membership (`$symptom`).
    pub fn add_symptom(&mut self, symptom: Option<&str>) -> &mut Self {
        if symptom.is_some() {
            self.conditions.push("$symptom IN r.symptoms");
        }
        self
    }

    /// Build an `AND ...` suffix for a query that already has a WHERE
    /// anchor clause. Empty string when no predicate was added.
    pub fn build_and(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("AND {}", self.conditions.join(" AND "))
        }
    }

    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }
}

/// Bind the filter's present values onto a query. Clause generation and
/// parameter binding use the same field set, so every `$name` referenced
/// by `FilterClauses` is always bound.
fn bind_filter(mut q: Query, filter: &RecordFilter) -> Query {
    if let Some(start) = &filter.start_date {
        q = q.param("start_date", start.to_rfc3339());
    }
    if let Some(end) = &filter.end_date {
        q = q.param("end_date", end.to_rfc3339());
    }
    if let Some(emotion) = &filter.emotion {
        q = q.param("emotion", emotion.clone());
    }
    if let Some(symptom) = &filter.symptom {
        q = q.param("symptom", normalize_symptom(symptom));
    }
    q
}

/// Client for Neo4j operations.
///
/// Holds one shared connection handle, constructed at process start and
/// passed into request-scoped work through `ServerState`. On a
/// session-expired/connection error it reconnects exactly once and
/// replays the query before giving up.
pub struct Neo4jClient {
    graph: RwLock<Option<Graph>>,
    uri: String,
    user: String,
    password: String,
}

/// True for errors worth one reconnect attempt: the Bolt connection died
/// or the server discarded the session.
fn is_session_expired(err: &neo4rs::Error) -> bool {
    let text = err.to_string();
    matches!(err, neo4rs::Error::ConnectionError)
        || text.contains("SessionExpired")
        || text.contains("connection reset")
}

impl Neo4jClient {
    /// Connect and initialize the schema.
    pub async fn new(uri: &str, user: &str, password: &str) -> Result<Self> {
        let client = Self {
            graph: RwLock::new(None),
            uri: uri.to_string(),
            user: user.to_string(),
            password: password.to_string(),
        };

        client.connect().await?;
        client.init_schema().await?;

        Ok(client)
    }

    /// Establish (or re-establish) the connection handle.
    async fn connect(&self) -> Result<()> {
        let graph = Graph::new(&self.uri, &self.user, &self.password)
            .await
            .context("Failed to connect to Neo4j")?;

        let mut guard = self.graph.write().await;
        *guard = Some(graph);
        tracing::info!("Connected to Neo4j at {}", self.uri);
        Ok(())
    }

    async fn get_graph(&self) -> Result<Graph> {
        let guard = self.graph.read().await;
        guard
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Not connected to Neo4j"))
    }

    /// Initialize uniqueness constraints and indexes.
    async fn init_schema(&self) -> Result<()> {
        let constraints = vec![
            "CREATE CONSTRAINT user_uid IF NOT EXISTS FOR (u:User) REQUIRE u.uid IS UNIQUE",
            "CREATE CONSTRAINT emotion_id IF NOT EXISTS FOR (e:Emotion) REQUIRE e.id IS UNIQUE",
            "CREATE CONSTRAINT symptom_name IF NOT EXISTS FOR (s:Symptom) REQUIRE s.name IS UNIQUE",
            "CREATE CONSTRAINT thought_record_id IF NOT EXISTS FOR (r:ThoughtRecord) REQUIRE r.id IS UNIQUE",
            "CREATE CONSTRAINT emotion_record_id IF NOT EXISTS FOR (r:EmotionRecord) REQUIRE r.id IS UNIQUE",
        ];

        let indexes = vec![
            "CREATE INDEX emotion_name IF NOT EXISTS FOR (e:Emotion) ON (e.name)",
            "CREATE INDEX thought_record_user IF NOT EXISTS FOR (r:ThoughtRecord) ON (r.user_id)",
            "CREATE INDEX emotion_record_user IF NOT EXISTS FOR (r:EmotionRecord) ON (r.user_id)",
        ];

        let graph = self.get_graph().await?;
        for constraint in constraints {
            if let Err(e) = graph.run(query(constraint)).await {
                tracing::warn!("Constraint may already exist: {}", e);
            }
        }
        for index in indexes {
            if let Err(e) = graph.run(query(index)).await {
                tracing::warn!("Index may already exist: {}", e);
            }
        }

        Ok(())
    }

    /// Execute a parameterized query and collect the rows.
    ///
    /// Retries once after reconnecting when the session expired; any
    /// second failure propagates.
    async fn execute(&self, q: Query) -> Result<Vec<Row>> {
        match self.try_execute(q.clone()).await {
            Ok(rows) => Ok(rows),
            Err(e) if is_session_expired(&e) => {
                tracing::warn!("Neo4j session expired, reconnecting: {}", e);
                self.connect().await?;
                self.try_execute(q).await.map_err(Into::into)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn try_execute(&self, q: Query) -> Result<Vec<Row>, neo4rs::Error> {
        let graph = self
            .get_graph()
            .await
            .map_err(|_| neo4rs::Error::ConnectionError)?;
        let mut result = graph.execute(q).await?;
        let mut rows = Vec::new();
        while let Some(row) = result.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Health probe used by GET /health.
    pub async fn health_check(&self) -> Result<bool> {
        let rows = self.execute(query("RETURN 1 AS ok")).await?;
        Ok(!rows.is_empty())
    }

    // ========================================================================
    // User operations
    // ========================================================================

    /// Get a user by the identity provider's subject id.
    pub async fn get_user_by_uid(&self, uid: &str) -> Result<Option<User>> {
        let q = query("MATCH (u:User {uid: $uid}) RETURN u").param("uid", uid);

        let rows = self.execute(q).await.inspect_err(|e| {
            tracing::error!("Error getting user by uid: {}", e);
        })?;

        match rows.first() {
            Some(row) => {
                let node: Node = row.get("u")?;
                Ok(Some(node_to_user(&node)?))
            }
            None => Ok(None),
        }
    }

    /// Create-or-return a user from verified token claims.
    ///
    /// MERGE keyed on `uid`: concurrent first requests from the same
    /// identity resolve to a single node.
    pub async fn upsert_user(&self, claims: &TokenClaims) -> Result<User> {
        let q = query(
            r#"
            MERGE (u:User {uid: $uid})
            ON CREATE SET
                u.email = $email,
                u.name = $name,
                u.photo_url = $photo_url,
                u.created_at = datetime($created_at)
            RETURN u
            "#,
        )
        .param("uid", claims.uid.clone())
        .param("email", claims.email.clone())
        .param("name", claims.name.clone().unwrap_or_default())
        .param("photo_url", claims.photo_url.clone().unwrap_or_default())
        .param("created_at", Utc::now().to_rfc3339());

        let rows = self.execute(q).await.inspect_err(|e| {
            tracing::error!("Error upserting user: {}", e);
        })?;

        let row = rows
            .first()
            .ok_or_else(|| anyhow::anyhow!("upsert_user: no row returned"))?;
        let node: Node = row.get("u")?;
        node_to_user(&node)
    }

    // ========================================================================
    // Emotion catalog
    // ========================================================================

    /// Insert a new emotion catalog entry.
    pub async fn add_emotion(&self, name: &str, description: Option<&str>) -> Result<Emotion> {
        let q = query(
            r#"
            CREATE (e:Emotion {id: $id, name: $name, description: $description})
            RETURN e
            "#,
        )
        .param("id", Uuid::new_v4().to_string())
        .param("name", name)
        .param("description", description.unwrap_or_default());

        let rows = self.execute(q).await.inspect_err(|e| {
            tracing::error!("Error adding emotion: {}", e);
        })?;

        let row = rows
            .first()
            .ok_or_else(|| anyhow::anyhow!("add_emotion: no row returned"))?;
        let node: Node = row.get("e")?;
        node_to_emotion(&node)
    }

    /// Look up an emotion by exact name.
    pub async fn get_emotion_by_name(&self, name: &str) -> Result<Option<Emotion>> {
        let q = query("MATCH (e:Emotion {name: $name}) RETURN e").param("name", name);

        let rows = self.execute(q).await?;
        match rows.first() {
            Some(row) => {
                let node: Node = row.get("e")?;
                Ok(Some(node_to_emotion(&node)?))
            }
            None => Ok(None),
        }
    }

    /// List the whole emotion catalog.
    pub async fn list_emotions(&self) -> Result<Vec<Emotion>> {
        let q = query("MATCH (e:Emotion) RETURN e ORDER BY e.name");

        let rows = self.execute(q).await.inspect_err(|e| {
            tracing::error!("Error listing emotions: {}", e);
        })?;

        rows.iter()
            .map(|row| {
                let node: Node = row.get("e")?;
                node_to_emotion(&node)
            })
            .collect()
    }

    /// Top 5 emotions across the user's thought records.
    pub async fn get_emotion_frequency(&self, user_id: &str) -> Result<Vec<EmotionCount>> {
        let q = query(
            r#"
            MATCH (u:User {uid: $user_id})-[:HAS_RECORD]->(r:ThoughtRecord)
            WITH r.emotion AS emotion, count(*) AS count
            ORDER BY count DESC
            RETURN emotion, count
            LIMIT 5
            "#,
        )
        .param("user_id", user_id);

        let rows = self.execute(q).await.inspect_err(|e| {
            tracing::error!("Error fetching emotion frequency: {}", e);
        })?;

        rows.iter()
            .map(|row| {
                Ok(EmotionCount {
                    emotion: row.get("emotion")?,
                    count: row.get("count")?,
                })
            })
            .collect()
    }

    // ========================================================================
    // Symptom catalog
    // ========================================================================

    /// Create-or-return a symptom keyed by its normalized name.
    pub async fn upsert_symptom(&self, name: &str, description: Option<&str>) -> Result<Symptom> {
        let normalized = normalize_symptom(name);
        anyhow::ensure!(!normalized.is_empty(), "symptom name must not be blank");

        let q = query(
            r#"
            MERGE (s:Symptom {name: $name})
            ON CREATE SET s.description = $description
            RETURN s
            "#,
        )
        .param("name", normalized)
        .param("description", description.unwrap_or_default());

        let rows = self.execute(q).await.inspect_err(|e| {
            tracing::error!("Error upserting symptom: {}", e);
        })?;

        let row = rows
            .first()
            .ok_or_else(|| anyhow::anyhow!("upsert_symptom: no row returned"))?;
        let node: Node = row.get("s")?;
        node_to_symptom(&node)
    }

    /// List all known symptoms.
    pub async fn list_symptoms(&self) -> Result<Vec<Symptom>> {
        let q = query("MATCH (s:Symptom) RETURN s ORDER BY s.name");

        let rows = self.execute(q).await.inspect_err(|e| {
            tracing::error!("Error listing symptoms: {}", e);
        })?;

        rows.iter()
            .map(|row| {
                let node: Node = row.get("s")?;
                node_to_symptom(&node)
            })
            .collect()
    }

    /// Symptom × hour-of-day correlation over the user's thought records.
    ///
    /// The grouping and counting happen inside the database; the record
    /// symptom lists are UNWOUND so each occurrence counts once.
    pub async fn get_symptom_time_patterns(
        &self,
        user_id: &str,
    ) -> Result<Vec<SymptomTimePattern>> {
        let q = query(
            r#"
            MATCH (u:User {uid: $user_id})-[:HAS_RECORD]->(r:ThoughtRecord)
            UNWIND r.symptoms AS symptom
            WITH symptom, r.timestamp.hour AS hour, count(*) AS count
            ORDER BY symptom, count DESC
            RETURN symptom, hour, count
            "#,
        )
        .param("user_id", user_id);

        let rows = self.execute(q).await.inspect_err(|e| {
            tracing::error!("Error fetching symptom time patterns: {}", e);
        })?;

        rows.iter()
            .map(|row| {
                Ok(SymptomTimePattern {
                    symptom: row.get("symptom")?,
                    hour: row.get("hour")?,
                    count: row.get("count")?,
                })
            })
            .collect()
    }

    // ========================================================================
    // Thought records
    // ========================================================================

    /// Store a thought record and link it to its owner.
    ///
    /// Symptom names are normalized and deduplicated, and each one is
    /// upserted into the catalog so first use creates the node.
    pub async fn create_thought_record(&self, record: &ThoughtRecord) -> Result<ThoughtRecord> {
        let symptoms = normalize_symptoms(&record.symptoms);
        for symptom in &symptoms {
            self.upsert_symptom(symptom, None).await?;
        }

        let q = query(
            r#"
            MATCH (u:User {uid: $user_id})
            CREATE (r:ThoughtRecord {
                id: $id,
                user_id: $user_id,
                timestamp: datetime($timestamp),
                title: $title,
                situation_description: $situation_description,
                emotion: $emotion,
                underlying_belief: $underlying_belief,
                symptoms: $symptoms,
                created_at: datetime(),
                updated_at: datetime()
            })
            CREATE (u)-[:HAS_RECORD]->(r)
            RETURN r
            "#,
        )
        .param("id", record.id.to_string())
        .param("user_id", record.user_id.clone())
        .param("timestamp", record.timestamp.to_rfc3339())
        .param("title", record.title.clone().unwrap_or_default())
        .param(
            "situation_description",
            record.situation_description.clone().unwrap_or_default(),
        )
        .param("emotion", record.emotion.clone())
        .param(
            "underlying_belief",
            record.underlying_belief.clone().unwrap_or_default(),
        )
        .param("symptoms", symptoms);

        let rows = self.execute(q).await.inspect_err(|e| {
            tracing::error!("Error creating thought record: {}", e);
        })?;

        let row = rows.first().ok_or_else(|| {
            anyhow::anyhow!("create_thought_record: owner node not found for {}", record.user_id)
        })?;
        let node: Node = row.get("r")?;
        node_to_thought_record(&node)
    }

    /// List the user's thought records, newest first, with optional filters.
    pub async fn get_user_thought_records(
        &self,
        user_id: &str,
        filter: &RecordFilter,
    ) -> Result<Vec<ThoughtRecord>> {
        let mut clauses = FilterClauses::new();
        clauses
            .add_start_date(filter.start_date.as_ref())
            .add_end_date(filter.end_date.as_ref())
            .add_emotion(filter.emotion.as_deref())
            .add_symptom(filter.symptom.as_deref());

        let cypher = format!(
            r#"
            MATCH (u:User {{uid: $user_id}})-[:HAS_RECORD]->(r:ThoughtRecord)
            WHERE r.user_id = $user_id
            {}
            RETURN r
            ORDER BY r.timestamp DESC
            "#,
            clauses.build_and()
        );

        let q = bind_filter(query(&cypher).param("user_id", user_id), filter);

        let rows = self.execute(q).await.inspect_err(|e| {
            tracing::error!("Error getting user thought records: {}", e);
        })?;

        rows.iter()
            .map(|row| {
                let node: Node = row.get("r")?;
                node_to_thought_record(&node)
            })
            .collect()
    }

    /// Top 5 emotions across the user's thought records.
    pub async fn get_thought_patterns(&self, user_id: &str) -> Result<Vec<EmotionCount>> {
        let q = query(
            r#"
            MATCH (u:User {uid: $user_id})-[:HAS_RECORD]->(r:ThoughtRecord)
            WITH r.emotion AS emotion, count(*) AS count
            ORDER BY count DESC
            RETURN emotion, count
            LIMIT 5
            "#,
        )
        .param("user_id", user_id);

        let rows = self.execute(q).await.inspect_err(|e| {
            tracing::error!("Error getting thought patterns: {}", e);
        })?;

        rows.iter()
            .map(|row| {
                Ok(EmotionCount {
                    emotion: row.get("emotion")?,
                    count: row.get("count")?,
                })
            })
            .collect()
    }

    /// Record count, top emotions, and keywords from situation
    /// descriptions. The text splitting is delegated to Cypher.
    pub async fn get_insights_summary(&self, user_id: &str) -> Result<InsightsSummary> {
        let count_q = query(
            r#"
            MATCH (u:User {uid: $user_id})-[:HAS_RECORD]->(r:ThoughtRecord)
            RETURN count(r) AS total
            "#,
        )
        .param("user_id", user_id);

        let rows = self.execute(count_q).await.inspect_err(|e| {
            tracing::error!("Error counting thought records: {}", e);
        })?;
        let total_records = match rows.first() {
            Some(row) => row.get("total")?,
            None => 0,
        };

        let keyword_q = query(
            r#"
            MATCH (u:User {uid: $user_id})-[:HAS_RECORD]->(r:ThoughtRecord)
            WITH split(toLower(coalesce(r.situation_description, '')), ' ') AS words
            UNWIND words AS word
            WITH trim(word) AS keyword
            WHERE size(keyword) > 3
            WITH keyword, count(*) AS count
            ORDER BY count DESC
            RETURN keyword, count
            LIMIT 10
            "#,
        )
        .param("user_id", user_id);

        let rows = self.execute(keyword_q).await.inspect_err(|e| {
            tracing::error!("Error extracting keywords: {}", e);
        })?;
        let top_keywords = rows
            .iter()
            .map(|row| {
                Ok(KeywordCount {
                    keyword: row.get("keyword")?,
                    count: row.get("count")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let top_emotions = self.get_thought_patterns(user_id).await?;

        Ok(InsightsSummary {
            total_records,
            top_emotions,
            top_keywords,
        })
    }

    /// Apply a partial update. Only present fields generate SET clauses;
    /// `updated_at` is always bumped. Returns None for an unknown id.
    pub async fn update_thought_record(
        &self,
        record_id: Uuid,
        updates: &UpdateThoughtRecordRequest,
    ) -> Result<Option<ThoughtRecord>> {
        let mut set_clauses = vec!["r.updated_at = datetime()"];

        if updates.title.is_some() {
            set_clauses.push("r.title = $title");
        }
        if updates.situation_description.is_some() {
            set_clauses.push("r.situation_description = $situation_description");
        }
        if updates.emotion.is_some() {
            set_clauses.push("r.emotion = $emotion");
        }
        if updates.underlying_belief.is_some() {
            set_clauses.push("r.underlying_belief = $underlying_belief");
        }
        if updates.symptoms.is_some() {
            set_clauses.push("r.symptoms = $symptoms");
        }
        if updates.timestamp.is_some() {
            set_clauses.push("r.timestamp = datetime($timestamp)");
        }

        let cypher = format!(
            "MATCH (r:ThoughtRecord {{id: $record_id}}) SET {} RETURN r",
            set_clauses.join(", ")
        );

        let mut q = query(&cypher).param("record_id", record_id.to_string());
        if let Some(title) = &updates.title {
            q = q.param("title", title.clone());
        }
        if let Some(desc) = &updates.situation_description {
            q = q.param("situation_description", desc.clone());
        }
        if let Some(emotion) = &updates.emotion {
            q = q.param("emotion", emotion.clone());
        }
        if let Some(belief) = &updates.underlying_belief {
            q = q.param("underlying_belief", belief.clone());
        }
        if let Some(symptoms) = &updates.symptoms {
            q = q.param("symptoms", normalize_symptoms(symptoms));
        }
        if let Some(ts) = &updates.timestamp {
            q = q.param("timestamp", ts.to_rfc3339());
        }

        let rows = self.execute(q).await.inspect_err(|e| {
            tracing::error!("Error updating thought record: {}", e);
        })?;

        match rows.first() {
            Some(row) => {
                let node: Node = row.get("r")?;
                Ok(Some(node_to_thought_record(&node)?))
            }
            None => Ok(None),
        }
    }

    /// Delete a thought record; the flag comes from the deletion count.
    pub async fn delete_thought_record(&self, record_id: Uuid) -> Result<bool> {
        let q = query(
            r#"
            MATCH (r:ThoughtRecord {id: $record_id})
            DETACH DELETE r
            RETURN count(r) AS deleted
            "#,
        )
        .param("record_id", record_id.to_string());

        let rows = self.execute(q).await.inspect_err(|e| {
            tracing::error!("Error deleting thought record: {}", e);
        })?;

        let deleted: i64 = match rows.first() {
            Some(row) => row.get("deleted")?,
            None => 0,
        };
        Ok(deleted > 0)
    }

    // ========================================================================
    // Emotion records
    // ========================================================================

    /// Store an emotion record and link it to its owner.
    pub async fn create_emotion_record(&self, record: &EmotionRecord) -> Result<EmotionRecord> {
        let q = query(
            r#"
            MATCH (u:User {uid: $user_id})
            CREATE (r:EmotionRecord {
                id: $id,
                user_id: $user_id,
                timestamp: datetime($timestamp),
                title: $title,
                situation_description: $situation_description,
                emotion: $emotion,
                underlying_belief: $underlying_belief,
                created_at: datetime(),
                updated_at: datetime()
            })
            CREATE (u)-[:HAS_RECORD]->(r)
            RETURN r
            "#,
        )
        .param("id", record.id.to_string())
        .param("user_id", record.user_id.clone())
        .param("timestamp", record.timestamp.to_rfc3339())
        .param("title", record.title.clone().unwrap_or_default())
        .param(
            "situation_description",
            record.situation_description.clone().unwrap_or_default(),
        )
        .param("emotion", record.emotion.clone())
        .param(
            "underlying_belief",
            record.underlying_belief.clone().unwrap_or_default(),
        );

        let rows = self.execute(q).await.inspect_err(|e| {
            tracing::error!("Error creating emotion record: {}", e);
        })?;

        let row = rows.first().ok_or_else(|| {
            anyhow::anyhow!("create_emotion_record: owner node not found for {}", record.user_id)
        })?;
        let node: Node = row.get("r")?;
        node_to_emotion_record(&node)
    }

    /// List the user's emotion records, newest first, with optional filters.
    pub async fn get_user_emotion_records(
        &self,
        user_id: &str,
        filter: &RecordFilter,
    ) -> Result<Vec<EmotionRecord>> {
        let mut clauses = FilterClauses::new();
        clauses
            .add_start_date(filter.start_date.as_ref())
            .add_end_date(filter.end_date.as_ref())
            .add_emotion(filter.emotion.as_deref());

        let cypher = format!(
            r#"
            MATCH (u:User {{uid: $user_id}})-[:HAS_RECORD]->(r:EmotionRecord)
            WHERE r.user_id = $user_id
            {}
            RETURN r
            ORDER BY r.timestamp DESC
            "#,
            clauses.build_and()
        );

        let q = bind_filter(query(&cypher).param("user_id", user_id), filter);

        let rows = self.execute(q).await.inspect_err(|e| {
            tracing::error!("Error getting user emotion records: {}", e);
        })?;

        rows.iter()
            .map(|row| {
                let node: Node = row.get("r")?;
                node_to_emotion_record(&node)
            })
            .collect()
    }

    /// Top 5 emotions across the user's emotion records.
    pub async fn get_emotion_patterns(&self, user_id: &str) -> Result<Vec<EmotionCount>> {
        let q = query(
            r#"
            MATCH (u:User {uid: $user_id})-[:HAS_RECORD]->(r:EmotionRecord)
            WITH r.emotion AS emotion, count(*) AS count
            ORDER BY count DESC
            RETURN emotion, count
            LIMIT 5
            "#,
        )
        .param("user_id", user_id);

        let rows = self.execute(q).await.inspect_err(|e| {
            tracing::error!("Error getting emotion patterns: {}", e);
        })?;

        rows.iter()
            .map(|row| {
                Ok(EmotionCount {
                    emotion: row.get("emotion")?,
                    count: row.get("count")?,
                })
            })
            .collect()
    }

    /// Apply a partial update; returns None for an unknown id.
    pub async fn update_emotion_record(
        &self,
        record_id: Uuid,
        updates: &UpdateEmotionRecordRequest,
    ) -> Result<Option<EmotionRecord>> {
        let mut set_clauses = vec!["r.updated_at = datetime()"];

        if updates.title.is_some() {
            set_clauses.push("r.title = $title");
        }
        if updates.situation_description.is_some() {
            set_clauses.push("r.situation_description = $situation_description");
        }
        if updates.emotion.is_some() {
            set_clauses.push("r.emotion = $emotion");
        }
        if updates.underlying_belief.is_some() {
            set_clauses.push("r.underlying_belief = $underlying_belief");
        }
        if updates.timestamp.is_some() {
            set_clauses.push("r.timestamp = datetime($timestamp)");
        }

        let cypher = format!(
            "MATCH (r:EmotionRecord {{id: $record_id}}) SET {} RETURN r",
            set_clauses.join(", ")
        );

        let mut q = query(&cypher).param("record_id", record_id.to_string());
        if let Some(title) = &updates.title {
            q = q.param("title", title.clone());
        }
        if let Some(desc) = &updates.situation_description {
            q = q.param("situation_description", desc.clone());
        }
        if let Some(emotion) = &updates.emotion {
            q = q.param("emotion", emotion.clone());
        }
        if let Some(belief) = &updates.underlying_belief {
            q = q.param("underlying_belief", belief.clone());
        }
        if let Some(ts) = &updates.timestamp {
            q = q.param("timestamp", ts.to_rfc3339());
        }

        let rows = self.execute(q).await.inspect_err(|e| {
            tracing::error!("Error updating emotion record: {}", e);
        })?;

        match rows.first() {
            Some(row) => {
                let node: Node = row.get("r")?;
                Ok(Some(node_to_emotion_record(&node)?))
            }
            None => Ok(None),
        }
    }

    /// Delete an emotion record; the flag comes from the deletion count.
    pub async fn delete_emotion_record(&self, record_id: Uuid) -> Result<bool> {
        let q = query(
            r#"
            MATCH (r:EmotionRecord {id: $record_id})
            DETACH DELETE r
            RETURN count(r) AS deleted
            "#,
        )
        .param("record_id", record_id.to_string());

        let rows = self.execute(q).await.inspect_err(|e| {
            tracing::error!("Error deleting emotion record: {}", e);
        })?;

        let deleted: i64 = match rows.first() {
            Some(row) => row.get("deleted")?,
            None => 0,
        };
        Ok(deleted > 0)
    }
}

// ============================================================================
// Node mappers
// ============================================================================

fn optional_string(node: &Node, key: &str) -> Option<String> {
    node.get::<String>(key)
        .ok()
        .filter(|s| !s.is_empty())
}

fn parse_datetime(node: &Node, key: &str) -> Result<DateTime<Utc>> {
    // Bolt temporal values deserialize directly; plain string properties
    // parse as RFC 3339.
    if let Ok(dt) = node.get::<DateTime<chrono::FixedOffset>>(key) {
        return Ok(dt.with_timezone(&Utc));
    }
    let raw: String = node
        .get(key)
        .with_context(|| format!("missing datetime property `{}`", key))?;
    let parsed = DateTime::parse_from_rfc3339(&raw)
        .with_context(|| format!("unparseable datetime `{}` in `{}`", raw, key))?;
    Ok(parsed.with_timezone(&Utc))
}

fn node_to_user(node: &Node) -> Result<User> {
    Ok(User {
        uid: node.get("uid")?,
        email: node.get("email")?,
        name: optional_string(node, "name"),
        photo_url: optional_string(node, "photo_url"),
        created_at: parse_datetime(node, "created_at").unwrap_or_else(|_| Utc::now()),
    })
}

fn node_to_emotion(node: &Node) -> Result<Emotion> {
    Ok(Emotion {
        id: node.get::<String>("id")?.parse()?,
        name: node.get("name")?,
        description: optional_string(node, "description"),
    })
}

fn node_to_symptom(node: &Node) -> Result<Symptom> {
    Ok(Symptom {
        name: node.get("name")?,
        description: optional_string(node, "description"),
    })
}

fn node_to_thought_record(node: &Node) -> Result<ThoughtRecord> {
    Ok(ThoughtRecord {
        id: node.get::<String>("id")?.parse()?,
        user_id: node.get("user_id")?,
        timestamp: parse_datetime(node, "timestamp")?,
        title: optional_string(node, "title"),
        situation_description: optional_string(node, "situation_description"),
        emotion: node.get("emotion")?,
        underlying_belief: optional_string(node, "underlying_belief"),
        symptoms: node.get("symptoms").unwrap_or_default(),
        created_at: parse_datetime(node, "created_at").unwrap_or_else(|_| Utc::now()),
        updated_at: parse_datetime(node, "updated_at").unwrap_or_else(|_| Utc::now()),
    })
}

fn node_to_emotion_record(node: &Node) -> Result<EmotionRecord> {
    Ok(EmotionRecord {
        id: node.get::<String>("id")?.parse()?,
        user_id: node.get("user_id")?,
        timestamp: parse_datetime(node, "timestamp")?,
        title: optional_string(node, "title"),
        situation_description: optional_string(node, "situation_description"),
        emotion: node.get("emotion")?,
        underlying_belief: optional_string(node, "underlying_belief"),
        created_at: parse_datetime(node, "created_at").unwrap_or_else(|_| Utc::now()),
        updated_at: parse_datetime(node, "updated_at").unwrap_or_else(|_| Utc::now()),
    })
}

// ============================================================================
// Tests
// ============================================================================
