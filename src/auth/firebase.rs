//! Firebase token verification
//!
//! Verifies ID tokens server-side through the Identity Toolkit
//! `accounts:lookup` endpoint. The caller hands over the opaque bearer
//! credential; a successful response yields the subject id and profile
//! claims, any failure stays opaque.

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use super::{TokenClaims, TokenVerifier};

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1/accounts:lookup";

/// Firebase project credentials.
///
/// Loaded from the environment at startup:
/// - production (`ENVIRONMENT=production`): inline JSON blob in
///   `FIREBASE_CREDENTIALS_JSON`
/// - development: path to a JSON file in `FIREBASE_CREDENTIALS`
#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseConfig {
    pub project_id: String,
    pub api_key: String,
}

impl FirebaseConfig {
    /// Load credentials according to the `ENVIRONMENT` flag.
    pub fn from_env() -> Result<Self> {
        if is_production() {
            let blob = std::env::var("FIREBASE_CREDENTIALS_JSON")
                .context("FIREBASE_CREDENTIALS_JSON is not set")?;
            Self::from_json(&blob)
        } else {
            let path = std::env::var("FIREBASE_CREDENTIALS")
                .context("FIREBASE_CREDENTIALS is not set")?;
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read Firebase credentials at {}", path))?;
            Self::from_json(&contents)
        }
    }

    /// Parse a credentials JSON blob.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse Firebase credentials JSON")
    }
}

/// True when the process runs with production credential loading.
pub fn is_production() -> bool {
    std::env::var("ENVIRONMENT").as_deref() == Ok("production")
}

/// Identity Toolkit lookup response (subset of fields we need).
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    photo_url: Option<String>,
}

/// Token verifier backed by the Firebase Identity Toolkit API.
pub struct FirebaseTokenVerifier {
    api_key: String,
    lookup_url: String,
    http_client: reqwest::Client,
}

impl FirebaseTokenVerifier {
    /// Create a verifier from project credentials.
    pub fn new(config: &FirebaseConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            lookup_url: IDENTITY_TOOLKIT_URL.to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Create a verifier pointed at a custom endpoint (tests).
    #[cfg(test)]
    pub fn with_lookup_url(config: &FirebaseConfig, lookup_url: &str) -> Self {
        Self {
            api_key: config.api_key.clone(),
            lookup_url: lookup_url.to_string(),
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl TokenVerifier for FirebaseTokenVerifier {
    async fn verify(&self, token: &str) -> Result<TokenClaims> {
        let response = self
            .http_client
            .post(format!("{}?key={}", self.lookup_url, self.api_key))
            .json(&serde_json::json!({ "idToken": token }))
            .send()
            .await
            .context("Failed to reach the identity provider")?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::debug!("Token verification rejected ({})", status);
            bail!("Token verification failed ({})", status);
        }

        let lookup: LookupResponse = response
            .json()
            .await
            .context("Failed to parse identity-provider response")?;

        let user = match lookup.users.into_iter().next() {
            Some(user) => user,
            None => bail!("Token verification returned no matching account"),
        };

        Ok(TokenClaims {
            uid: user.local_id,
            email: user.email.unwrap_or_default(),
            name: user.display_name,
            photo_url: user.photo_url,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
