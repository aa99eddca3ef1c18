//! Authentication — identity-provider token verification + user provisioning
//!
//! Provides:
//! - `TokenVerifier` trait and the Firebase implementation (`firebase` submodule)
//! - `require_auth` middleware that verifies the bearer token and
//!   resolves-or-creates the local user (`middleware` submodule)
//! - `CurrentUser` extractor for handlers (`extractor` submodule)

pub mod extractor;
pub mod firebase;
pub mod middleware;

pub use extractor::CurrentUser;
pub use firebase::{FirebaseConfig, FirebaseTokenVerifier};
pub use middleware::require_auth;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Claims extracted from a verified identity-provider token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// The provider's stable subject id.
    pub uid: String,
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

/// Verifies an opaque bearer credential against the identity provider.
///
/// Failure is opaque on purpose: callers surface a generic
/// authentication error without distinguishing expired from malformed.
#[async_trait::async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<TokenClaims>;
}
