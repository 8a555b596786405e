//! Identity models

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};

/// Signed-in owner, sourced from the external identity provider
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Server-side session keyed by the provider-issued token
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserSession {
    pub user_id: String,
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl UserSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Session data returned by the identity provider for a one-time session id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityProfile {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
    pub session_token: String,
}
