//! Session exchange with the external identity provider

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Client;
use thiserror::Error;

use crate::error::ApiError;
use crate::models::{IdentityProfile, User, UserSession};
use crate::store::Store;

pub const SESSION_ID_HEADER: &str = "X-Session-ID";

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity provider rejected the session (status {0})")]
    Rejected(u16),

    #[error("identity provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Redeems a one-time session id. Presenting the same id twice fails.
    async fn session_data(&self, session_id: &str) -> Result<IdentityProfile, IdentityError>;
}

pub struct HttpIdentityProvider {
    http: Client,
    session_url: String,
}

impl HttpIdentityProvider {
    pub fn new(session_url: String) -> Self {
        Self {
            http: Client::new(),
            session_url,
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn session_data(&self, session_id: &str) -> Result<IdentityProfile, IdentityError> {
        let response = self
            .http
            .get(&self.session_url)
            .header(SESSION_ID_HEADER, session_id)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IdentityError::Rejected(response.status().as_u16()));
        }

        Ok(response.json::<IdentityProfile>().await?)
    }
}

/// Result of a successful sign-in exchange
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: User,
    pub session_token: String,
}

pub struct AuthService {
    store: Arc<dyn Store>,
    provider: Arc<dyn IdentityProvider>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, provider: Arc<dyn IdentityProvider>, ttl_days: i64) -> Self {
        Self {
            store,
            provider,
            session_ttl: Duration::days(ttl_days),
        }
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    #[tracing::instrument(name = "Exchange identity session", skip_all)]
    pub async fn exchange(&self, session_id: &str) -> Result<SignedIn, ApiError> {
        if session_id.trim().is_empty() {
            return Err(ApiError::InvalidRequest(format!(
                "{SESSION_ID_HEADER} header required"
            )));
        }

        let profile = self
            .provider
            .session_data(session_id)
            .await
            .map_err(|e| match e {
                IdentityError::Rejected(status) => {
                    tracing::warn!(status, "identity provider rejected session id");
                    ApiError::Unauthorized
                }
                IdentityError::Transport(e) => ApiError::Upstream(e.to_string()),
            })?;

        let user = self.store.upsert_user(&profile).await?;

        let now = Utc::now();
        self.store
            .create_session(&UserSession {
                user_id: user.user_id.clone(),
                session_token: profile.session_token.clone(),
                expires_at: now + self.session_ttl,
                created_at: now,
            })
            .await?;

        tracing::info!(user_id = %user.user_id, "user signed in");

        Ok(SignedIn {
            user,
            session_token: profile.session_token,
        })
    }

    pub async fn current_user(&self, token: Option<&str>) -> Result<Option<User>, ApiError> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };
        Ok(self.store.user_for_session(token, Utc::now()).await?)
    }

    pub async fn logout(&self, token: Option<&str>) -> Result<(), ApiError> {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.store.delete_session(token).await?;
        }
        Ok(())
    }
}
