//! Persistence for users, sessions and valentine records

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{Answer, IdentityProfile, User, UserSession, Valentine};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("duplicate key: {0}")]
    Duplicate(String),
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts a user keyed by email, or refreshes name and picture of the
    /// existing one.
    async fn upsert_user(&self, profile: &IdentityProfile) -> Result<User, StoreError>;

    async fn create_session(&self, session: &UserSession) -> Result<(), StoreError>;

    /// The session's user, if the token is known and not expired at `now`.
    async fn user_for_session(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, StoreError>;

    async fn delete_session(&self, token: &str) -> Result<(), StoreError>;

    async fn insert_valentine(&self, valentine: &Valentine) -> Result<(), StoreError>;

    async fn get_valentine(&self, id: &str) -> Result<Option<Valentine>, StoreError>;

    /// Newest first.
    async fn list_valentines(&self, user_id: &str) -> Result<Vec<Valentine>, StoreError>;

    async fn attach_order(&self, id: &str, order_id: &str) -> Result<(), StoreError>;

    /// Marks the record completed. Returns false if the record is unknown.
    async fn mark_paid(&self, id: &str, payment_id: &str) -> Result<bool, StoreError>;

    /// Records the answer unless one is already set. Returns true only when
    /// this call wrote it.
    async fn record_response(
        &self,
        id: &str,
        answer: Answer,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;
}
