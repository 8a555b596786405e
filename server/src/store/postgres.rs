use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};

use super::{Store, StoreError};
use crate::models::{short_hex_id, Answer, IdentityProfile, PaymentStatus, User, UserSession, Valentine};

const VALENTINE_COLUMNS: &str = r#"
    valentine_id, user_id, template_id, from_name, to_name, message,
    emoji_style, background_theme, unique_link, payment_status, payment_id,
    order_id, response, response_at, created_at
"#;

/// Postgres-backed store
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        tracing::info!("Connecting to database");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        let store = Self::new(pool);
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        tracing::info!("Running database migrations...");

        for statement in [
            r#"
            DO $$ BEGIN
                CREATE TYPE template_kind AS ENUM
                    ('runaway_no', 'emotional_damage', 'guilt_trip', 'puppy_eyes', 'destiny_mode');
            EXCEPTION WHEN duplicate_object THEN NULL;
            END $$
            "#,
            r#"
            DO $$ BEGIN
                CREATE TYPE payment_status AS ENUM ('pending', 'completed');
            EXCEPTION WHEN duplicate_object THEN NULL;
            END $$
            "#,
            r#"
            DO $$ BEGIN
                CREATE TYPE valentine_answer AS ENUM ('yes');
            EXCEPTION WHEN duplicate_object THEN NULL;
            END $$
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS users (
                user_id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                picture TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS user_sessions (
                session_token TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
                expires_at TIMESTAMPTZ NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS valentines (
                valentine_id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(user_id),
                template_id template_kind NOT NULL,
                from_name TEXT NOT NULL,
                to_name TEXT NOT NULL,
                message TEXT NOT NULL,
                emoji_style TEXT NOT NULL,
                background_theme TEXT NOT NULL,
                unique_link TEXT NOT NULL,
                payment_status payment_status NOT NULL DEFAULT 'pending',
                payment_id TEXT,
                order_id TEXT,
                response valentine_answer,
                response_at TIMESTAMPTZ,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_valentines_user ON valentines(user_id, created_at DESC)",
        ] {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        tracing::info!("Migrations complete");
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn upsert_user(&self, profile: &IdentityProfile) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_id, email, name, picture, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (email) DO UPDATE
                SET name = EXCLUDED.name, picture = EXCLUDED.picture
            RETURNING user_id, email, name, picture, created_at
            "#,
        )
        .bind(format!("user_{}", short_hex_id()))
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(&profile.picture)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_session(&self, session: &UserSession) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO user_sessions (session_token, user_id, expires_at, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (session_token) DO UPDATE SET expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(&session.session_token)
        .bind(&session.user_id)
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn user_for_session(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.user_id, u.email, u.name, u.picture, u.created_at
            FROM user_sessions s
            JOIN users u ON u.user_id = s.user_id
            WHERE s.session_token = $1 AND s.expires_at > $2
            "#,
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete_session(&self, token: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM user_sessions WHERE session_token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_valentine(&self, valentine: &Valentine) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO valentines (
                valentine_id, user_id, template_id, from_name, to_name, message,
                emoji_style, background_theme, unique_link, payment_status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (valentine_id) DO NOTHING
            "#,
        )
        .bind(&valentine.valentine_id)
        .bind(&valentine.user_id)
        .bind(valentine.template_id)
        .bind(&valentine.from_name)
        .bind(&valentine.to_name)
        .bind(&valentine.message)
        .bind(&valentine.emoji_style)
        .bind(&valentine.background_theme)
        .bind(&valentine.unique_link)
        .bind(PaymentStatus::Pending)
        .bind(valentine.created_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Duplicate(valentine.valentine_id.clone()));
        }
        Ok(())
    }

    async fn get_valentine(&self, id: &str) -> Result<Option<Valentine>, StoreError> {
        let valentine = sqlx::query_as::<_, Valentine>(&format!(
            "SELECT {VALENTINE_COLUMNS} FROM valentines WHERE valentine_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(valentine)
    }

    async fn list_valentines(&self, user_id: &str) -> Result<Vec<Valentine>, StoreError> {
        let valentines = sqlx::query_as::<_, Valentine>(&format!(
            "SELECT {VALENTINE_COLUMNS} FROM valentines WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(valentines)
    }

    async fn attach_order(&self, id: &str, order_id: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE valentines SET order_id = $1 WHERE valentine_id = $2")
            .bind(order_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn mark_paid(&self, id: &str, payment_id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE valentines SET payment_status = $1, payment_id = $2 WHERE valentine_id = $3",
        )
        .bind(PaymentStatus::Completed)
        .bind(payment_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_response(
        &self,
        id: &str,
        answer: Answer,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE valentines
            SET response = $1, response_at = $2
            WHERE valentine_id = $3 AND response IS NULL
            "#,
        )
        .bind(answer)
        .bind(at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
