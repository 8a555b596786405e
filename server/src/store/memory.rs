use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{Store, StoreError};
use crate::models::{short_hex_id, Answer, IdentityProfile, PaymentStatus, User, UserSession, Valentine};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<String, User>,
    sessions: HashMap<String, UserSession>,
    valentines: HashMap<String, Valentine>,
}

/// Process-local store for tests and database-less runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn upsert_user(&self, profile: &IdentityProfile) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;

        if let Some(user) = tables.users.values_mut().find(|u| u.email == profile.email) {
            user.name = profile.name.clone();
            user.picture = profile.picture.clone();
            return Ok(user.clone());
        }

        let user = User {
            user_id: format!("user_{}", short_hex_id()),
            email: profile.email.clone(),
            name: profile.name.clone(),
            picture: profile.picture.clone(),
            created_at: Utc::now(),
        };
        tables.users.insert(user.user_id.clone(), user.clone());
        Ok(user)
    }

    async fn create_session(&self, session: &UserSession) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables
            .sessions
            .insert(session.session_token.clone(), session.clone());
        Ok(())
    }

    async fn user_for_session(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        let user = tables
            .sessions
            .get(token)
            .filter(|session| !session.is_expired(now))
            .and_then(|session| tables.users.get(&session.user_id))
            .cloned();
        Ok(user)
    }

    async fn delete_session(&self, token: &str) -> Result<(), StoreError> {
        self.tables.write().await.sessions.remove(token);
        Ok(())
    }

    async fn insert_valentine(&self, valentine: &Valentine) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.valentines.contains_key(&valentine.valentine_id) {
            return Err(StoreError::Duplicate(valentine.valentine_id.clone()));
        }
        tables
            .valentines
            .insert(valentine.valentine_id.clone(), valentine.clone());
        Ok(())
    }

    async fn get_valentine(&self, id: &str) -> Result<Option<Valentine>, StoreError> {
        Ok(self.tables.read().await.valentines.get(id).cloned())
    }

    async fn list_valentines(&self, user_id: &str) -> Result<Vec<Valentine>, StoreError> {
        let tables = self.tables.read().await;
        let mut valentines: Vec<Valentine> = tables
            .valentines
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        valentines.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(valentines)
    }

    async fn attach_order(&self, id: &str, order_id: &str) -> Result<(), StoreError> {
        if let Some(valentine) = self.tables.write().await.valentines.get_mut(id) {
            valentine.order_id = Some(order_id.to_string());
        }
        Ok(())
    }

    async fn mark_paid(&self, id: &str, payment_id: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(valentine) = tables.valentines.get_mut(id) else {
            return Ok(false);
        };
        valentine.payment_status = PaymentStatus::Completed;
        valentine.payment_id = Some(payment_id.to_string());
        Ok(true)
    }

    async fn record_response(
        &self,
        id: &str,
        answer: Answer,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.valentines.get_mut(id) {
            Some(valentine) if valentine.response.is_none() => {
                valentine.response = Some(answer);
                valentine.response_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::models::{CreateValentineRequest, TemplateId};

    fn profile(email: &str, name: &str) -> IdentityProfile {
        IdentityProfile {
            email: email.to_string(),
            name: name.to_string(),
            picture: None,
            session_token: "tok".to_string(),
        }
    }

    #[tokio::test]
    async fn upsert_keeps_the_user_id_for_a_known_email() {
        let store = MemoryStore::new();
        let first = store.upsert_user(&profile("a@b.c", "Ann")).await.unwrap();
        let second = store.upsert_user(&profile("a@b.c", "Annie")).await.unwrap();

        assert_eq!(first.user_id, second.user_id);
        assert_eq!(second.name, "Annie");
    }

    #[tokio::test]
    async fn expired_sessions_resolve_to_nobody() {
        let store = MemoryStore::new();
        let user = store.upsert_user(&profile("a@b.c", "Ann")).await.unwrap();
        let now = Utc::now();
        store
            .create_session(&UserSession {
                user_id: user.user_id.clone(),
                session_token: "tok".to_string(),
                expires_at: now + Duration::days(7),
                created_at: now,
            })
            .await
            .unwrap();

        assert!(store.user_for_session("tok", now).await.unwrap().is_some());
        assert!(store
            .user_for_session("tok", now + Duration::days(8))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn responses_are_written_once() {
        let store = MemoryStore::new();
        let draft = Valentine::draft(
            "user_1",
            CreateValentineRequest {
                from_name: "Sam".to_string(),
                to_name: "Kit".to_string(),
                message: "Be mine?".to_string(),
                template_id: "puppy_eyes".to_string(),
                emoji_style: "cute".to_string(),
                background_theme: "pink".to_string(),
            },
            TemplateId::PuppyEyes,
        );
        store.insert_valentine(&draft).await.unwrap();

        let first = Utc::now();
        assert!(store.record_response(&draft.valentine_id, Answer::Yes, first).await.unwrap());
        assert!(!store
            .record_response(&draft.valentine_id, Answer::Yes, first + Duration::minutes(1))
            .await
            .unwrap());

        let stored = store.get_valentine(&draft.valentine_id).await.unwrap().unwrap();
        assert_eq!(stored.response_at, Some(first));
    }
}
