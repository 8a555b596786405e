//! Valentine service layer - drafts, listing, public reads and responses

use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::error::ApiError;
use crate::models::{
    Answer, CreateValentineRequest, MessageResponse, TemplateId, User, Valentine,
    DEMO_VALENTINE_ID,
};
use crate::store::Store;

pub struct ValentineService {
    store: Arc<dyn Store>,
}

impl ValentineService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    #[tracing::instrument(name = "Create valentine", skip_all, fields(user_id = %user.user_id))]
    pub async fn create(
        &self,
        user: &User,
        request: CreateValentineRequest,
    ) -> Result<Valentine, ApiError> {
        request.validate()?;

        let template_id: TemplateId = request
            .template_id
            .parse()
            .map_err(|e: crate::models::UnknownTemplate| ApiError::InvalidRequest(e.to_string()))?;

        let valentine = Valentine::draft(&user.user_id, request, template_id);
        self.store.insert_valentine(&valentine).await?;

        tracing::info!(valentine_id = %valentine.valentine_id, template = %template_id, "valentine drafted");
        Ok(valentine)
    }

    pub async fn list(&self, user: &User) -> Result<Vec<Valentine>, ApiError> {
        Ok(self.store.list_valentines(&user.user_id).await?)
    }

    /// Public read. Drafts stay hidden from everyone but their owner.
    pub async fn get_for_viewer(
        &self,
        id: &str,
        viewer: Option<&User>,
    ) -> Result<Valentine, ApiError> {
        if id == DEMO_VALENTINE_ID {
            return Ok(Valentine::demo());
        }

        let valentine = self
            .store
            .get_valentine(id)
            .await?
            .ok_or(ApiError::NotFound("Valentine"))?;

        let is_owner = viewer.is_some_and(|user| user.user_id == valentine.user_id);
        if !valentine.is_paid() && !is_owner {
            return Err(ApiError::NotFound("Valentine"));
        }

        Ok(valentine)
    }

    /// Records the recipient's answer. Only the first answer is kept.
    #[tracing::instrument(name = "Record response", skip(self))]
    pub async fn record_response(&self, id: &str, raw: &str) -> Result<MessageResponse, ApiError> {
        let answer = match raw.trim() {
            "yes" => Answer::Yes,
            _ => {
                return Err(ApiError::InvalidRequest(
                    "Response must be \"yes\"".to_string(),
                ))
            }
        };

        if id == DEMO_VALENTINE_ID {
            return Ok(MessageResponse::new("Response recorded"));
        }

        let valentine = self
            .store
            .get_valentine(id)
            .await?
            .filter(Valentine::is_paid)
            .ok_or(ApiError::NotFound("Valentine"))?;

        if self
            .store
            .record_response(&valentine.valentine_id, answer, Utc::now())
            .await?
        {
            tracing::info!(answer = answer.as_str(), "valentine answered");
            Ok(MessageResponse::new("Response recorded"))
        } else {
            Ok(MessageResponse::new("Response already recorded"))
        }
    }
}
