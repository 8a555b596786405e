//! Data models for the Cupid's Prank backend

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use validator::{Validate, ValidationError};

pub mod auth;
pub mod payment;
pub use auth::*;
pub use payment::*;

/// Id reserved for the public demo valentine.
pub const DEMO_VALENTINE_ID: &str = "demo";

/// The five interaction scripts a valentine can be played through.
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "template_kind", rename_all = "snake_case")]
pub enum TemplateId {
    RunawayNo,
    EmotionalDamage,
    GuiltTrip,
    PuppyEyes,
    DestinyMode,
}

impl TemplateId {
    pub const ALL: [TemplateId; 5] = [
        TemplateId::RunawayNo,
        TemplateId::EmotionalDamage,
        TemplateId::GuiltTrip,
        TemplateId::PuppyEyes,
        TemplateId::DestinyMode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::RunawayNo => "runaway_no",
            TemplateId::EmotionalDamage => "emotional_damage",
            TemplateId::GuiltTrip => "guilt_trip",
            TemplateId::PuppyEyes => "puppy_eyes",
            TemplateId::DestinyMode => "destiny_mode",
        }
    }

    pub fn descriptor(&self) -> TemplateDescriptor {
        let (name, description, interaction_type) = match self {
            TemplateId::RunawayNo => (
                "The Runaway No",
                "The No button runs away from the cursor!",
                "runaway",
            ),
            TemplateId::EmotionalDamage => (
                "Emotional Damage",
                "Sad messages and dimming screen when hovering No",
                "emotional",
            ),
            TemplateId::GuiltTrip => (
                "Guilt Trip Deluxe",
                "Each No click makes Yes bigger and messages more dramatic",
                "guilt",
            ),
            TemplateId::PuppyEyes => (
                "Puppy Eyes Mode",
                "Cute puppy appears with big watery eyes",
                "puppy",
            ),
            TemplateId::DestinyMode => (
                "Destiny Mode",
                "Loading screen shows you're meant to say YES",
                "destiny",
            ),
        };

        TemplateDescriptor {
            template_id: *self,
            name: name.to_string(),
            description: description.to_string(),
            interaction_type: interaction_type.to_string(),
        }
    }

    /// Static catalog served by `GET /api/templates`.
    pub fn catalog() -> Vec<TemplateDescriptor> {
        Self::ALL.iter().map(TemplateId::descriptor).collect()
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown template: {0}")]
pub struct UnknownTemplate(pub String);

impl FromStr for TemplateId {
    type Err = UnknownTemplate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownTemplate(s.to_string()))
    }
}

/// Read-only template catalog entry
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TemplateDescriptor {
    pub template_id: TemplateId,
    pub name: String,
    pub description: String,
    pub interaction_type: String,
}

/// Payment status of a valentine
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
}

/// Terminal answer a recipient can record. Every template converges on yes.
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "valentine_answer", rename_all = "lowercase")]
pub enum Answer {
    Yes,
}

impl Answer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Answer::Yes => "yes",
        }
    }
}

/// Valentine record
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct Valentine {
    pub valentine_id: String,
    pub user_id: String,
    pub template_id: TemplateId,
    pub from_name: String,
    pub to_name: String,
    pub message: String,
    pub emoji_style: String,
    pub background_theme: String,
    pub unique_link: String,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default, skip_serializing)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub response: Option<Answer>,
    #[serde(default)]
    pub response_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Valentine {
    /// Draft record as stored right after creation.
    pub fn draft(user_id: &str, request: CreateValentineRequest, template_id: TemplateId) -> Self {
        let valentine_id = format!("val_{}", short_hex_id());

        Self {
            unique_link: valentine_id.clone(),
            valentine_id,
            user_id: user_id.to_string(),
            template_id,
            from_name: request.from_name.trim().to_string(),
            to_name: request.to_name.trim().to_string(),
            message: request.message,
            emoji_style: request.emoji_style,
            background_theme: request.background_theme,
            payment_status: PaymentStatus::Pending,
            payment_id: None,
            order_id: None,
            response: None,
            response_at: None,
            created_at: Utc::now(),
        }
    }

    /// Fixed record behind `/v/demo`.
    pub fn demo() -> Self {
        Self {
            valentine_id: DEMO_VALENTINE_ID.to_string(),
            user_id: "demo_user".to_string(),
            template_id: TemplateId::RunawayNo,
            from_name: "Alex".to_string(),
            to_name: "You".to_string(),
            message: "I've been wanting to ask you this for so long... Will you be my Valentine? 💕"
                .to_string(),
            emoji_style: default_emoji_style(),
            background_theme: default_background_theme(),
            unique_link: DEMO_VALENTINE_ID.to_string(),
            payment_status: PaymentStatus::Completed,
            payment_id: Some("demo_payment".to_string()),
            order_id: None,
            response: None,
            response_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Completed
    }

    pub fn is_answered(&self) -> bool {
        self.response.is_some()
    }
}

/// 12 lowercase hex chars, URL-safe.
pub fn short_hex_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(12);
    id
}

fn default_emoji_style() -> String {
    "cute".to_string()
}

fn default_background_theme() -> String {
    "pink".to_string()
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Request DTO for creating a valentine draft
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct CreateValentineRequest {
    #[validate(custom = "not_blank")]
    pub from_name: String,
    #[validate(custom = "not_blank")]
    pub to_name: String,
    #[validate(custom = "not_blank")]
    pub message: String,
    pub template_id: String,
    #[serde(default = "default_emoji_style")]
    pub emoji_style: String,
    #[serde(default = "default_background_theme")]
    pub background_theme: String,
}

/// Body of `POST /api/valentines/{id}/response`
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordResponseRequest {
    pub response: String,
}

/// Plain acknowledgement body
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_ids_round_trip_through_their_wire_names() {
        for id in TemplateId::ALL {
            assert_eq!(id.as_str().parse::<TemplateId>().unwrap(), id);
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
        assert!("runaway".parse::<TemplateId>().is_err());
    }

    #[test]
    fn catalog_lists_all_five_templates_in_order() {
        let catalog = TemplateId::catalog();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog[0].name, "The Runaway No");
        assert_eq!(catalog[4].interaction_type, "destiny");
    }

    #[test]
    fn blank_fields_fail_validation() {
        let request = CreateValentineRequest {
            from_name: "Sam".to_string(),
            to_name: "   ".to_string(),
            message: "Be mine?".to_string(),
            template_id: "guilt_trip".to_string(),
            emoji_style: default_emoji_style(),
            background_theme: default_background_theme(),
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("to_name"));
    }

    #[test]
    fn drafts_start_pending_and_unanswered() {
        let request = CreateValentineRequest {
            from_name: " Sam ".to_string(),
            to_name: "Kit".to_string(),
            message: "Be mine?".to_string(),
            template_id: "guilt_trip".to_string(),
            emoji_style: default_emoji_style(),
            background_theme: default_background_theme(),
        };

        let draft = Valentine::draft("user_1", request, TemplateId::GuiltTrip);
        assert!(draft.valentine_id.starts_with("val_"));
        assert_eq!(draft.valentine_id.len(), 16);
        assert_eq!(draft.unique_link, draft.valentine_id);
        assert_eq!(draft.from_name, "Sam");
        assert_eq!(draft.payment_status, PaymentStatus::Pending);
        assert!(!draft.is_answered());
    }
}
