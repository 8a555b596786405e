use axum::Json;

use crate::models::{TemplateDescriptor, TemplateId};

pub async fn list_templates() -> Json<Vec<TemplateDescriptor>> {
    Json(TemplateId::catalog())
}
