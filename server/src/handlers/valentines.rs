use axum::{
    extract::{Path, State},
    Json,
};

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::middleware::{AuthenticatedUser, OptionalUser};
use crate::models::{CreateValentineRequest, MessageResponse, RecordResponseRequest, Valentine};

pub async fn create_valentine(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(request): Json<CreateValentineRequest>,
) -> Result<Json<Valentine>, ApiError> {
    let valentine = state.valentines.create(&user, request).await?;
    Ok(Json(valentine))
}

pub async fn list_valentines(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<Valentine>>, ApiError> {
    Ok(Json(state.valentines.list(&user).await?))
}

/// Public read used by the recipient link
pub async fn get_valentine(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    Path(id): Path<String>,
) -> Result<Json<Valentine>, ApiError> {
    let valentine = state.valentines.get_for_viewer(&id, viewer.as_ref()).await?;
    Ok(Json(valentine))
}

pub async fn record_response(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RecordResponseRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let ack = state.valentines.record_response(&id, &request.response).await?;
    Ok(Json(ack))
}
