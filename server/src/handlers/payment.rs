use axum::{body::Bytes, extract::State, Json};

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;
use crate::models::{
    CreateOrderRequest, MessageResponse, OrderCreated, Pricing, PricingRequest,
    VerifyPaymentRequest, DEFAULT_TIMEZONE,
};

/// Regional price list. A missing or malformed body prices as UTC.
pub async fn pricing(State(state): State<AppState>, body: Bytes) -> Json<Pricing> {
    let timezone = serde_json::from_slice::<PricingRequest>(&body)
        .map(|request| request.timezone)
        .unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string());

    Json(state.payments.pricing(&timezone))
}

pub async fn create_order(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<OrderCreated>, ApiError> {
    Ok(Json(state.payments.create_order(&user, request).await?))
}

pub async fn verify_payment(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    Ok(Json(state.payments.verify(&user, request).await?))
}
