//! Route definitions for the Cupid's Prank API

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::app_state::AppState;
use crate::handlers::*;

// Auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/session", post(create_session))
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))
}

// Template routes
pub fn template_routes() -> Router<AppState> {
    Router::new().route("/api/templates", get(list_templates))
}

// Valentine routes
pub fn valentine_routes() -> Router<AppState> {
    Router::new()
        .route("/api/valentines", post(create_valentine).get(list_valentines))
        .route("/api/valentines/:id", get(get_valentine))
        .route("/api/valentines/:id/response", post(record_response))
}

// Payment routes
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/api/payment/pricing", post(pricing))
        .route("/api/payment/create-order", post(create_order))
        .route("/api/payment/verify", post(verify_payment))
}

/// Full application router with tracing and CORS.
pub fn build_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.cors_allowed_origins);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(auth_routes())
        .merge(template_routes())
        .merge(valentine_routes())
        .merge(payment_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    // Credentialed CORS rejects wildcards, so everything is listed.
    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-session-id"),
        ])
        .allow_credentials(true)
}
