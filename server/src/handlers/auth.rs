use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::middleware::{clear_session_cookie, session_cookie, AuthenticatedUser, SessionToken};
use crate::models::{MessageResponse, User};
use crate::services::auth::SESSION_ID_HEADER;

/// Exchange a one-time session id from the identity provider for a session cookie
pub async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let session_id = headers
        .get(SESSION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let signed_in = state.auth.exchange(session_id).await?;
    let cookie = session_cookie(
        &signed_in.session_token,
        state.auth.session_ttl().num_seconds(),
    );

    Ok(([(header::SET_COOKIE, cookie)], Json(signed_in.user)))
}

pub async fn me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}

pub async fn logout(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<impl IntoResponse, ApiError> {
    state.auth.logout(token.as_deref()).await?;

    Ok((
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(MessageResponse::new("Logged out")),
    ))
}
