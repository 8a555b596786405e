use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization, Cookie};

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::User;

pub const SESSION_COOKIE: &str = "session_token";

/// Raw session token carried by the request, if any.
#[derive(Debug, Clone, Default)]
pub struct SessionToken(pub Option<String>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Ok(TypedHeader(cookie)) = TypedHeader::<Cookie>::from_request_parts(parts, state).await {
            if let Some(token) = cookie.get(SESSION_COOKIE).filter(|t| !t.is_empty()) {
                return Ok(Self(Some(token.to_string())));
            }
        }

        let bearer = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
            .filter(|t| !t.is_empty());

        Ok(Self(bearer))
    }
}

/// Signed-in user; rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let OptionalUser(user) = OptionalUser::from_request_parts(parts, state).await?;
        user.map(Self).ok_or(ApiError::Unauthorized)
    }
}

/// Signed-in user when there is one. Public reads use this.
#[derive(Debug, Clone, Default)]
pub struct OptionalUser(pub Option<User>);

#[axum::async_trait]
impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let SessionToken(token) = SessionToken::from_request_parts(parts, state)
            .await
            .unwrap_or_default();
        Ok(Self(state.auth.current_user(token.as_deref()).await?))
    }
}

pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!(
        "{SESSION_COOKIE}={token}; HttpOnly; Secure; SameSite=None; Path=/; Max-Age={max_age_secs}"
    )
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; Secure; SameSite=None; Path=/; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn token_of(request: Request<()>) -> Option<String> {
        let (mut parts, _) = request.into_parts();
        SessionToken::from_request_parts(&mut parts, &())
            .await
            .unwrap_or_default()
            .0
    }

    #[tokio::test]
    async fn cookie_wins_over_bearer() {
        let request = Request::builder()
            .header("cookie", "theme=dark; session_token=from-cookie")
            .header("authorization", "Bearer from-header")
            .body(())
            .unwrap();

        assert_eq!(token_of(request).await.as_deref(), Some("from-cookie"));
    }

    #[tokio::test]
    async fn bearer_is_the_fallback() {
        let request = Request::builder()
            .header("authorization", "Bearer from-header")
            .body(())
            .unwrap();

        assert_eq!(token_of(request).await.as_deref(), Some("from-header"));
    }

    #[tokio::test]
    async fn no_credentials_means_no_token() {
        let request = Request::builder().body(()).unwrap();
        assert_eq!(token_of(request).await, None);
    }

    #[test]
    fn session_cookie_is_cross_site_and_http_only() {
        let cookie = session_cookie("abc", 604800);
        assert!(cookie.starts_with("session_token=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=None"));
        assert!(cookie.contains("Max-Age=604800"));
    }
}
