//! Identity resolution for owner-facing screens

use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::Url;

use super::api::{Api, ClientError};
use super::route::{Navigation, Route};
use crate::models::User;

/// Identity for one protected navigation, fetched at most once.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub user: User,
}

pub struct AuthGate;

impl AuthGate {
    /// Uses the carried identity when there is one, otherwise asks the
    /// backend. Any failure sends the visitor to `/login`.
    pub async fn resolve(api: &dyn Api, carried: Option<User>) -> Navigation<RequestContext> {
        if let Some(user) = carried {
            return Navigation::Show(RequestContext { user });
        }

        match api.me().await {
            Ok(user) => Navigation::Show(RequestContext { user }),
            Err(ClientError::Unauthorized) => Navigation::Redirect(Route::Login),
            Err(e) => {
                tracing::warn!(error = %e, "identity check failed");
                Navigation::Redirect(Route::Login)
            }
        }
    }
}

/// Hosted sign-in page with the fixed return address.
pub fn sign_in_url(login_url: &str, origin: &str) -> Result<Url, ClientError> {
    let redirect = format!("{}{}", origin.trim_end_matches('/'), Route::Dashboard);
    Url::parse_with_params(login_url, &[("redirect", redirect)])
        .map_err(|e| ClientError::InvalidUrl(e.to_string()))
}

/// `session_id` from a return-leg fragment such as `#session_id=abc`.
pub fn session_id_from_fragment(fragment: &str) -> Option<String> {
    fragment
        .trim_start_matches('#')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "session_id")
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallbackOutcome {
    /// Lands on the dashboard with the identity already known.
    SignedIn(User),
    Failed,
    /// The exchange already ran for this page load.
    AlreadyHandled,
}

impl CallbackOutcome {
    pub fn route(&self) -> Option<Route> {
        match self {
            CallbackOutcome::SignedIn(_) => Some(Route::Dashboard),
            CallbackOutcome::Failed => Some(Route::Login),
            CallbackOutcome::AlreadyHandled => None,
        }
    }
}

/// Return leg of the sign-in redirect. One per page load.
#[derive(Debug, Default)]
pub struct AuthCallback {
    exchanged: AtomicBool,
}

impl AuthCallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exchanges the one-time session id for a session cookie. Later calls
    /// are no-ops since the provider rejects a replayed id.
    pub async fn complete(&self, api: &dyn Api, fragment: &str) -> CallbackOutcome {
        if self.exchanged.swap(true, Ordering::SeqCst) {
            return CallbackOutcome::AlreadyHandled;
        }

        let Some(session_id) = session_id_from_fragment(fragment) else {
            tracing::warn!("sign-in return without a session id");
            return CallbackOutcome::Failed;
        };

        match api.exchange_session(&session_id).await {
            Ok(user) => CallbackOutcome::SignedIn(user),
            Err(e) => {
                tracing::warn!(error = %e, "session exchange failed");
                CallbackOutcome::Failed
            }
        }
    }
}
