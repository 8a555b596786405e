use std::env;

const DEFAULT_SESSION_URL: &str = "https://demobackend.emergentagent.com/auth/v1/env/oauth/session-data";
const DEFAULT_LOGIN_URL: &str = "https://auth.emergentagent.com/";

/// External identity provider endpoints
#[derive(Clone, Debug)]
pub struct IdentityConfig {
    /// Exchanges a one-time session id for the user's session data.
    pub session_url: String,
    /// Hosted sign-in page; receives the return address as `redirect`.
    pub login_url: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            session_url: DEFAULT_SESSION_URL.to_string(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
        }
    }
}

impl IdentityConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            session_url: env::var("IDENTITY_SESSION_URL").unwrap_or(defaults.session_url),
            login_url: env::var("IDENTITY_LOGIN_URL").unwrap_or(defaults.login_url),
        }
    }
}
