//! Environment-driven configuration

use std::env;

use thiserror::Error;

mod identity;
mod payment;

pub use identity::IdentityConfig;
pub use payment::RazorpayConfig;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_SESSION_TTL_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    NotANumber { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    /// No url means records live in process memory.
    pub database_url: Option<String>,
    pub cors_allowed_origins: Vec<String>,
    /// Origin of the web app, used for share links and the sign-in return leg.
    pub public_app_url: String,
    pub session_ttl_days: i64,
    pub identity: IdentityConfig,
    pub razorpay: RazorpayConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            port: parse_var("PORT", DEFAULT_PORT)?,
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
            cors_allowed_origins,
            public_app_url: env::var("PUBLIC_APP_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            session_ttl_days: parse_var("SESSION_TTL_DAYS", DEFAULT_SESSION_TTL_DAYS)?,
            identity: IdentityConfig::from_env(),
            razorpay: RazorpayConfig::from_env(),
        })
    }

    /// Configuration for tests and local runs without any environment.
    pub fn local() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
            public_app_url: "http://localhost:3000".to_string(),
            session_ttl_days: DEFAULT_SESSION_TTL_DAYS,
            identity: IdentityConfig::default(),
            razorpay: RazorpayConfig::default(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::NotANumber { name, value }),
        Err(_) => Ok(default),
    }
}
