use std::env;

const DEFAULT_API_URL: &str = "https://api.razorpay.com/v1";

/// Hosted payment gateway credentials
#[derive(Clone, Debug)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub api_url: String,
}

impl Default for RazorpayConfig {
    fn default() -> Self {
        Self {
            key_id: String::new(),
            key_secret: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl RazorpayConfig {
    pub fn from_env() -> Self {
        Self {
            key_id: env::var("RAZORPAY_KEY_ID").unwrap_or_default(),
            key_secret: env::var("RAZORPAY_KEY_SECRET").unwrap_or_default(),
            api_url: env::var("RAZORPAY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.key_id.trim().is_empty() && !self.key_secret.trim().is_empty()
    }
}
