//! API handlers for the Cupid's Prank backend

pub mod auth;
pub mod payment;
pub mod templates;
pub mod valentines;

pub use auth::{create_session, logout, me};
pub use payment::{create_order, pricing, verify_payment};
pub use templates::list_templates;
pub use valentines::{create_valentine, get_valentine, list_valentines, record_response};

pub async fn root() -> &'static str {
    "Cupid's Prank API Server"
}

pub async fn health_check() -> &'static str {
    "OK"
}
