//! Request extractors shared by the handlers
//!
//! Session resolution reads the `session_token` cookie first and falls
//! back to an `Authorization: Bearer` header.

mod auth;

pub use auth::{
    clear_session_cookie, session_cookie, AuthenticatedUser, OptionalUser, SessionToken,
    SESSION_COOKIE,
};
