//! Cupid's Prank Backend Library
//!
//! Exports the interaction engine, the typed client flows and the HTTP
//! backend that serves them.

pub mod app_state;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
