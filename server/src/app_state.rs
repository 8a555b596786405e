//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::AppConfig;
use crate::services::{
    AuthService, IdentityProvider, PaymentGateway, PaymentService, ValentineService,
};
use crate::store::Store;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: Arc<AuthService>,
    pub valentines: Arc<ValentineService>,
    pub payments: Arc<PaymentService>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn Store>,
        identity: Arc<dyn IdentityProvider>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        let auth = AuthService::new(store.clone(), identity, config.session_ttl_days);
        let valentines = ValentineService::new(store.clone());
        let payments = PaymentService::new(store, gateway, config.razorpay.key_secret.clone());

        Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
            valentines: Arc::new(valentines),
            payments: Arc::new(payments),
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth.clone()
    }
}

impl FromRef<AppState> for Arc<ValentineService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.valentines.clone()
    }
}

impl FromRef<AppState> for Arc<PaymentService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.payments.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
