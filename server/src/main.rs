//! Cupid's Prank Backend Server
//!
//! Serves valentine drafts, the public recipient view, checkout through the
//! hosted payment gateway and sign-in through the external identity provider.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cupid_server::app_state::AppState;
use cupid_server::config::AppConfig;
use cupid_server::routes::build_router;
use cupid_server::services::{HttpIdentityProvider, RazorpayGateway};
use cupid_server::store::{MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cupid_server=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => Arc::new(PgStore::connect(url).await.context("database unavailable")?),
        None => {
            warn!("DATABASE_URL not set; records are kept in memory and lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    if !config.razorpay.is_configured() {
        warn!("Razorpay credentials missing; checkout will be unavailable");
    }

    let identity = Arc::new(HttpIdentityProvider::new(config.identity.session_url.clone()));
    let gateway = Arc::new(RazorpayGateway::new(config.razorpay.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = build_router(AppState::new(config, store, identity, gateway));

    info!("Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
