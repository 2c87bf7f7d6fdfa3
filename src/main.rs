// ============================================================================
// CRM Edge Gateway Service
// ============================================================================
//
// Single entry point in front of the CRM backends:
// - GET /all     - streamed customer/profile join
// - POST /graphql - same join as a field resolver
// - GET /proxy   - forwarded to the customer service
// - GET /health  - liveness probe
//
// ============================================================================

use anyhow::{Context, Result};
use crm_edge::clients::{CustomerHttpClient, ProfileSocketClient};
use crm_edge::config::Config;
use crm_edge::context::AppContext;
use crm_edge::crm::Crm;
use crm_edge::routes::create_router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Arc::new(Config::from_env()?);

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.rust_log.clone()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("=== CRM Edge Gateway Starting ===");
    info!("Port: {}", config.port);
    info!("Customer service: {}", config.customers_url);
    info!("Profile service: {}", config.profiles_addr);
    info!("Profile timeout: {}s", config.profile_timeout_secs);

    // Shared outbound HTTP client (customer list + proxy route)
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .context("Failed to create HTTP client")?;

    // Wire the aggregator to the production backends
    let customers = Arc::new(CustomerHttpClient::with_client(
        http.clone(),
        config.customers_url.clone(),
    ));
    let profiles = Arc::new(ProfileSocketClient::new(
        config.profiles_addr.clone(),
        Duration::from_secs(config.profile_timeout_secs),
    ));
    let crm = Crm::new(customers, profiles);

    let ctx = Arc::new(AppContext::new(config.clone(), crm, http));
    let app = create_router(ctx);

    // Start server
    let addr: SocketAddr = format!("0.0.0.0:{}", config.port)
        .parse()
        .context("Failed to parse bind address")?;

    info!("CRM edge gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
