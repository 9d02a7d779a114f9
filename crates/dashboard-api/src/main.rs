//! Virantis dashboard API
//!
//! REST API over the portfolio and threat model fixtures

use anyhow::{Context, Result};
use dashboard_api::{create_router, AppState, Config, FixtureStore};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dashboard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    info!("Starting Virantis dashboard API");
    info!("Dashboard fixture: {}", config.dashboard_fixture.display());
    info!("Threat model fixture: {}", config.threat_model_fixture.display());

    let fixtures = FixtureStore::load(&config.dashboard_fixture, &config.threat_model_fixture)
        .context("Failed to initialize fixture store")?;

    // Create application state
    let state = AppState::new(fixtures, config.response_delay);

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr = config.api_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    info!("Dashboard API running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
