//! # Fare Gateway
//!
//! Lightning payments for transit fares.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export LNBITS_BASE_URL=https://lnbits.example.com
//! export BUS_ADMIN_KEY=...
//! export BUS_WALLET_ID=...
//! export PASSENGER_INVOICE_KEY=...
//! export PASSENGER_ADMIN_KEY=...
//!
//! # Run the server
//! fare-gateway
//! ```

use fare_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("🚍 Fare gateway starting on http://{}", addr);

    if !is_prod {
        info!("💳 Create charge: POST http://{}/api/lnurlpay", addr);
        info!("📜 Payments: GET http://{}/api/payments", addr);
        info!("👛 Balance: GET http://{}/api/passenger/balance", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
