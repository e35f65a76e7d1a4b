//! # Application State
//!
//! Shared state for the Axum application: the charge processor, the price
//! feed, and server configuration. Both upstream seams are trait objects so
//! handler tests can substitute doubles.

use fare_core::{BoxedChargeProcessor, BoxedPriceFeed};
use fare_lnbits::{CoingeckoPriceFeed, LnbitsProcessor};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// External wallet/charge processor
    pub processor: BoxedChargeProcessor,
    /// BTC/USD price source for fare quoting
    pub price_feed: BoxedPriceFeed,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create state wired to LNbits and CoinGecko from the environment
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let processor = LnbitsProcessor::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize LNbits client: {}", e))?;
        let price_feed = CoingeckoPriceFeed::new()
            .map_err(|e| anyhow::anyhow!("Failed to initialize price feed: {}", e))?;

        Ok(Self {
            processor: Arc::new(processor),
            price_feed: Arc::new(price_feed),
            config,
        })
    }

    /// Create state with explicit seams (for testing)
    pub fn with_parts(
        processor: BoxedChargeProcessor,
        price_feed: BoxedPriceFeed,
        config: AppConfig,
    ) -> Self {
        Self {
            processor,
            price_feed,
            config,
        }
    }
}
