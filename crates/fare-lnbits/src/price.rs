//! # BTC Price Feed
//!
//! CoinGecko-backed BTC/USD price source for fare quoting.
//!
//! Callers never fail a request on a feed error; they fall back to
//! [`fare_core::FALLBACK_BTC_PRICE_USD`].

use async_trait::async_trait;
use fare_core::{FareError, FareResult, PriceFeed};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

const COINGECKO_BASE_URL: &str = "https://api.coingecko.com";

/// Public price feed client
pub struct CoingeckoPriceFeed {
    client: Client,
    base_url: String,
}

impl CoingeckoPriceFeed {
    pub fn new() -> FareResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| FareError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: COINGECKO_BASE_URL.to_string(),
        })
    }

    /// Builder: point the feed at a different host (for testing)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl PriceFeed for CoingeckoPriceFeed {
    #[instrument(skip(self))]
    async fn btc_usd(&self) -> FareResult<f64> {
        let url = format!(
            "{}/api/v3/simple/price?ids=bitcoin&vs_currencies=usd",
            self.base_url
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FareError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FareError::Network(format!(
                "price feed returned HTTP {}",
                status
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| FareError::MalformedResponse(e.to_string()))?;

        let price = body
            .get("bitcoin")
            .and_then(|b| b.get("usd"))
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                FareError::MalformedResponse("price feed response missing bitcoin.usd".to_string())
            })?;

        debug!("BTC/USD price: {}", price);
        Ok(price)
    }
}
