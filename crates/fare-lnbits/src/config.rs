//! # LNbits Configuration
//!
//! Configuration for the LNbits/SatsPayServer integration.
//! All keys are loaded from environment variables; there are no embedded
//! fallback credentials.

use fare_core::FareError;
use std::env;

/// LNbits API configuration.
///
/// The driver side (charge create/list/detail) and the passenger side use
/// separate wallets: the passenger wallet carries a read key for balance
/// and decode, and an admin key for spending.
#[derive(Debug, Clone)]
pub struct LnbitsConfig {
    /// Processor base URL (e.g. `https://lnbits.example.com`)
    pub base_url: String,

    /// Driver-side admin key, used against the SatsPay charge API
    pub bus_admin_key: String,

    /// Wallet the fare charges settle into
    pub bus_wallet_id: String,

    /// Passenger read key (balance, invoice decode)
    pub passenger_invoice_key: String,

    /// Passenger spend key (pay, top-up credit)
    pub passenger_admin_key: String,

    /// Optional callback URL the processor notifies when a charge settles
    pub webhook_url: Option<String>,
}

impl LnbitsConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `LNBITS_BASE_URL`
    /// - `BUS_ADMIN_KEY`
    /// - `BUS_WALLET_ID`
    /// - `PASSENGER_INVOICE_KEY`
    /// - `PASSENGER_ADMIN_KEY`
    ///
    /// Optional:
    /// - `BUS_WEBHOOK_URL`
    pub fn from_env() -> Result<Self, FareError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let require = |name: &str| {
            env::var(name)
                .map_err(|_| FareError::Configuration(format!("{} not set", name)))
        };

        let base_url = require("LNBITS_BASE_URL")?;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(FareError::Configuration(
                "LNBITS_BASE_URL must be an http(s) URL".to_string(),
            ));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            bus_admin_key: require("BUS_ADMIN_KEY")?,
            bus_wallet_id: require("BUS_WALLET_ID")?,
            passenger_invoice_key: require("PASSENGER_INVOICE_KEY")?,
            passenger_admin_key: require("PASSENGER_ADMIN_KEY")?,
            webhook_url: env::var("BUS_WEBHOOK_URL").ok(),
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(
        base_url: impl Into<String>,
        bus_admin_key: impl Into<String>,
        bus_wallet_id: impl Into<String>,
        passenger_invoice_key: impl Into<String>,
        passenger_admin_key: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            bus_admin_key: bus_admin_key.into(),
            bus_wallet_id: bus_wallet_id.into(),
            passenger_invoice_key: passenger_invoice_key.into(),
            passenger_admin_key: passenger_admin_key.into(),
            webhook_url: None,
        }
    }

    /// Builder: set the settlement webhook URL
    pub fn with_webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = LnbitsConfig::new("http://localhost:5000/", "ak", "w1", "ik", "pk");
        assert_eq!(config.base_url, "http://localhost:5000");
    }

    #[test]
    fn test_webhook_builder() {
        let config = LnbitsConfig::new("http://localhost:5000", "ak", "w1", "ik", "pk")
            .with_webhook_url("http://example.com/api/payment_notification");
        assert!(config.webhook_url.is_some());
    }

    #[test]
    fn test_from_env_missing_key() {
        env::remove_var("LNBITS_BASE_URL");

        let result = LnbitsConfig::from_env();
        assert!(result.is_err());
    }
}
