//! # LNbits Processor Client
//!
//! `ChargeProcessor` implementation over the LNbits wallet API and its
//! SatsPayServer extension.
//!
//! Driver-side charge calls go through the SatsPay charge endpoints with the
//! bus admin key. Passenger-side calls use the passenger wallet's invoice
//! key for reads and its admin key for spends.

use crate::config::LnbitsConfig;
use async_trait::async_trait;
use fare_core::{
    Charge, ChargeProcessor, CreateCharge, DecodedInvoice, FareError, FareResult, NewCharge,
    PaidInvoice,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, instrument};

/// LNbits-backed charge processor
pub struct LnbitsProcessor {
    config: LnbitsConfig,
    client: Client,
}

impl LnbitsProcessor {
    /// Create a new processor client
    pub fn new(config: LnbitsConfig) -> FareResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| FareError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> FareResult<Self> {
        let config = LnbitsConfig::from_env()?;
        Self::new(config)
    }

    /// Check the response status and deserialize the body.
    ///
    /// Non-2xx responses become `FareError::Upstream` with the raw body
    /// forwarded as detail; unparseable 2xx bodies become
    /// `FareError::MalformedResponse`.
    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        context: &str,
    ) -> FareResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FareError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("LNbits API error: context={}, status={}, body={}", context, status, body);
            return Err(FareError::upstream(
                format!("{} (HTTP {})", context, status),
                &body,
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            FareError::MalformedResponse(format!("{}: {}", context, e))
        })
    }
}

#[async_trait]
impl ChargeProcessor for LnbitsProcessor {
    #[instrument(skip(self, req), fields(amount = req.amount))]
    async fn create_charge(&self, req: &CreateCharge) -> FareResult<NewCharge> {
        let body = SatspayChargeRequest {
            lnbitswallet: &self.config.bus_wallet_id,
            description: &req.description,
            amount: req.amount,
            time: req.time_secs,
            webhook_url: self.config.webhook_url.as_deref(),
        };

        debug!("Creating SatsPay charge: {} sats", req.amount);

        let response = self
            .client
            .post(format!("{}/satspay/api/v1/charge", self.config.base_url))
            .header("X-Api-Key", &self.config.bus_admin_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| FareError::Network(e.to_string()))?;

        let new_charge: NewCharge = Self::read_json(response, "charge creation failed").await?;

        info!("Created charge: id={}", new_charge.id);
        Ok(new_charge)
    }

    #[instrument(skip(self))]
    async fn get_charge(&self, charge_id: &str) -> FareResult<Charge> {
        let response = self
            .client
            .get(format!(
                "{}/satspay/api/v1/charge/{}",
                self.config.base_url, charge_id
            ))
            .header("X-Api-Key", &self.config.bus_admin_key)
            .send()
            .await
            .map_err(|e| FareError::Network(e.to_string()))?;

        Self::read_json(response, "charge detail fetch failed").await
    }

    #[instrument(skip(self))]
    async fn list_charges(&self) -> FareResult<Vec<Charge>> {
        let response = self
            .client
            .get(format!("{}/satspay/api/v1/charges/", self.config.base_url))
            .header("X-Api-Key", &self.config.bus_admin_key)
            .send()
            .await
            .map_err(|e| FareError::Network(e.to_string()))?;

        Self::read_json(response, "charge list fetch failed").await
    }

    #[instrument(skip(self))]
    async fn get_balance(&self) -> FareResult<i64> {
        let response = self
            .client
            .get(format!("{}/api/v1/wallet", self.config.base_url))
            .header("X-Api-Key", &self.config.passenger_invoice_key)
            .send()
            .await
            .map_err(|e| FareError::Network(e.to_string()))?;

        let wallet: WalletResponse = Self::read_json(response, "wallet read failed").await?;
        Ok(wallet.balance)
    }

    #[instrument(skip(self, bolt11))]
    async fn decode_invoice(&self, bolt11: &str) -> FareResult<DecodedInvoice> {
        let response = self
            .client
            .post(format!("{}/api/v1/payments/decode", self.config.base_url))
            .header("X-Api-Key", &self.config.passenger_invoice_key)
            .json(&serde_json::json!({ "data": bolt11 }))
            .send()
            .await
            .map_err(|e| FareError::Network(e.to_string()))?;

        let detail: Value = Self::read_json(response, "invoice decode failed").await?;
        let amount_msat = detail.get("amount_msat").and_then(Value::as_i64);

        Ok(DecodedInvoice {
            amount_msat,
            detail,
        })
    }

    #[instrument(skip(self, bolt11))]
    async fn pay_invoice(&self, bolt11: &str) -> FareResult<PaidInvoice> {
        let response = self
            .client
            .post(format!("{}/api/v1/payments", self.config.base_url))
            .header("X-Api-Key", &self.config.passenger_admin_key)
            .json(&serde_json::json!({ "out": true, "bolt11": bolt11 }))
            .send()
            .await
            .map_err(|e| FareError::Network(e.to_string()))?;

        let paid: PaymentResponse = Self::read_json(response, "payment submission failed").await?;

        info!("Paid invoice: hash={}", paid.payment_hash);
        Ok(PaidInvoice {
            payment_hash: paid.payment_hash,
        })
    }

    #[instrument(skip(self, memo))]
    async fn credit(&self, amount_sats: i64, memo: &str) -> FareResult<()> {
        let response = self
            .client
            .post(format!("{}/api/v1/payments", self.config.base_url))
            .header("X-Api-Key", &self.config.passenger_admin_key)
            .json(&serde_json::json!({
                "out": false,
                "amount": amount_sats,
                "memo": memo,
                "unit": "sat",
                "internal": true,
            }))
            .send()
            .await
            .map_err(|e| FareError::Network(e.to_string()))?;

        let _: Value = Self::read_json(response, "wallet credit failed").await?;

        info!("Credited wallet: {} sats", amount_sats);
        Ok(())
    }
}

// =============================================================================
// LNbits API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct SatspayChargeRequest<'a> {
    lnbitswallet: &'a str,
    description: &'a str,
    amount: i64,
    time: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    webhook_url: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct WalletResponse {
    /// Balance in millisatoshis
    balance: i64,
}

#[derive(Debug, Deserialize)]
struct PaymentResponse {
    payment_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn processor_for(server: &MockServer) -> LnbitsProcessor {
        let config = LnbitsConfig::new(server.uri(), "bus-admin", "wallet-1", "pass-read", "pass-spend");
        LnbitsProcessor::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_create_charge_posts_wallet_and_amount() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/satspay/api/v1/charge"))
            .and(header("X-Api-Key", "bus-admin"))
            .and(body_partial_json(serde_json::json!({
                "lnbitswallet": "wallet-1",
                "amount": 16667,
                "time": 60,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "charge-abc"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let processor = processor_for(&server);
        let new_charge = processor
            .create_charge(&CreateCharge {
                description: "Bus fare - $10 USD".into(),
                amount: 16667,
                time_secs: 60,
            })
            .await
            .unwrap();

        assert_eq!(new_charge.id, "charge-abc");
    }

    #[tokio::test]
    async fn test_get_charge_returns_payment_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/satspay/api/v1/charge/charge-abc"))
            .and(header("X-Api-Key", "bus-admin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "charge-abc",
                "amount": 16667,
                "description": "Bus fare - $10 USD",
                "paid": false,
                "status": "pending",
                "timestamp": "2024-06-01T12:00:00Z",
                "payment_request": "lnbc1..."
            })))
            .mount(&server)
            .await;

        let processor = processor_for(&server);
        let charge = processor.get_charge("charge-abc").await.unwrap();

        assert_eq!(charge.payment_request.as_deref(), Some("lnbc1..."));
        assert!(!charge.paid);
    }

    #[tokio::test]
    async fn test_balance_uses_read_key_and_returns_msat() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/wallet"))
            .and(header("X-Api-Key", "pass-read"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "passenger",
                "balance": 5_000_000
            })))
            .mount(&server)
            .await;

        let processor = processor_for(&server);
        assert_eq!(processor.get_balance().await.unwrap(), 5_000_000);
    }

    #[tokio::test]
    async fn test_decode_extracts_optional_amount() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/payments/decode"))
            .and(header("X-Api-Key", "pass-read"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "payment_hash": "deadbeef",
                "amount_msat": 16_667_000
            })))
            .mount(&server)
            .await;

        let processor = processor_for(&server);
        let decoded = processor.decode_invoice("lnbc1...").await.unwrap();

        assert_eq!(decoded.amount_msat, Some(16_667_000));
        assert_eq!(decoded.detail["payment_hash"], "deadbeef");
    }

    #[tokio::test]
    async fn test_decode_without_amount_field() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/payments/decode"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "payment_hash": "deadbeef"
            })))
            .mount(&server)
            .await;

        let processor = processor_for(&server);
        let decoded = processor.decode_invoice("lnbc1...").await.unwrap();

        assert!(decoded.amount_msat.is_none());
    }

    #[tokio::test]
    async fn test_pay_invoice_uses_spend_key() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/payments"))
            .and(header("X-Api-Key", "pass-spend"))
            .and(body_partial_json(serde_json::json!({ "out": true })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "payment_hash": "cafebabe"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let processor = processor_for(&server);
        let paid = processor.pay_invoice("lnbc1...").await.unwrap();

        assert_eq!(paid.payment_hash, "cafebabe");
    }

    #[tokio::test]
    async fn test_upstream_error_forwards_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/satspay/api/v1/charges/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "detail": "Invalid key"
            })))
            .mount(&server)
            .await;

        let processor = processor_for(&server);
        let err = processor.list_charges().await.unwrap_err();

        assert_eq!(err.status_code(), 500);
        assert_eq!(err.detail().unwrap()["detail"], "Invalid key");
    }
}
