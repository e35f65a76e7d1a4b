//! # Charge Processor Trait
//!
//! The seam between the gateway and the external wallet/charge processor.
//! Every outbound call the gateway makes goes through `ChargeProcessor`,
//! so handlers can be exercised against a test double.
//!
//! All consistency guarantees live upstream; these methods read and create,
//! never transition charge state.

use crate::charge::{Charge, CreateCharge, NewCharge};
use crate::error::FareResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A decoded payment descriptor.
///
/// `amount_msat` is absent when the invoice carries no amount; callers treat
/// that as a validation fault. `detail` is the processor's raw decode
/// payload, passed through for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedInvoice {
    pub amount_msat: Option<i64>,
    pub detail: serde_json::Value,
}

/// Result of submitting an outbound payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaidInvoice {
    pub payment_hash: String,
}

/// Interface to the external wallet/charge processor.
///
/// The driver-side methods (`create_charge`, `get_charge`, `list_charges`)
/// and the passenger-side reads (`get_balance`, `decode_invoice`) use
/// separate credentials from the passenger spend path (`pay_invoice`,
/// `credit`); implementations own that distinction.
#[async_trait]
pub trait ChargeProcessor: Send + Sync {
    /// Create a charge, entering the `pending` state upstream.
    async fn create_charge(&self, req: &CreateCharge) -> FareResult<NewCharge>;

    /// Fetch full charge detail, including the renderable payment request.
    async fn get_charge(&self, charge_id: &str) -> FareResult<Charge>;

    /// Fetch the full charge list, oldest-first as the processor stores it.
    async fn list_charges(&self) -> FareResult<Vec<Charge>>;

    /// Read the passenger wallet balance in millisatoshis.
    async fn get_balance(&self) -> FareResult<i64>;

    /// Decode an opaque payment descriptor.
    async fn decode_invoice(&self, bolt11: &str) -> FareResult<DecodedInvoice>;

    /// Submit an outbound payment with the spend credential.
    async fn pay_invoice(&self, bolt11: &str) -> FareResult<PaidInvoice>;

    /// Record an inbound payment crediting the wallet (simulated cash
    /// top-up at a point of sale).
    async fn credit(&self, amount_sats: i64, memo: &str) -> FareResult<()>;
}

/// Type alias for a shared processor (dynamic dispatch)
pub type BoxedChargeProcessor = Arc<dyn ChargeProcessor>;

/// Source of the BTC/USD exchange rate used for fare quoting.
///
/// Failure here is non-fatal: callers fall back to
/// [`crate::quote::FALLBACK_BTC_PRICE_USD`].
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn btc_usd(&self) -> FareResult<f64>;
}

/// Type alias for a shared price feed
pub type BoxedPriceFeed = Arc<dyn PriceFeed>;
