//! # fare-core
//!
//! Core types and traits for the fare-lightning gateway.
//!
//! This crate provides:
//! - `ChargeProcessor` trait abstracting the external wallet/charge API
//! - `PriceFeed` trait for the BTC/USD exchange rate
//! - `Charge`, `PaymentRecord`, and `ChargeState` for the charge lifecycle
//! - `FareQuote` and USD→satoshi conversion
//! - `FareError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use fare_core::{quote_fare, FALLBACK_BTC_PRICE_USD};
//!
//! // Quote a $10 fare at the current BTC price
//! let price = feed.btc_usd().await.unwrap_or(FALLBACK_BTC_PRICE_USD);
//! let quote = quote_fare(10.0, price, None)?;
//!
//! // Create the charge upstream and fetch its QR payload
//! let new_charge = processor.create_charge(&req).await?;
//! let detail = processor.get_charge(&new_charge.id).await?;
//! ```

pub mod charge;
pub mod error;
pub mod processor;
pub mod quote;

// Re-exports for convenience
pub use charge::{
    normalize_charges, Charge, ChargeState, CreateCharge, NewCharge, PaymentRecord,
    CHARGE_EXPIRY_SECS,
};
pub use error::{FareError, FareResult};
pub use processor::{
    BoxedChargeProcessor, BoxedPriceFeed, ChargeProcessor, DecodedInvoice, PaidInvoice, PriceFeed,
};
pub use quote::{
    msat_to_sat, quote_fare, FareQuote, DEFAULT_TOPUP_SATS, FALLBACK_BTC_PRICE_USD,
};
