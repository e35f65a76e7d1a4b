//! # Fare Quoting
//!
//! USD → satoshi conversion for fare charges, and the msat → sat
//! conversion used by the wallet proxy.

use crate::error::{FareError, FareResult};
use serde::{Deserialize, Serialize};

/// BTC/USD price used when the live price feed is unavailable.
/// Price-feed failure never fails a fare request.
pub const FALLBACK_BTC_PRICE_USD: f64 = 60_000.0;

/// Satoshis credited per simulated cash top-up when the caller does not
/// choose an amount.
pub const DEFAULT_TOPUP_SATS: i64 = 5_000;

/// A derived fare quote. Recomputed per request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FareQuote {
    /// Requested fare in USD
    pub usd_amount: f64,
    /// BTC/USD price the quote was computed against
    pub btc_price: f64,
    /// Fare in satoshis, rounded
    pub satoshis: i64,
    /// Memo attached to the resulting charge
    pub memo: String,
}

/// Quote a USD fare in satoshis at the given BTC price.
///
/// Rejects non-positive or non-finite amounts, and amounts that round
/// below one satoshi.
pub fn quote_fare(
    usd_amount: f64,
    btc_price: f64,
    description: Option<&str>,
) -> FareResult<FareQuote> {
    if !usd_amount.is_finite() || usd_amount <= 0.0 {
        return Err(FareError::InvalidRequest("Invalid USD amount".to_string()));
    }

    // The price comes from the feed or the fallback constant, but a zero or
    // non-finite value would saturate the conversion instead of failing.
    if !btc_price.is_finite() || btc_price <= 0.0 {
        return Err(FareError::MalformedResponse(format!(
            "invalid BTC price: {}",
            btc_price
        )));
    }

    let satoshis = (usd_amount / btc_price * 100_000_000.0).round() as i64;
    if satoshis < 1 {
        return Err(FareError::InvalidRequest(
            "Amount too low to charge in satoshis".to_string(),
        ));
    }

    let memo = description
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Bus fare - ${} USD", usd_amount));

    Ok(FareQuote {
        usd_amount,
        btc_price,
        satoshis,
        memo,
    })
}

/// Convert millisatoshis to whole satoshis, flooring the remainder.
pub fn msat_to_sat(msat: i64) -> i64 {
    msat / 1000
}
