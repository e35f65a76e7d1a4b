//! # Charge Types
//!
//! Types for charges held by the external processor, plus the normalization
//! into the shape the driver terminal displays.
//!
//! A charge's lifecycle (`created → pending → {paid | expired}`) is owned
//! entirely by the processor. This crate only creates and reads charges,
//! never transitions them.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A charge as reported by the external processor.
///
/// Field presence varies between processor versions, so everything that is
/// not structurally required defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Charge {
    /// Opaque processor-assigned identifier
    pub id: String,

    /// Amount in satoshis
    #[serde(default)]
    pub amount: i64,

    /// Human-readable memo attached at creation
    #[serde(default)]
    pub description: String,

    /// Whether the charge has been settled
    #[serde(default)]
    pub paid: bool,

    /// Free-form status string ("pending", "expired", ...)
    #[serde(default)]
    pub status: String,

    /// ISO-8601 creation timestamp
    #[serde(default)]
    pub timestamp: Option<String>,

    /// BOLT11 payment request, present on the detail endpoint
    #[serde(default)]
    pub payment_request: Option<String>,
}

/// Seconds a fare charge stays payable before the processor expires it
pub const CHARGE_EXPIRY_SECS: u32 = 60;

/// Parameters for creating a charge on the processor.
///
/// The settlement wallet and any webhook callback are configuration owned
/// by the processor implementation, not per-request data.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCharge {
    /// Memo shown to the payer
    pub description: String,
    /// Amount in satoshis
    pub amount: i64,
    /// Seconds until the charge expires
    pub time_secs: u32,
}

/// Minimal response from charge creation; only the id is needed since the
/// renderable payment request comes from a follow-up detail fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCharge {
    pub id: String,
}

/// Observed charge state, derived paid-bool-first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargeState {
    Paid,
    Expired,
    Pending,
}

impl ChargeState {
    /// Derive the tri-state from the processor's fields.
    ///
    /// The `paid` boolean wins over the status string; an unrecognized or
    /// empty status defaults to pending.
    pub fn from_charge(charge: &Charge) -> Self {
        if charge.paid {
            ChargeState::Paid
        } else if charge.status == "expired" {
            ChargeState::Expired
        } else {
            ChargeState::Pending
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChargeState::Paid => "paid",
            ChargeState::Expired => "expired",
            ChargeState::Pending => "pending",
        }
    }
}

/// Normalized charge record for the driver terminal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Processor charge id
    pub checking_id: String,
    /// Amount in satoshis
    pub amount: i64,
    /// Unix-epoch seconds, 0 when the processor reported no timestamp
    pub time: i64,
    /// "paid" | "expired" | "pending"
    pub status: String,
    /// Memo attached at creation
    pub memo: String,
}

impl PaymentRecord {
    /// Normalize a processor charge into the display shape.
    pub fn from_charge(charge: &Charge) -> Self {
        Self {
            checking_id: charge.id.clone(),
            amount: charge.amount,
            time: charge
                .timestamp
                .as_deref()
                .and_then(parse_iso_timestamp)
                .unwrap_or(0),
            status: ChargeState::from_charge(charge).as_str().to_string(),
            memo: charge.description.clone(),
        }
    }
}

/// Map a charge list into display records, most-recent-first.
///
/// The processor returns charges oldest-first, so a plain reversal is enough;
/// no explicit sort by timestamp is performed.
pub fn normalize_charges(charges: &[Charge]) -> Vec<PaymentRecord> {
    charges.iter().rev().map(PaymentRecord::from_charge).collect()
}

/// Parse an ISO-8601 timestamp into unix seconds.
///
/// Accepts both RFC 3339 (with offset/Z) and the bare
/// `YYYY-MM-DDTHH:MM:SS[.ffffff]` form some processor versions emit,
/// which is interpreted as UTC.
fn parse_iso_timestamp(ts: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.timestamp());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(ts, fmt) {
            return Some(naive.and_utc().timestamp());
        }
    }
    None
}
