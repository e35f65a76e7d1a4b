//! # fare-lnbits
//!
//! LNbits-backed implementations of the fare gateway's upstream seams:
//!
//! 1. **LnbitsProcessor** — `ChargeProcessor` over the LNbits wallet API
//!    and its SatsPayServer charge extension
//!    - Driver side: charge create/detail/list via the SatsPay endpoints
//!    - Passenger side: balance/decode with the read key, pay/credit with
//!      the spend key
//!
//! 2. **CoingeckoPriceFeed** — `PriceFeed` over the public CoinGecko
//!    simple-price endpoint
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fare_lnbits::{LnbitsProcessor, CoingeckoPriceFeed};
//!
//! // Both clients configure from the environment
//! let processor = LnbitsProcessor::from_env()?;
//! let feed = CoingeckoPriceFeed::new()?;
//!
//! let balance_msat = processor.get_balance().await?;
//! ```

pub mod client;
pub mod config;
pub mod price;

// Re-exports
pub use client::LnbitsProcessor;
pub use config::LnbitsConfig;
pub use price::CoingeckoPriceFeed;
