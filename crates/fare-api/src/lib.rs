//! # fare-api
//!
//! HTTP API layer for the fare-lightning gateway.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Driver-terminal endpoints (charge creation, payment history)
//! - Passenger-wallet endpoints (balance, decode, pay, top-up)
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/lnurlpay` | Create fare charge |
//! | GET | `/api/payments` | Charge history |
//! | GET | `/api/passenger/balance` | Wallet balance |
//! | POST | `/api/passenger/decode-invoice` | Decode invoice |
//! | POST | `/api/passenger/pay` | Pay invoice |
//! | POST | `/api/passenger/topup` | Simulated cash top-up |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
