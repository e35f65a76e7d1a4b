//! # Routes
//!
//! Axum router configuration for the fare gateway.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Driver terminal:
///   - POST /api/lnurlpay - Create a fare charge, returns the QR payload
///   - GET  /api/payments - Normalized charge history, most-recent-first
///
/// - Passenger wallet:
///   - GET  /api/passenger/balance - Wallet balance in sats
///   - POST /api/passenger/decode-invoice - Decode a scanned invoice
///   - POST /api/passenger/pay - Pay a scanned invoice
///   - POST /api/passenger/topup - Simulated cash top-up
pub fn create_router(state: AppState) -> Router {
    // Both front-ends are served from other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let passenger_routes = Router::new()
        .route("/balance", get(handlers::passenger_balance))
        .route("/decode-invoice", post(handlers::decode_invoice))
        .route("/pay", post(handlers::pay_invoice))
        .route("/topup", post(handlers::top_up));

    let api_routes = Router::new()
        .route("/lnurlpay", post(handlers::create_fare_charge))
        .route("/payments", get(handlers::list_payments))
        .nest("/passenger", passenger_routes);

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // API
        .nest("/api", api_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
