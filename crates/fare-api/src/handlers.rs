//! # Request Handlers
//!
//! Axum request handlers for the fare gateway.
//! Driver-terminal endpoints create charges and poll payment history;
//! passenger endpoints proxy the wallet (balance, decode, pay, top-up).

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use fare_core::{
    msat_to_sat, normalize_charges, quote_fare, CreateCharge, FareError, PaymentRecord,
    CHARGE_EXPIRY_SECS, DEFAULT_TOPUP_SATS, FALLBACK_BTC_PRICE_USD,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create fare charge request (driver terminal)
#[derive(Debug, Deserialize)]
pub struct CreateChargeRequest {
    /// Fare in USD
    #[serde(default)]
    pub usd_amount: Option<f64>,
    /// Memo override (defaults to a generated fare memo)
    #[serde(default)]
    pub description: Option<String>,
}

/// Create fare charge response
#[derive(Debug, Serialize)]
pub struct CreateChargeResponse {
    pub success: bool,
    /// Processor charge id, polled by the terminal
    pub charge_id: String,
    /// BOLT11 payload for the terminal to render as a QR code
    pub qr_content: String,
    pub satoshis_amount: i64,
    pub usd_amount: f64,
}

/// Charge history response
#[derive(Debug, Serialize)]
pub struct PaymentsResponse {
    pub success: bool,
    pub payments: Vec<PaymentRecord>,
}

/// Wallet balance response
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub success: bool,
    /// Whole satoshis (floor of the upstream msat balance)
    pub balance: i64,
    pub unit: &'static str,
}

/// Invoice decode request
#[derive(Debug, Deserialize)]
pub struct DecodeInvoiceRequest {
    #[serde(default)]
    pub bolt11_invoice: Option<String>,
}

/// Invoice decode response
#[derive(Debug, Serialize)]
pub struct DecodeInvoiceResponse {
    pub success: bool,
    pub amount_sats: i64,
    /// Raw decode payload from the processor
    pub detail: serde_json::Value,
}

/// Pay invoice request
#[derive(Debug, Deserialize)]
pub struct PayInvoiceRequest {
    #[serde(default)]
    pub bolt11_invoice: Option<String>,
}

/// Pay invoice response
#[derive(Debug, Serialize)]
pub struct PayInvoiceResponse {
    pub success: bool,
    pub message: String,
    pub payment_hash: String,
    pub amount_sats: i64,
}

/// Cash top-up request
#[derive(Debug, Deserialize)]
pub struct TopUpRequest {
    /// Token presented at the point of sale
    #[serde(default)]
    pub token: Option<String>,
    /// Satoshis to credit (defaults to the fixed top-up amount)
    #[serde(default)]
    pub amount: Option<i64>,
}

/// Cash top-up response
#[derive(Debug, Serialize)]
pub struct TopUpResponse {
    pub success: bool,
    pub message: String,
}

/// Error response: `{ success: false, error, detail }`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

type HandlerError = (StatusCode, Json<ErrorBody>);

/// Map a gateway error to the wire shape.
///
/// Input-validation faults carry their own message with a 400; upstream and
/// processing faults get the endpoint's context message with a 500 and the
/// upstream detail forwarded when available.
fn fail(context: &str, err: FareError) -> HandlerError {
    match err {
        FareError::InvalidRequest(msg) => bad_request(msg),
        other => {
            error!("{}: {}", context, other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    success: false,
                    error: context.to_string(),
                    detail: other.detail(),
                }),
            )
        }
    }
}

fn bad_request(msg: impl Into<String>) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            success: false,
            error: msg.into(),
            detail: None,
        }),
    )
}

/// JSON body extractor whose rejection carries the error envelope.
///
/// Axum's stock `Json` rejection answers malformed bodies with plain text;
/// caller-input faults must always be `{ success: false, error, detail }`.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = HandlerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(bad_request(rejection.body_text())),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "fare-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a fare charge and return its QR payload (driver terminal).
///
/// `POST /api/lnurlpay`
#[instrument(skip(state, request), fields(usd = ?request.usd_amount))]
pub async fn create_fare_charge(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateChargeRequest>,
) -> Result<Json<CreateChargeResponse>, HandlerError> {
    let usd_amount = request
        .usd_amount
        .ok_or_else(|| bad_request("Invalid USD amount"))?;

    // Price-feed failure is the one non-fatal upstream call
    let btc_price = match state.price_feed.btc_usd().await {
        Ok(price) => price,
        Err(e) => {
            warn!(
                "BTC price feed unavailable ({}), falling back to ${}",
                e, FALLBACK_BTC_PRICE_USD
            );
            FALLBACK_BTC_PRICE_USD
        }
    };

    let quote = quote_fare(usd_amount, btc_price, request.description.as_deref())
        .map_err(|e| fail("Error quoting fare", e))?;

    info!(
        "Creating fare charge: ${} USD @ ${} = {} sats",
        quote.usd_amount, quote.btc_price, quote.satoshis
    );

    let new_charge = state
        .processor
        .create_charge(&CreateCharge {
            description: quote.memo.clone(),
            amount: quote.satoshis,
            time_secs: CHARGE_EXPIRY_SECS,
        })
        .await
        .map_err(|e| fail("Error creating charge", e))?;

    // Follow-up fetch for the renderable payment request. A failure here
    // leaves the charge orphaned upstream; there is no cleanup path.
    let detail = state
        .processor
        .get_charge(&new_charge.id)
        .await
        .map_err(|e| fail("Charge created but details unavailable for QR", e))?;

    let qr_content = detail.payment_request.ok_or_else(|| {
        fail(
            "Charge created but details unavailable for QR",
            FareError::MalformedResponse("charge detail missing payment_request".to_string()),
        )
    })?;

    Ok(Json(CreateChargeResponse {
        success: true,
        charge_id: new_charge.id,
        qr_content,
        satoshis_amount: quote.satoshis,
        usd_amount: quote.usd_amount,
    }))
}

/// Charge history, normalized and most-recent-first (driver terminal).
///
/// `GET /api/payments`
#[instrument(skip(state))]
pub async fn list_payments(
    State(state): State<AppState>,
) -> Result<Json<PaymentsResponse>, HandlerError> {
    let charges = state
        .processor
        .list_charges()
        .await
        .map_err(|e| fail("Error fetching payments", e))?;

    Ok(Json(PaymentsResponse {
        success: true,
        payments: normalize_charges(&charges),
    }))
}

/// Passenger wallet balance in whole satoshis.
///
/// `GET /api/passenger/balance`
#[instrument(skip(state))]
pub async fn passenger_balance(
    State(state): State<AppState>,
) -> Result<Json<BalanceResponse>, HandlerError> {
    let msat = state
        .processor
        .get_balance()
        .await
        .map_err(|e| fail("Error fetching balance", e))?;

    Ok(Json(BalanceResponse {
        success: true,
        balance: msat_to_sat(msat),
        unit: "sats",
    }))
}

/// Decode a payment descriptor into its satoshi amount.
///
/// `POST /api/passenger/decode-invoice`
#[instrument(skip(state, request))]
pub async fn decode_invoice(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DecodeInvoiceRequest>,
) -> Result<Json<DecodeInvoiceResponse>, HandlerError> {
    let bolt11 = require_bolt11(request.bolt11_invoice.as_deref())?;

    let decoded = state
        .processor
        .decode_invoice(bolt11)
        .await
        .map_err(|e| fail("Error decoding invoice", e))?;

    let amount_msat = decoded
        .amount_msat
        .ok_or_else(|| bad_request("Invoice has no amount"))?;

    Ok(Json(DecodeInvoiceResponse {
        success: true,
        amount_sats: msat_to_sat(amount_msat),
        detail: decoded.detail,
    }))
}

/// Pay an invoice from the passenger wallet.
///
/// `POST /api/passenger/pay`
///
/// Decodes the descriptor first to recover the amount for the response,
/// then submits the outbound payment with the spend credential.
#[instrument(skip(state, request))]
pub async fn pay_invoice(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PayInvoiceRequest>,
) -> Result<Json<PayInvoiceResponse>, HandlerError> {
    let bolt11 = require_bolt11(request.bolt11_invoice.as_deref())?;

    let decoded = state
        .processor
        .decode_invoice(bolt11)
        .await
        .map_err(|e| fail("Error decoding invoice", e))?;

    let amount_sats = decoded
        .amount_msat
        .map(msat_to_sat)
        .ok_or_else(|| bad_request("Invoice has no amount"))?;

    let paid = state
        .processor
        .pay_invoice(bolt11)
        .await
        .map_err(|e| fail("Error paying invoice", e))?;

    info!("Paid fare invoice: {} sats, hash={}", amount_sats, paid.payment_hash);

    Ok(Json(PayInvoiceResponse {
        success: true,
        message: format!("Payment of {} sats sent", amount_sats),
        payment_hash: paid.payment_hash,
        amount_sats,
    }))
}

/// Simulated cash top-up: credit the passenger wallet.
///
/// `POST /api/passenger/topup`
///
/// The token is required to be non-empty and is recorded in the credit memo
/// for audit, but is not verified against any issued-token record.
#[instrument(skip(state, request))]
pub async fn top_up(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TopUpRequest>,
) -> Result<Json<TopUpResponse>, HandlerError> {
    let token = request
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| bad_request("Missing top-up token"))?;

    let amount = request.amount.unwrap_or(DEFAULT_TOPUP_SATS);
    if amount <= 0 {
        return Err(bad_request("Invalid top-up amount"));
    }

    state
        .processor
        .credit(amount, &format!("Cash top-up (token {})", token))
        .await
        .map_err(|e| fail("Error crediting wallet", e))?;

    info!("Top-up credited: {} sats, token={}", amount, token);

    Ok(Json(TopUpResponse {
        success: true,
        message: format!("Top-up of {} sats credited", amount),
    }))
}

fn require_bolt11(bolt11: Option<&str>) -> Result<&str, HandlerError> {
    bolt11
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .ok_or_else(|| bad_request("Missing bolt11_invoice"))
}
