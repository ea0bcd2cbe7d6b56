//! Payment routes.
//!
//! Handlers decode the body, validate the request, run a friendly balance
//! pre-check for debits and hand the request to the transfer engine, which
//! re-validates everything inside its own unit of work.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
    response::Response,
    routing::post,
};
use rust_decimal::Decimal;
use tracing::info;

use paylane_core::payment::{
    ExternalPaymentRequest, ExternalTransfer, InternalTransfer, InternalTransferRequest,
    PaymentError, PaymentOutcome, TopUpRequest,
};
use paylane_shared::types::{AccountId, CurrencyCode};

use crate::AppState;
use crate::response::{correlation_id, failure, invalid_body, success};

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments/internal", post(internal_payment))
        .route("/payments/external", post(external_payment))
        .route("/payments/topup", post(top_up))
}

/// POST /payments/internal
async fn internal_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<InternalTransferRequest>, JsonRejection>,
) -> Response {
    let correlation_id = correlation_id(&headers);
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_body(correlation_id, &rejection),
    };

    let checked = match InternalTransfer::try_from(&request) {
        Ok(command) => {
            precheck(
                &state,
                command.from_account,
                Some(command.to_account),
                command.amount,
                &command.currency,
            )
            .await
        }
        Err(err) => Err(err),
    };
    if let Err(err) = checked {
        return failure(correlation_id, &err);
    }

    match state.engine.internal_transfer(&request).await {
        Ok(payment) => {
            info!(
                correlation_id = %correlation_id,
                payment_id = %payment.id,
                "Internal payment accepted"
            );
            success(PaymentOutcome::internal(correlation_id, payment))
        }
        Err(err) => failure(correlation_id, &err),
    }
}

/// POST /payments/external
async fn external_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ExternalPaymentRequest>, JsonRejection>,
) -> Response {
    let correlation_id = correlation_id(&headers);
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_body(correlation_id, &rejection),
    };

    let checked = match ExternalTransfer::try_from(&request) {
        Ok(command) => {
            precheck(&state, command.from_account, None, command.amount, &command.currency).await
        }
        Err(err) => Err(err),
    };
    if let Err(err) = checked {
        return failure(correlation_id, &err);
    }

    match state.engine.external_payment(&request).await {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                payment_id = %result.payment_id,
                "External payment accepted"
            );
            success(PaymentOutcome::external(correlation_id, result))
        }
        Err(err) => failure(correlation_id, &err),
    }
}

/// POST /payments/topup
async fn top_up(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<TopUpRequest>, JsonRejection>,
) -> Response {
    let correlation_id = correlation_id(&headers);
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_body(correlation_id, &rejection),
    };

    match state.engine.top_up(&request).await {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                payment_id = %result.payment_id,
                "Top-up accepted"
            );
            success(PaymentOutcome::top_up(correlation_id, result))
        }
        Err(err) => failure(correlation_id, &err),
    }
}

/// Rejects a validated debit early when the current balance clearly cannot
/// cover it.
///
/// Runs after request validation, and reports `InsufficientBalance` only when
/// the engine would reach that check too: every touched account exists and
/// holds the request currency. Anything else is left for the engine.
async fn precheck(
    state: &AppState,
    source: AccountId,
    destination: Option<AccountId>,
    amount: Decimal,
    currency: &CurrencyCode,
) -> Result<(), PaymentError> {
    let Ok(balance) = state.engine.current_balance(&source.to_string()).await else {
        return Ok(());
    };
    if balance.currency != *currency {
        return Ok(());
    }

    if let Some(destination) = destination {
        match state.engine.current_balance(&destination.to_string()).await {
            Ok(target) if target.currency == *currency => {}
            _ => return Ok(()),
        }
    }

    balance.precheck_debit(amount)
}
