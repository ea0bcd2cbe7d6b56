//! Response helpers shared by the payment and account routes.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use paylane_core::payment::{PaymentError, PaymentFailure, PaymentOutcome};
use paylane_shared::types::CorrelationId;

use crate::REQUEST_ID_HEADER;

/// Message returned when a request body cannot be decoded.
const INVALID_BODY_MESSAGE: &str =
    "Please check your payment details and ensure all required fields are filled correctly.";

/// Reads the correlation id from the request id header, or mints a new one.
#[must_use]
pub fn correlation_id(headers: &HeaderMap) -> CorrelationId {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .map_or_else(CorrelationId::new, CorrelationId::from_uuid)
}

/// Maps a payment error to its status code and failure envelope.
#[must_use]
pub fn failure(correlation_id: CorrelationId, err: &PaymentError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, Json(PaymentOutcome::failure(correlation_id, err))).into_response()
}

/// Rejects a body that did not decode into the expected request shape.
#[must_use]
pub fn invalid_body(correlation_id: CorrelationId, rejection: &JsonRejection) -> Response {
    tracing::debug!(
        correlation_id = %correlation_id,
        error = %rejection.body_text(),
        "Rejected malformed request body"
    );

    (
        StatusCode::BAD_REQUEST,
        Json(PaymentOutcome::Failure(PaymentFailure {
            correlation_id,
            code: "INVALID_REQUEST".to_string(),
            message: INVALID_BODY_MESSAGE.to_string(),
        })),
    )
        .into_response()
}

/// Wraps a committed payment outcome.
#[must_use]
pub fn success(outcome: PaymentOutcome) -> Response {
    (StatusCode::OK, Json(outcome)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_correlation_id_from_header() {
        let uuid = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            REQUEST_ID_HEADER,
            HeaderValue::from_str(&uuid.to_string()).unwrap(),
        );
        assert_eq!(correlation_id(&headers).into_inner(), uuid);
    }

    #[test]
    fn test_correlation_id_minted_when_header_unusable() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("not-a-uuid"));
        let first = correlation_id(&headers);
        let second = correlation_id(&HeaderMap::new());
        assert_ne!(first, second);
    }

    #[test]
    fn test_failure_status_follows_error_kind() {
        let response = failure(
            CorrelationId::new(),
            &PaymentError::UnsupportedChannel("CASH".into()),
        );
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = failure(CorrelationId::new(), &PaymentError::Cancelled(5_000));
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }
}
