//! Account balance routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};

use crate::AppState;
use crate::response::{correlation_id, failure};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/accounts/{account_id}/balance", get(get_account_balance))
}

/// GET /accounts/{account_id}/balance
async fn get_account_balance(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(account_id): Path<String>,
) -> Response {
    match state.engine.current_balance(&account_id).await {
        Ok(balance) => (StatusCode::OK, Json(balance)).into_response(),
        Err(err) => failure(correlation_id(&headers), &err),
    }
}
