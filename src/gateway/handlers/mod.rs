//! HTTP request handlers

pub mod account;
pub mod health;
pub mod transfer;
pub mod user;

pub use account::{create_account, get_account, list_accounts};
pub use health::{HealthResponse, health_check};
pub use transfer::create_transfer;
pub use user::{AuthResponse, UserResponse, login, register};

use axum::{Json, http::StatusCode};

use super::types::{ApiResponse, error_codes};
use crate::ledger::StoreError;

/// Map a store error to the error tuple handlers return.
///
/// Internal failures are logged and replaced with a generic message; the
/// not-found / currency-mismatch / timeout families keep their text.
pub(crate) fn store_error_response(err: StoreError) -> (StatusCode, Json<ApiResponse<()>>) {
    match &err {
        e if e.is_not_found() => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error(
                error_codes::NOT_FOUND,
                err.to_string(),
            )),
        ),
        StoreError::CurrencyMismatch { .. } => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(
                error_codes::CURRENCY_MISMATCH,
                err.to_string(),
            )),
        ),
        StoreError::Cancelled => (
            StatusCode::GATEWAY_TIMEOUT,
            Json(ApiResponse::<()>::error(
                error_codes::REQUEST_TIMEOUT,
                err.to_string(),
            )),
        ),
        _ => {
            tracing::error!("Store error: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(
                    error_codes::INTERNAL_ERROR,
                    "Internal server error",
                )),
            )
        }
    }
}
