//! Transfer handler
//!
//! Runs the validation gate (existence + currency for both endpoints,
//! ownership for the source) before handing the validated parameters to the
//! orchestrator. The gate reads are plain, non-locking reads; everything the
//! orchestrator does happens inside one database transaction.

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use super::super::state::AppState;
use super::super::types::{ApiResponse, error_codes};
use super::store_error_response;
use crate::auth::Claims;
use crate::currency::Currency;
use crate::ledger::{StoreError, TransferParams, TransferResult};

/// Transfer request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TransferRequest {
    #[validate(range(min = 1))]
    #[schema(example = 1)]
    pub from_account_id: i64,
    #[validate(range(min = 1))]
    #[schema(example = 2)]
    pub to_account_id: i64,
    /// Amount in minor currency units
    #[validate(range(min = 1))]
    #[schema(example = 100)]
    pub amount: i64,
    pub currency: Currency,
}

/// Move funds between two accounts
///
/// POST /api/v1/transfers
#[utoipa::path(
    post,
    path = "/api/v1/transfers",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer completed", body = ApiResponse<TransferResult>),
        (status = 400, description = "Invalid parameters or currency mismatch"),
        (status = 401, description = "Unauthorized or source account not owned by caller"),
        (status = 404, description = "Account not found"),
        (status = 504, description = "Transfer timed out and was rolled back"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Transfer"
)]
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<TransferRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransferResult>>), (StatusCode, Json<ApiResponse<()>>)> {
    if let Err(e) = req.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(
                error_codes::INVALID_PARAMETER,
                e.to_string(),
            )),
        ));
    }

    if req.from_account_id == req.to_account_id {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(
                error_codes::INVALID_PARAMETER,
                "Source and destination accounts are the same",
            )),
        ));
    }

    let from_account = state
        .store
        .validate_account(req.from_account_id, req.currency)
        .await
        .map_err(store_error_response)?;

    if from_account.owner != claims.sub {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::error(
                error_codes::NOT_OWNER,
                "From account doesn't belong to the authenticated user",
            )),
        ));
    }

    state
        .store
        .validate_account(req.to_account_id, req.currency)
        .await
        .map_err(store_error_response)?;

    let params = TransferParams {
        from_account_id: req.from_account_id,
        to_account_id: req.to_account_id,
        amount: req.amount,
    };

    // The dropped transaction rolls back when the timeout fires mid-body
    let result = match tokio::time::timeout(state.request_timeout, state.store.transfer(params))
        .await
    {
        Ok(result) => result.map_err(store_error_response)?,
        Err(_) => {
            tracing::warn!(
                from = params.from_account_id,
                to = params.to_account_id,
                "Transfer timed out before commit"
            );
            return Err(store_error_response(StoreError::Cancelled));
        }
    };

    Ok((StatusCode::OK, Json(ApiResponse::success(result))))
}
