//! Account handlers: create, get, owner-scoped list

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::super::state::AppState;
use super::super::types::{ApiResponse, error_codes};
use super::store_error_response;
use crate::auth::Claims;
use crate::currency::Currency;
use crate::ledger::Account;

/// Account creation request. The owner is always the authenticated user.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    pub currency: Currency,
}

/// Pagination for account listing
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListAccountsQuery {
    #[validate(range(min = 1))]
    pub page_id: i64,
    #[validate(range(min = 1, max = 10))]
    pub page_size: i64,
}

/// Open an account in the given currency
///
/// POST /api/v1/accounts
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<Account>),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Account for this currency already exists"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Account>>), (StatusCode, Json<ApiResponse<()>>)> {
    match state.store.create_account(&claims.sub, req.currency).await {
        Ok(account) => Ok((StatusCode::CREATED, Json(ApiResponse::success(account)))),
        Err(e) => {
            let err_msg = e.to_string();
            if err_msg.contains("duplicate key") {
                Err((
                    StatusCode::CONFLICT,
                    Json(ApiResponse::<()>::error(
                        error_codes::ALREADY_EXISTS,
                        format!("Account in {} already exists for this user", req.currency),
                    )),
                ))
            } else if err_msg.contains("foreign key") {
                Err((
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::<()>::error(
                        error_codes::INVALID_PARAMETER,
                        "Owner does not exist",
                    )),
                ))
            } else {
                tracing::error!("Account creation failed: {e:?}");
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<()>::error(
                        error_codes::INTERNAL_ERROR,
                        "Account creation failed",
                    )),
                ))
            }
        }
    }
}

/// Get one account by id (owner only)
///
/// GET /api/v1/accounts/{id}
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{id}",
    params(("id" = i64, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account", body = ApiResponse<Account>),
        (status = 401, description = "Unauthorized or not the owner"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<ApiResponse<Account>>), (StatusCode, Json<ApiResponse<()>>)> {
    let account = state
        .store
        .get_account(id)
        .await
        .map_err(store_error_response)?;

    if account.owner != claims.sub {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::error(
                error_codes::NOT_OWNER,
                "Account doesn't belong to the authenticated user",
            )),
        ));
    }

    Ok((StatusCode::OK, Json(ApiResponse::success(account))))
}

/// List the caller's accounts, paginated
///
/// GET /api/v1/accounts?page_id=1&page_size=5
#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    params(ListAccountsQuery),
    responses(
        (status = 200, description = "Accounts owned by the caller", body = ApiResponse<Vec<Account>>),
        (status = 400, description = "Invalid pagination"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ListAccountsQuery>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Account>>>), (StatusCode, Json<ApiResponse<()>>)> {
    if let Err(e) = query.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(
                error_codes::INVALID_PARAMETER,
                e.to_string(),
            )),
        ));
    }

    let accounts = state
        .store
        .list_accounts(
            &claims.sub,
            query.page_size,
            (query.page_id - 1) * query.page_size,
        )
        .await
        .map_err(store_error_response)?;

    Ok((StatusCode::OK, Json(ApiResponse::success(accounts))))
}
