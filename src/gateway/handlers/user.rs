//! User registration and login handlers

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use super::super::state::AppState;
use super::super::types::{ApiResponse, error_codes};
use crate::auth;
use crate::ledger::{CreateUserParams, User};

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32))]
    #[schema(example = "alice")]
    pub username: String,
    #[validate(length(min = 8))]
    #[schema(example = "password123")]
    pub password: String,
    #[validate(length(min = 1))]
    #[schema(example = "Alice Example")]
    pub full_name: String,
    #[validate(email)]
    #[schema(example = "alice@example.com")]
    pub email: String,
}

/// User login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "password123")]
    pub password: String,
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password_changed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            password_changed_at: user.password_changed_at,
            created_at: user.created_at,
        }
    }
}

/// Login response (JWT + profile)
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserResponse,
}

/// Register a new user
///
/// POST /api/v1/auth/register
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username or email already exists"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), (StatusCode, Json<ApiResponse<()>>)> {
    if let Err(e) = req.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(
                error_codes::INVALID_PARAMETER,
                e.to_string(),
            )),
        ));
    }

    let hashed_password = auth::hash_password(&req.password).map_err(|e| {
        tracing::error!("Password hashing failed: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(
                error_codes::INTERNAL_ERROR,
                "Registration failed",
            )),
        )
    })?;

    let params = CreateUserParams {
        username: req.username,
        hashed_password,
        full_name: req.full_name,
        email: req.email,
    };

    match state.store.create_user(&params).await {
        Ok(user) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(user.into())),
        )),
        Err(e) => {
            let err_msg = e.to_string();
            if err_msg.contains("duplicate key") {
                tracing::warn!("Registration attempt for existing user: {err_msg}");
                Err((
                    StatusCode::CONFLICT,
                    Json(ApiResponse::<()>::error(
                        error_codes::ALREADY_EXISTS,
                        "Username or email already exists",
                    )),
                ))
            } else {
                tracing::error!("Registration failed: {e:?}");
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<()>::error(
                        error_codes::INTERNAL_ERROR,
                        "Registration failed",
                    )),
                ))
            }
        }
    }
}

/// Login and issue an access token
///
/// POST /api/v1/auth/login
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), (StatusCode, Json<ApiResponse<()>>)> {
    // Same response for unknown user and wrong password
    let invalid_credentials = || {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::error(
                error_codes::AUTH_FAILED,
                "Invalid username or password",
            )),
        )
    };

    let user = match state.store.get_user(&req.username).await {
        Ok(user) => user,
        Err(e) if e.is_not_found() => {
            tracing::warn!("Login attempt for unknown user");
            return Err(invalid_credentials());
        }
        Err(e) => {
            tracing::error!("Login query failed: {e}");
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(
                    error_codes::INTERNAL_ERROR,
                    "Login failed",
                )),
            ));
        }
    };

    if auth::verify_password(&req.password, &user.hashed_password).is_err() {
        tracing::warn!("Login failed for user {}", user.username);
        return Err(invalid_credentials());
    }

    let access_token = state
        .token_maker
        .create_token(&user.username, state.token_duration)
        .map_err(|e| {
            tracing::error!("Token creation failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(
                    error_codes::INTERNAL_ERROR,
                    "Login failed",
                )),
            )
        })?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(AuthResponse {
            access_token,
            user: user.into(),
        })),
    ))
}
