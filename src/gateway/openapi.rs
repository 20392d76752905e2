//! OpenAPI / Swagger UI documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::gateway::handlers::account::CreateAccountRequest;
use crate::gateway::handlers::health::HealthResponse;
use crate::gateway::handlers::transfer::TransferRequest;
use crate::gateway::handlers::user::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::ledger::{Account, Entry, Transfer, TransferResult};

/// Bearer-token security scheme (JWT issued by /api/v1/auth/login)
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

/// Main API documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ironbank Ledger API",
        version = "1.0.0",
        description = "Accounts, users, and deadlock-free money transfers over PostgreSQL.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::user::register,
        crate::gateway::handlers::user::login,
        crate::gateway::handlers::account::create_account,
        crate::gateway::handlers::account::get_account,
        crate::gateway::handlers::account::list_accounts,
        crate::gateway::handlers::transfer::create_transfer,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            UserResponse,
            AuthResponse,
            CreateAccountRequest,
            TransferRequest,
            Account,
            Entry,
            Transfer,
            TransferResult,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "User registration and login"),
        (name = "Account", description = "Account management (auth required)"),
        (name = "Transfer", description = "Money transfers between accounts (auth required)"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;
