//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::account::AccountView;
use crate::gateway::handlers::{HealthResponse, ProfileData};
use crate::gateway::types::{ResetQueuedData, TransferBalanceRequest, TransferResultData};

/// Bearer JWT security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "jwt_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "HS256 token with claims {sub, login, role, iat, exp}; \
                             transfer and balance-reset require role=admin",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Balance Ledger API",
        version = "1.0.0",
        description = "Account balances with concurrency-safe transfers and scheduled resets.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::account::get_profile,
        crate::gateway::handlers::transfer::transfer_balance,
        crate::gateway::handlers::reset::trigger_balance_reset,
    ),
    components(
        schemas(
            HealthResponse,
            ProfileData,
            AccountView,
            TransferBalanceRequest,
            TransferResultData,
            ResetQueuedData,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Account", description = "Caller's account (JWT)"),
        (name = "Transfer", description = "Balance transfers (admin)"),
        (name = "Balance Reset", description = "Balance reset trigger (admin)"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;
