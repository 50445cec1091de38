//! Balance reset trigger

use std::sync::Arc;

use axum::{Extension, extract::State};

use super::super::state::AppState;
use super::super::types::{ApiResult, ResetQueuedData, ok};
use crate::auth::Claims;

/// Queue an immediate reset of all active balances (admin only)
///
/// POST /api/v1/balance-reset
///
/// Returns as soon as the background worker has been signalled; requests
/// arriving while a reset is pending are folded into it.
#[utoipa::path(
    post,
    path = "/api/v1/balance-reset",
    responses(
        (status = 200, description = "Reset queued", body = ResetQueuedData, content_type = "application/json"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin role required")
    ),
    security(("jwt_auth" = [])),
    tag = "Balance Reset"
)]
pub async fn trigger_balance_reset(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<ResetQueuedData> {
    state.reset_job.run_now();
    tracing::info!(admin = %claims.sub, "Balance reset queued");
    ok(ResetQueuedData { queued: true })
}
