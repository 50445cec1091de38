//! Balance transfer handler

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use validator::Validate;

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, TransferBalanceRequest, TransferResultData, ok};
use crate::auth::Claims;
use crate::money;
use crate::transfer::TransferRequest;

/// Transfer balance between two accounts (admin only)
///
/// POST /api/v1/accounts/transfer
#[utoipa::path(
    post,
    path = "/api/v1/accounts/transfer",
    request_body = TransferBalanceRequest,
    responses(
        (status = 200, description = "Transfer committed", body = TransferResultData, content_type = "application/json"),
        (status = 400, description = "Invalid payload, same account, or insufficient balance"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Sender or receiver not found")
    ),
    security(("jwt_auth" = [])),
    tag = "Transfer"
)]
pub async fn transfer_balance(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<TransferBalanceRequest>, JsonRejection>,
) -> ApiResult<TransferResultData> {
    let Json(req) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    req.validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    tracing::info!(
        admin = %claims.sub,
        from = %req.from_account_id,
        to = %req.to_account_id,
        "Transfer requested"
    );

    let transfer = TransferRequest::from(&req);
    state.transfers.transfer(&transfer).await?;

    let amount_minor = money::decimal_to_minor_units(transfer.amount)
        .map_err(|e| ApiError::internal(e.to_string()))?;
    ok(TransferResultData {
        from_account_id: transfer.from_account_id,
        to_account_id: transfer.to_account_id,
        amount: money::to_decimal_string(amount_minor),
    })
}
