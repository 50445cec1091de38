//! Request DTOs

use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::money::{AmountInput, validate_amount};
use crate::transfer::TransferRequest;

/// Transfer request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TransferBalanceRequest {
    /// Sender account id
    #[serde(alias = "fromUserId")]
    #[schema(example = "f9f5a11b-c338-4ee4-8d39-f4f20ac2d6e1")]
    pub from_account_id: Uuid,
    /// Receiver account id
    #[serde(alias = "toUserId")]
    #[schema(example = "1dd99f7d-b131-4491-ab80-89cfc84e3696")]
    pub to_account_id: Uuid,
    /// Amount, JSON string or number, at least 0.01 with at most 2 decimals
    #[validate(custom(function = "validate_amount"))]
    #[schema(value_type = String, example = "20.51")]
    pub amount: AmountInput,
}

impl From<&TransferBalanceRequest> for TransferRequest {
    fn from(req: &TransferBalanceRequest) -> Self {
        TransferRequest::new(req.from_account_id, req.to_account_id, req.amount.inner())
    }
}
