//! Transfer request type

use rust_decimal::Decimal;
use uuid::Uuid;

/// One balance movement between two accounts. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    /// Positive, at most two fractional digits once validated at the boundary
    pub amount: Decimal,
}

impl TransferRequest {
    pub fn new(from_account_id: Uuid, to_account_id: Uuid, amount: Decimal) -> Self {
        Self {
            from_account_id,
            to_account_id,
            amount,
        }
    }
}
