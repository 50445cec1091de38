//! Transfer Error Types

use thiserror::Error;
use uuid::Uuid;

use crate::account::StoreError;
use crate::money::MoneyError;

/// Transfer error types
///
/// Business-rule failures are detected before commit and leave both balances
/// untouched. `Storage` aborts the unit of work; the caller may retry the
/// whole transfer.
#[derive(Error, Debug)]
pub enum TransferError {
    // === Validation Errors ===
    #[error("Invalid amount: {0}")]
    InvalidAmount(MoneyError),

    #[error("Source and target account cannot be the same")]
    SameAccount,

    // === Account Errors ===
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Stored balance of account {0} is not a valid amount")]
    CorruptBalance(Uuid),

    // === System Errors ===
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl TransferError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::InvalidAmount(_) => "INVALID_AMOUNT",
            TransferError::SameAccount => "SAME_ACCOUNT",
            TransferError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            TransferError::InsufficientBalance => "INSUFFICIENT_BALANCE",
            TransferError::CorruptBalance(_) => "CORRUPT_BALANCE",
            TransferError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            TransferError::InvalidAmount(_)
            | TransferError::SameAccount
            | TransferError::InsufficientBalance => 400,
            TransferError::AccountNotFound(_) => 404,
            TransferError::CorruptBalance(_) | TransferError::Storage(_) => 500,
        }
    }

    /// Whether the failure is the caller's fault
    pub fn is_client_error(&self) -> bool {
        self.http_status() < 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            TransferError::InvalidAmount(MoneyError::NotPositive).http_status(),
            400
        );
        assert_eq!(TransferError::SameAccount.http_status(), 400);
        assert_eq!(TransferError::InsufficientBalance.http_status(), 400);
        assert_eq!(
            TransferError::AccountNotFound(Uuid::nil()).http_status(),
            404
        );
        assert_eq!(
            TransferError::Storage(StoreError::MissingRow(Uuid::nil())).http_status(),
            500
        );
        assert!(!TransferError::CorruptBalance(Uuid::nil()).is_client_error());
    }

    #[test]
    fn test_not_found_names_the_account() {
        let id = Uuid::from_u128(7);
        let err = TransferError::AccountNotFound(id);
        assert_eq!(err.code(), "ACCOUNT_NOT_FOUND");
        assert!(err.to_string().contains(&id.to_string()));
    }
}
