//! Data models for the account ledger

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::money::{self, MoneyError};

/// Balance every account starts with.
pub const DEFAULT_BALANCE: &str = "0.00";

/// One user's ledger position.
///
/// `balance` is exact 2-decimal text as stored by the database
/// (`NUMERIC(12,2)` rendered with `::TEXT`); convert through
/// [`crate::money`] before doing arithmetic on it.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    pub balance: String,
    /// `false` once the account has been tombstoned
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// New active account with the default balance.
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            balance: DEFAULT_BALANCE.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_balance(mut self, balance: impl Into<String>) -> Self {
        self.balance = balance.into();
        self
    }

    pub fn balance_minor(&self) -> Result<i64, MoneyError> {
        money::to_minor_units(&self.balance)
    }

    pub fn set_balance_minor(&mut self, minor: i64) {
        self.balance = money::to_decimal_string(minor);
    }
}

/// Read view of an account served to API clients (and cached).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AccountView {
    pub id: Uuid,
    #[schema(example = "12.34")]
    pub balance: String,
    pub updated_at: DateTime<Utc>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            balance: account.balance.clone(),
            updated_at: account.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_defaults() {
        let account = Account::new(Uuid::new_v4());
        assert_eq!(account.balance, "0.00");
        assert!(account.is_active);
        assert_eq!(account.balance_minor().unwrap(), 0);
    }

    #[test]
    fn test_balance_minor_round_trip() {
        let mut account = Account::new(Uuid::new_v4()).with_balance("12.34");
        assert_eq!(account.balance_minor().unwrap(), 1234);

        account.set_balance_minor(1);
        assert_eq!(account.balance, "0.01");
    }

    #[test]
    fn test_view_from_account() {
        let account = Account::new(Uuid::new_v4()).with_balance("5.00");
        let view = AccountView::from(&account);
        assert_eq!(view.id, account.id);
        assert_eq!(view.balance, "5.00");
    }
}
