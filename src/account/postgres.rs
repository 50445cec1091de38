//! PostgreSQL account store
//!
//! Uses `accounts` with `deleted_at IS NULL` marking active rows. The locking
//! read is `SELECT ... FOR UPDATE`; the bulk reset is a single `UPDATE`, so
//! its interleaving with row-locked transfers is decided by PostgreSQL.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, warn};
use uuid::Uuid;

use super::models::{Account, DEFAULT_BALANCE};
use super::store::{AccountStore, StoreError, UnitOfWork};

const ACCOUNT_COLUMNS: &str = "id, balance::TEXT AS balance, (deleted_at IS NULL) AS is_active, \
     created_at, updated_at";

/// PostgreSQL-backed [`AccountStore`]
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Provision a new account (seeding and tests; user provisioning owns this in production).
    pub async fn create_account(&self, id: Uuid, balance: &str) -> Result<Account, StoreError> {
        let sql = format!(
            "INSERT INTO accounts (id, balance) VALUES ($1, CAST($2 AS NUMERIC)) RETURNING {}",
            ACCOUNT_COLUMNS
        );
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .bind(balance)
            .fetch_one(&self.pool)
            .await?;
        Ok(account)
    }

    /// Soft-delete an account.
    pub async fn tombstone(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE accounts SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Balance of any account, tombstoned or not.
    pub async fn raw_balance(&self, id: Uuid) -> Result<Option<String>, StoreError> {
        let balance: Option<String> =
            sqlx::query_scalar("SELECT balance::TEXT FROM accounts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(balance)
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let sql = format!(
            "SELECT {} FROM accounts WHERE id = $1 AND deleted_at IS NULL",
            ACCOUNT_COLUMNS
        );
        let account = sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }
}

/// One PostgreSQL transaction. Dropping it rolls back.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn lock_for_update(&mut self, ids: &[Uuid]) -> Result<Vec<Account>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        // ORDER BY id makes PostgreSQL take the row locks in ascending id order
        let sql = format!(
            "SELECT {} FROM accounts WHERE id = ANY($1) AND deleted_at IS NULL \
             ORDER BY id ASC FOR UPDATE",
            ACCOUNT_COLUMNS
        );
        let locked = sqlx::query_as::<_, Account>(&sql)
            .bind(ids.to_vec())
            .fetch_all(&mut *self.tx)
            .await?;

        debug!(requested = ids.len(), locked = locked.len(), "Rows locked for update");
        Ok(locked)
    }

    async fn save_all(&mut self, accounts: &[Account]) -> Result<(), StoreError> {
        for account in accounts {
            let result = sqlx::query(
                "UPDATE accounts SET balance = CAST($2 AS NUMERIC), updated_at = NOW() \
                 WHERE id = $1",
            )
            .bind(account.id)
            .bind(&account.balance)
            .execute(&mut *self.tx)
            .await?;

            if result.rows_affected() != 1 {
                return Err(StoreError::MissingRow(account.id));
            }
        }
        Ok(())
    }

    async fn zero_all_active_balances(&mut self) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE accounts SET balance = CAST($1 AS NUMERIC), updated_at = NOW() \
             WHERE deleted_at IS NULL",
        )
        .bind(DEFAULT_BALANCE)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let this = *self;
        this.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        let this = *self;
        if let Err(e) = this.tx.rollback().await {
            warn!(error = %e, "Rollback failed; connection will be discarded");
            return Err(e.into());
        }
        Ok(())
    }
}
