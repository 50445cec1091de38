//! Account store port
//!
//! The transfer and reset engines only talk to these traits. A store hands
//! out units of work; every balance mutation happens inside one.
//!
//! # Lock ordering
//!
//! [`UnitOfWork::lock_for_update`] locks rows in the order the ids are given.
//! Callers MUST pass ids sorted ascending. Every caller locking in the same
//! global order is what keeps two transfers sharing an account from waiting
//! on each other in a cycle.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::Account;

/// Storage-layer failures. All of them abort the unit of work.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Account {0} disappeared while locked")]
    MissingRow(Uuid),

    #[error("Invalid lock sequence: {0}")]
    LockSequence(&'static str),
}

/// Durable keyed storage of accounts.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Open a unit of work. Dropping it without [`UnitOfWork::commit`] rolls it back.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError>;

    /// Point lookup of an active account, outside any unit of work.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;
}

/// A bounded set of store operations that commit or roll back together.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Exclusively lock the given active accounts for the rest of the unit of
    /// work, blocking until every lock is held.
    ///
    /// Ids that do not exist (or are tombstoned) are simply absent from the
    /// result. Rows come back in ascending id order; callers pass ids already
    /// sorted with [`canonical_lock_order`].
    async fn lock_for_update(&mut self, ids: &[Uuid]) -> Result<Vec<Account>, StoreError>;

    /// Persist the current state of every given account.
    async fn save_all(&mut self, accounts: &[Account]) -> Result<(), StoreError>;

    /// Set `balance = 0.00` on every active account in one statement.
    ///
    /// Returns the number of accounts touched.
    async fn zero_all_active_balances(&mut self) -> Result<u64, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}

/// Sort and dedup ids into canonical lock order.
pub fn canonical_lock_order(ids: &[Uuid]) -> Vec<Uuid> {
    let mut ordered = ids.to_vec();
    ordered.sort_unstable();
    ordered.dedup();
    ordered
}
