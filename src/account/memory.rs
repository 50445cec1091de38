//! In-process account store
//!
//! Mirrors the PostgreSQL adapter's locking semantics so the engines can be
//! exercised without a database:
//! - one async mutex per row, taken by `lock_for_update` / `save_all` and
//!   held until the unit of work ends
//! - a table lock: row-locking units of work share it, the bulk reset takes
//!   it exclusively, so a reset commits wholly before or after each transfer
//! - writes are staged and only become visible on commit

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{
    Mutex as AsyncMutex, OwnedMutexGuard, OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock,
};
use tracing::trace;
use uuid::Uuid;

use super::models::{Account, DEFAULT_BALANCE};
use super::store::{AccountStore, StoreError, UnitOfWork};

struct Shared {
    rows: Mutex<BTreeMap<Uuid, Account>>,
    row_locks: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
    table_lock: Arc<RwLock<()>>,
}

impl Shared {
    fn rows(&self) -> MutexGuard<'_, BTreeMap<Uuid, Account>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn row_lock(&self, id: Uuid) -> Arc<AsyncMutex<()>> {
        self.row_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id)
            .or_default()
            .clone()
    }

    fn contains(&self, id: Uuid) -> bool {
        self.rows().contains_key(&id)
    }
}

/// In-memory [`AccountStore`]. Cloning shares the same rows.
#[derive(Clone)]
pub struct MemoryAccountStore {
    shared: Arc<Shared>,
}

impl Default for MemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                rows: Mutex::new(BTreeMap::new()),
                row_locks: Mutex::new(HashMap::new()),
                table_lock: Arc::new(RwLock::new(())),
            }),
        }
    }

    /// Provision an account with the given balance.
    pub fn create_account(&self, id: Uuid, balance: &str) -> Account {
        let account = Account::new(id).with_balance(balance);
        self.shared.rows().insert(id, account.clone());
        account
    }

    /// Soft-delete an account, waiting for any unit of work holding its row.
    pub async fn tombstone(&self, id: Uuid) -> bool {
        let _table = self.shared.table_lock.clone().read_owned().await;
        let lock = self.shared.row_lock(id);
        let _row = lock.lock().await;

        let mut rows = self.shared.rows();
        match rows.get_mut(&id) {
            Some(account) if account.is_active => {
                account.is_active = false;
                account.updated_at = Utc::now();
                true
            }
            _ => false,
        }
    }

    /// Committed state of any account, tombstoned or not.
    pub fn snapshot(&self, id: Uuid) -> Option<Account> {
        self.shared.rows().get(&id).cloned()
    }

    /// Sum of all committed balances in minor units.
    pub fn total_minor_units(&self) -> i64 {
        self.shared
            .rows()
            .values()
            .filter_map(|account| account.balance_minor().ok())
            .sum()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        Ok(Box::new(MemoryUnitOfWork {
            shared: Arc::clone(&self.shared),
            table: None,
            row_guards: HashMap::new(),
            staged: BTreeMap::new(),
        }))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self
            .shared
            .rows()
            .get(&id)
            .filter(|account| account.is_active)
            .cloned())
    }
}

enum TableGuard {
    Shared(#[allow(dead_code)] OwnedRwLockReadGuard<()>),
    Exclusive(#[allow(dead_code)] OwnedRwLockWriteGuard<()>),
}

/// Unit of work over [`MemoryAccountStore`]. Dropping it discards staged
/// writes and releases every lock.
pub struct MemoryUnitOfWork {
    shared: Arc<Shared>,
    table: Option<TableGuard>,
    row_guards: HashMap<Uuid, OwnedMutexGuard<()>>,
    staged: BTreeMap<Uuid, Account>,
}

impl MemoryUnitOfWork {
    async fn enter_shared(&mut self) {
        if self.table.is_none() {
            let guard = Arc::clone(&self.shared.table_lock).read_owned().await;
            self.table = Some(TableGuard::Shared(guard));
        }
    }

    async fn lock_row(&mut self, id: Uuid) {
        if self.row_guards.contains_key(&id) {
            return;
        }
        let lock = self.shared.row_lock(id);
        let guard = lock.lock_owned().await;
        trace!(account_id = %id, "Row lock acquired");
        self.row_guards.insert(id, guard);
    }

    /// Row as seen from inside this unit of work.
    fn current(&self, id: Uuid) -> Option<Account> {
        if let Some(staged) = self.staged.get(&id) {
            return Some(staged.clone());
        }
        self.shared.rows().get(&id).cloned()
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn lock_for_update(&mut self, ids: &[Uuid]) -> Result<Vec<Account>, StoreError> {
        self.enter_shared().await;

        for &id in ids {
            let exists = self.shared.contains(id);
            if exists {
                self.lock_row(id).await;
            }
        }

        Ok(ids
            .iter()
            .filter_map(|&id| self.current(id))
            .filter(|account| account.is_active)
            .collect())
    }

    async fn save_all(&mut self, accounts: &[Account]) -> Result<(), StoreError> {
        self.enter_shared().await;

        for account in accounts {
            let exists = self.shared.contains(account.id);
            if !exists {
                return Err(StoreError::MissingRow(account.id));
            }
            self.lock_row(account.id).await;

            let mut staged = account.clone();
            staged.updated_at = Utc::now();
            self.staged.insert(account.id, staged);
        }
        Ok(())
    }

    async fn zero_all_active_balances(&mut self) -> Result<u64, StoreError> {
        match self.table {
            Some(TableGuard::Shared(_)) => {
                return Err(StoreError::LockSequence(
                    "bulk update after row locks in the same unit of work",
                ));
            }
            Some(TableGuard::Exclusive(_)) => {}
            None => {
                let guard = Arc::clone(&self.shared.table_lock).write_owned().await;
                self.table = Some(TableGuard::Exclusive(guard));
            }
        }

        let now = Utc::now();
        let zeroed: Vec<Account> = {
            let rows = self.shared.rows();
            rows.values()
                .map(|row| self.staged.get(&row.id).unwrap_or(row))
                .filter(|account| account.is_active)
                .map(|account| {
                    let mut account = account.clone();
                    account.balance = DEFAULT_BALANCE.to_string();
                    account.updated_at = now;
                    account
                })
                .collect()
        };

        let touched = zeroed.len() as u64;
        for account in zeroed {
            self.staged.insert(account.id, account);
        }
        Ok(touched)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let mut this = *self;
        let staged = std::mem::take(&mut this.staged);
        {
            let mut rows = this.shared.rows();
            for (id, account) in staged {
                rows.insert(id, account);
            }
        }
        // locks are released only after the writes are visible
        drop(this);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        trace!(staged = self.staged.len(), "Unit of work rolled back");
        drop(self);
        Ok(())
    }
}
