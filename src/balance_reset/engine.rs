//! Reset Engine

use std::sync::Arc;

use tracing::{info, warn};

use crate::account::{AccountStore, StoreError};
use crate::cache::CacheInvalidator;

/// Sets `balance = 0.00` on every active account.
///
/// Takes no row locks itself. Ordering against in-flight transfers is left to
/// the store: the bulk statement commits wholly before or after each transfer.
pub struct ResetEngine {
    store: Arc<dyn AccountStore>,
    cache: Arc<dyn CacheInvalidator>,
}

impl ResetEngine {
    pub fn new(store: Arc<dyn AccountStore>, cache: Arc<dyn CacheInvalidator>) -> Self {
        Self { store, cache }
    }

    /// Returns the number of accounts reset.
    pub async fn reset_all(&self) -> Result<u64, StoreError> {
        let mut uow = self.store.begin().await?;
        let touched = match uow.zero_all_active_balances().await {
            Ok(touched) => touched,
            Err(e) => {
                if let Err(rollback_err) = uow.rollback().await {
                    warn!(error = %rollback_err, "Rollback after failed reset failed");
                }
                return Err(e);
            }
        };
        uow.commit().await?;

        self.cache.invalidate();
        info!(accounts = touched, "Active balances reset to zero");
        Ok(touched)
    }
}
