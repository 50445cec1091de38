//! Read-view cache and its invalidation signal
//!
//! The engines never read or write cached state; after a balance-affecting
//! commit they only call [`CacheInvalidator::invalidate`]. The gateway reads
//! profile views through [`ProfileCache`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use cached::{Cached, TimedSizedCache};
use uuid::Uuid;

use crate::account::AccountView;

/// Default profile TTL in seconds
pub const DEFAULT_TTL_SECONDS: u64 = 30;

/// Default number of cached profiles
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Signal fired after every committed balance-affecting write.
///
/// Implementations must not block: the call happens on the request path right
/// after commit.
pub trait CacheInvalidator: Send + Sync {
    fn invalidate(&self);
}

/// Invalidator for wiring without any cache.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopInvalidator;

impl CacheInvalidator for NoopInvalidator {
    fn invalidate(&self) {}
}

/// Bounded, TTL-expiring cache of account profile views keyed by account id.
///
/// Every invalidation bumps an epoch. A read-through fill records the epoch
/// before it goes to the store and is dropped by [`ProfileCache::put_if_current`]
/// if an invalidation happened in between.
pub struct ProfileCache {
    entries: Mutex<TimedSizedCache<Uuid, AccountView>>,
    epoch: AtomicU64,
}

impl Default for ProfileCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL_SECONDS)
    }
}

impl ProfileCache {
    pub fn new(capacity: usize, ttl_secs: u64) -> Self {
        Self {
            entries: Mutex::new(TimedSizedCache::with_size_and_lifespan(
                capacity.max(1),
                ttl_secs.max(1),
            )),
            epoch: AtomicU64::new(0),
        }
    }

    fn entries(&self) -> MutexGuard<'_, TimedSizedCache<Uuid, AccountView>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached view, if present and younger than the TTL.
    pub fn get(&self, id: &Uuid) -> Option<AccountView> {
        self.entries().cache_get(id).cloned()
    }

    /// Current invalidation epoch. Take it before reading the store.
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Store `view` unless the cache was invalidated after `epoch` was taken.
    pub fn put_if_current(&self, view: AccountView, epoch: u64) -> bool {
        let mut entries = self.entries();
        // checked under the entries lock, which invalidate() also holds
        if self.epoch.load(Ordering::SeqCst) != epoch {
            tracing::debug!(account_id = %view.id, "[cache] Stale profile fill dropped");
            return false;
        }
        entries.cache_set(view.id, view);
        true
    }

    pub fn put(&self, view: AccountView) {
        self.entries().cache_set(view.id, view);
    }

    /// Number of unexpired entries.
    pub fn len(&self) -> usize {
        let mut entries = self.entries();
        entries.flush();
        entries.cache_size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheInvalidator for ProfileCache {
    fn invalidate(&self) {
        let mut entries = self.entries();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let dropped = entries.cache_size();
        entries.cache_clear();
        tracing::debug!(dropped, "[cache] Profile cache cleared");
    }
}
