//! Account storage
//!
//! One row per user holding a non-negative balance with two fractional
//! digits. Rows are never hard-deleted; a tombstoned row is invisible to
//! lookups, transfers and resets.

pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use memory::MemoryAccountStore;
pub use models::{Account, AccountView, DEFAULT_BALANCE};
pub use postgres::PgAccountStore;
pub use store::{AccountStore, StoreError, UnitOfWork, canonical_lock_order};
