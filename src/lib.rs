//! Balance Ledger - account balances with concurrent-safe transfers
//!
//! # Modules
//!
//! - [`money`] - Decimal text ⇄ integer minor units
//! - [`account`] - Account model, store port, PostgreSQL and in-memory adapters
//! - [`transfer`] - Atomic two-account transfers
//! - [`balance_reset`] - Bulk zeroing of active balances and its scheduler
//! - [`cache`] - Profile read cache and the invalidation signal
//! - [`auth`] - JWT claims, roles and middleware
//! - [`gateway`] - HTTP API (axum) with OpenAPI docs
//! - [`db`] - Connection pool and migrations
//! - [`config`] / [`logging`] - Runtime settings and tracing setup

pub mod account;
pub mod auth;
pub mod balance_reset;
pub mod cache;
pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod money;
pub mod transfer;

// Convenient re-exports at crate root
pub use account::{Account, AccountStore, AccountView, MemoryAccountStore, PgAccountStore};
pub use balance_reset::{BalanceResetJob, ResetEngine, ResetJobHandle};
pub use cache::{CacheInvalidator, ProfileCache};
pub use transfer::{TransferEngine, TransferError, TransferRequest};
