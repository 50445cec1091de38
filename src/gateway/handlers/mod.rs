//! HTTP handlers
//!
//! - [`health`]: liveness and database ping
//! - [`account`]: caller's profile view (cached)
//! - [`transfer`]: admin balance transfer
//! - [`reset`]: admin balance reset trigger

pub mod account;
pub mod health;
pub mod reset;
pub mod transfer;

pub use account::{ProfileData, get_profile};
pub use health::{HealthResponse, health_check};
pub use reset::trigger_balance_reset;
pub use transfer::transfer_balance;
