//! Balance Reset
//!
//! [`ResetEngine`] zeroes every active balance in one atomic statement.
//! [`BalanceResetJob`] is the only caller in the service: one worker task that
//! runs resets periodically and on demand, never two at once.

pub mod engine;
pub mod job;

pub use engine::ResetEngine;
pub use job::{BalanceResetJob, ResetJobConfig, ResetJobHandle};
