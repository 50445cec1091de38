//! Balance Transfer
//!
//! # Safety Invariants
//!
//! 1. **Conservation**: sender loses exactly what receiver gains, in minor units
//! 2. **Non-negativity**: a transfer that would overdraw the sender is rejected
//!    and the unit of work rolled back
//! 3. **Canonical lock order**: rows are locked in ascending id order
//! 4. **Invalidate after commit**: the cache signal fires only once the write
//!    is durable

pub mod engine;
pub mod error;
pub mod types;

pub use engine::TransferEngine;
pub use error::TransferError;
pub use types::TransferRequest;
