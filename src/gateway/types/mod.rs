//! Gateway types module
//!
//! ## Input Types
//! - [`AmountInput`]: Format-validated transfer amount
//! - [`TransferBalanceRequest`]: Transfer body, validated with `validator`
//!
//! ## Output Types
//! - [`ApiResponse<T>`]: Unified API response wrapper
//! - [`ApiError`] / [`ApiResult<T>`]: Handler error path

pub mod money;
pub mod request;
pub mod response;

// Re-export commonly used types at module root
pub use money::{AmountInput, validate_amount};
pub use request::TransferBalanceRequest;
pub use response::{
    ApiError, ApiResponse, ApiResult, ResetQueuedData, TransferResultData, error_codes, ok,
};
