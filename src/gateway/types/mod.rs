//! Gateway types module
//!
//! ## Input Types
//! - [`OrderPayload`]: Axum extractor for order bodies (422 on any malformed body)
//! - [`StatusQuery`]: status update parameter
//!
//! ## Output Types
//! - [`ApiResponse<T>`]: Unified response wrapper (errors, health)
//! - [`ApiError`]: Handler error with HTTP status and error code
//!
//! ## Submodules
//! - [`order`]: Order request types
//! - [`response`]: Response types and error codes

pub mod order;
pub mod response;

pub use order::{OrderPayload, StatusQuery};
pub use response::{ApiError, ApiResponse, ApiResult, MessageData, OrderCreatedData, error_codes};
