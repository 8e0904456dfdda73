//! Unified error system for AquaFlow
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ErrorBody`]: The `{"detail": ...}` body the REST backend sends on failure
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Student errors
//! - 4xxx: Schedule / enrollment errors
//! - 5xxx: Payment errors
//! - 6xxx: Instructor errors
//! - 7xxx: Plan errors
//! - 8xxx: User errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorBody, ErrorCode};
//!
//! let err = AppError::with_message(ErrorCode::SessionFull, "Horário lotado")
//!     .with_detail("horario_id", 7);
//! let body = ErrorBody::from(&err);
//! assert_eq!(body.detail, "Horário lotado");
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody};
