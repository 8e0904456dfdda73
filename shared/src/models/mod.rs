//! Data models
//!
//! Shared between the client and the reference backend (via the REST API).
//! Rust field names are English; the wire keeps the backend's Portuguese
//! names through `serde(rename)`. All IDs are `i64`.

pub mod instructor;
pub mod payment;
pub mod plan;
pub mod schedule;
pub mod student;
pub mod user;

// Re-exports
pub use instructor::*;
pub use payment::*;
pub use plan::*;
pub use schedule::*;
pub use student::*;
pub use user::*;
