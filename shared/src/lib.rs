//! Shared types for AquaFlow
//!
//! Common types used across the client and the reference backend: data
//! models, error types, wire DTOs and the pure domain helpers (billing dates,
//! phone numbers, currency, CPF).

pub mod billing;
pub mod client;
pub mod cpf;
pub mod error;
pub mod models;
pub mod money;
pub mod phone;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorBody, ErrorCode};
