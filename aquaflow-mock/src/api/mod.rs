//! API routes
//!
//! Paths mirror the school backend (no `/api` prefix). Every data route is
//! staff-only (admin or receptionist); `/users` is admin-only.
//!
//! - [`health`] - liveness probe
//! - [`auth`] - login, current user, token refresh
//! - [`students`] - `/alunos`
//! - [`payments`] - `/pagamentos`
//! - [`schedules`] - `/horarios` and enrollments
//! - [`instructors`] - `/professores`
//! - [`plans`] - `/planos`
//! - [`users`] - `/users`

pub mod auth;
pub mod health;
pub mod instructors;
pub mod payments;
pub mod plans;
pub mod schedules;
pub mod students;
pub mod users;

use serde::Serialize;

/// `{"message": ..., "id": ...}` body of soft deletes
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message, id: None }
    }

    pub fn with_id(message: &'static str, id: i64) -> Self {
        Self {
            message,
            id: Some(id),
        }
    }
}
