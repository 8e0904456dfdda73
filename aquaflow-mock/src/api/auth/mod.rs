//! Auth API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /auth/login | POST | none |
//! | /auth/me | GET | any active user |
//! | /auth/refresh | POST | any active user |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handler::login))
        .route("/auth/me", get(handler::me))
        .route("/auth/refresh", post(handler::refresh))
}
