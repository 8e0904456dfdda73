//! [`CurrentUser`] extractor
//!
//! Reads what [`require_auth`](super::require_auth) left in the request
//! extensions, so handlers can take `user: CurrentUser` directly.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::AppError;

use crate::auth::CurrentUser;

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(AppError::not_authenticated)
    }
}
