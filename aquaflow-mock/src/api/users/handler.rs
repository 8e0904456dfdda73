//! User management handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use http::StatusCode;
use serde::Serialize;
use shared::client::UserFilter;
use shared::models::{User, UserCreate, UserUpdate};
use shared::{AppError, AppResult, ErrorCode};
use validator::Validate;

use crate::auth::{CurrentUser, hash_password};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UserDeactivated {
    message: &'static str,
    user_id: i64,
}

fn hash(password: &str) -> AppResult<String> {
    hash_password(password).map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

/// GET /users?skip=&limit=&role=&is_active=
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<UserFilter>,
) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.store.read().await.list_users(&filter)))
}

/// GET /users/:id
pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<User>> {
    let store = state.store.read().await;
    let user = store
        .user(id)
        .cloned()
        .ok_or_else(|| AppError::with_message(ErrorCode::UserNotFound, "Usuário não encontrado"))?;
    Ok(Json(user))
}

/// POST /users
pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<UserCreate>,
) -> AppResult<(StatusCode, Json<User>)> {
    payload.validate()?;
    let password_hash = hash(&payload.password)?;
    let user = state.store.write().await.create_user(payload, password_hash)?;
    tracing::info!(user_id = user.id, role = user.role.as_str(), by = current.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /users/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<User>> {
    payload.validate()?;
    let password_hash = payload.password.as_deref().map(hash).transpose()?;
    Ok(Json(
        state
            .store
            .write()
            .await
            .update_user(id, payload, password_hash)?,
    ))
}

/// DELETE /users/:id - soft delete, never oneself
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<UserDeactivated>> {
    state.store.write().await.deactivate_user(id, current.id)?;
    tracing::info!(user_id = id, by = current.id, "User deactivated");
    Ok(Json(UserDeactivated {
        message: "Usuário desativado com sucesso",
        user_id: id,
    }))
}

/// POST /users/:id/activate
pub async fn activate(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    let user = state.store.write().await.activate_user(id)?;
    tracing::info!(user_id = id, by = current.id, "User reactivated");
    Ok(Json(user))
}
