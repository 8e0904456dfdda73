//! Auth API handlers

use axum::{Json, extract::State};
use shared::client::{LoginRequest, TokenResponse};
use shared::models::User;
use shared::{AppError, AppResult, ErrorCode};

use crate::auth::{CurrentUser, verify_password};
use crate::state::AppState;

fn issue_token(state: &AppState, user: User) -> AppResult<TokenResponse> {
    let access_token = state
        .jwt
        .generate_token(user.id, &user.email, user.role)
        .map_err(|e| AppError::internal(e.to_string()))?;
    Ok(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: state.jwt.expires_in(),
        user,
    })
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let found = {
        let store = state.store.read().await;
        store
            .user_by_email(&req.email)
            .map(|r| (r.user.id, r.user.is_active, r.password_hash.clone()))
    };

    let Some((user_id, is_active, _)) =
        found.filter(|(_, _, hash)| verify_password(&req.password, hash))
    else {
        tracing::warn!(email = %req.email, "Login failed");
        return Err(AppError::with_message(
            ErrorCode::InvalidCredentials,
            "Email ou senha incorretos",
        ));
    };

    if !is_active {
        tracing::warn!(user_id, "Login refused for inactive user");
        return Err(AppError::with_message(
            ErrorCode::AccountDisabled,
            "Usuário inativo. Contate o administrador.",
        ));
    }

    let user = state.store.write().await.record_login(user_id)?;
    tracing::info!(user_id, email = %user.email, "User logged in");
    Ok(Json(issue_token(&state, user)?))
}

/// GET /auth/me
pub async fn me(State(state): State<AppState>, current: CurrentUser) -> AppResult<Json<User>> {
    let store = state.store.read().await;
    let user = store
        .user(current.id)
        .cloned()
        .ok_or_else(|| AppError::with_message(ErrorCode::UserNotFound, "Usuário não encontrado"))?;
    Ok(Json(user))
}

/// POST /auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    current: CurrentUser,
) -> AppResult<Json<TokenResponse>> {
    let user = state
        .store
        .read()
        .await
        .user(current.id)
        .cloned()
        .ok_or_else(|| AppError::with_message(ErrorCode::UserNotFound, "Usuário não encontrado"))?;
    Ok(Json(issue_token(&state, user)?))
}
