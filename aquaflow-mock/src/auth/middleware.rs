//! Authentication middleware
//!
//! [`require_auth`] runs on every route. It validates the bearer token,
//! resolves the user and injects [`CurrentUser`] into the request
//! extensions. The role gates read it back from there.
//!
//! | Failure | Status | Detail |
//! |---------|--------|--------|
//! | No `Authorization` header | 401 | `Não autenticado` |
//! | Bad or expired token | 401 | `Token inválido ou expirado` |
//! | Unknown user | 401 | `Usuário não encontrado` |
//! | Inactive user | 403 | `Usuário inativo` |

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::{AppError, ErrorCode};

use crate::auth::{CurrentUser, JwtService};
use crate::state::AppState;

/// Routes reachable without a token
const PUBLIC_ROUTES: &[&str] = &["/auth/login", "/health"];

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // CORS preflight
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }
    if PUBLIC_ROUTES.contains(&req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Token inválido ou expirado"))?,
        None => {
            tracing::warn!(uri = %req.uri(), "Request without credentials");
            return Err(AppError::with_message(
                ErrorCode::NotAuthenticated,
                "Não autenticado",
            ));
        }
    };

    let claims = state.jwt.validate_token(token).map_err(|e| {
        tracing::warn!(uri = %req.uri(), error = %e, "Token rejected");
        AppError::invalid_token("Token inválido ou expirado")
    })?;

    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::invalid_token("Token inválido ou expirado"))?;

    let current = {
        let store = state.store.read().await;
        let user = store.user(user_id).ok_or_else(|| {
            AppError::with_message(ErrorCode::NotAuthenticated, "Usuário não encontrado")
        })?;
        if !user.is_active {
            return Err(AppError::with_message(
                ErrorCode::AccountDisabled,
                "Usuário inativo",
            ));
        }
        CurrentUser::from(user)
    };

    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

/// Admin or receptionist
pub async fn require_staff(req: Request, next: Next) -> Result<Response, AppError> {
    let user = current_user(&req)?;
    if !user.is_staff() {
        tracing::warn!(user_id = user.id, role = user.role.as_str(), "Staff role required");
        return Err(AppError::forbidden(
            "Acesso negado. Requer uma das roles: admin, recepcionista",
        ));
    }
    Ok(next.run(req).await)
}

pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = current_user(&req)?;
    if !user.is_admin() {
        tracing::warn!(user_id = user.id, role = user.role.as_str(), "Admin role required");
        return Err(AppError::with_message(
            ErrorCode::AdminRequired,
            "Acesso negado. Requer uma das roles: admin",
        ));
    }
    Ok(next.run(req).await)
}

fn current_user(req: &Request) -> Result<&CurrentUser, AppError> {
    req.extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::not_authenticated)
}
