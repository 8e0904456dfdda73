//! Auth API

use shared::client::{LoginRequest, TokenResponse};
use shared::models::User;

use crate::ClientResult;
use crate::http::HttpClient;

/// `POST /auth/login`, `GET /auth/me`, `POST /auth/refresh`
pub struct AuthApi<'a, C> {
    http: &'a C,
}

impl<'a, C: HttpClient> AuthApi<'a, C> {
    pub(crate) fn new(http: &'a C) -> Self {
        Self { http }
    }

    /// Exchange credentials for a bearer token (does not touch the session)
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<TokenResponse> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.http.post("/auth/login", &req).await
    }

    /// Current user information
    pub async fn me(&self) -> ClientResult<User> {
        self.http.get("/auth/me").await
    }

    /// Trade the current token for a fresh one
    pub async fn refresh(&self) -> ClientResult<TokenResponse> {
        self.http.post_empty("/auth/refresh").await
    }
}
