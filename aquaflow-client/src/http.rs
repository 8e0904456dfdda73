// aquaflow-client/src/http.rs
// HTTP client - network communication

//! HTTP client wrapper
//!
//! Every request carries `Authorization: Bearer <token>` taken from the
//! injected [`Session`]. A `401` clears the session (memory and storage) and
//! surfaces as [`ClientError::Unauthorized`]; the redirect itself is left to
//! the [`RouterGuard`](crate::guard::RouterGuard). No retry, no backoff.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::ErrorBody;

use crate::config::ClientConfig;
use crate::session::{Credentials, Session};
use crate::{ClientError, ClientResult};

/// HTTP client trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn get_with_query<T: DeserializeOwned, Q: Serialize + Sync>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T>;
    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    /// The session this client authenticates with
    fn session(&self) -> &Session;
}

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig, session: Session) -> ClientResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout_duration())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> (RequestBuilder, Credentials) {
        let credentials = self.session.credentials();
        let mut req = self.client.request(method, self.url(path));
        if let Some(token) = &credentials.token {
            req = req.bearer_auth(token);
        }
        (req, credentials)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        credentials: Credentials,
    ) -> ClientResult<T> {
        let response = req.send().await?;
        tracing::debug!(
            path = %response.url().path(),
            status = response.status().as_u16(),
            "Response received"
        );
        self.handle_response(response, &credentials).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        credentials: &Credentials,
    ) -> ClientResult<T> {
        let status = response.status();

        // A 401 without a token (e.g. wrong password on login) expires nothing
        if status == StatusCode::UNAUTHORIZED && credentials.token.is_some() {
            if self.session.expire(credentials.generation) {
                tracing::warn!(url = %response.url(), "Session expired, redirect to login pending");
            }
            return Err(ClientError::Unauthorized);
        }

        let text = response.text().await?;

        if !status.is_success() {
            // The backend's error body: {"detail": "...", "code": ...}
            if let Ok(body) = serde_json::from_str::<ErrorBody>(&text) {
                return Err(ClientError::Api {
                    status,
                    code: body.error_code(),
                    detail: body.detail,
                });
            }
            return match status {
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    Err(ClientError::Validation(text))
                }
                _ => Err(ClientError::Internal(text)),
            };
        }

        // 204 and empty bodies decode as `null` (fine for `()` and `Option<_>`)
        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        Ok(serde_json::from_str(body)?)
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let (req, credentials) = self.request(Method::GET, path);
        self.send(req, credentials).await
    }

    async fn get_with_query<T: DeserializeOwned, Q: Serialize + Sync>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let (req, credentials) = self.request(Method::GET, path);
        self.send(req.query(query), credentials).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let (req, credentials) = self.request(Method::POST, path);
        self.send(req.json(body), credentials).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let (req, credentials) = self.request(Method::POST, path);
        self.send(req, credentials).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let (req, credentials) = self.request(Method::PUT, path);
        self.send(req.json(body), credentials).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let (req, credentials) = self.request(Method::DELETE, path);
        self.send(req, credentials).await
    }

    fn session(&self) -> &Session {
        &self.session
    }
}
