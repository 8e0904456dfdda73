//! Authentication store
//!
//! Thin layer over [`Session`] and the auth API. [`AuthStore::login`] never
//! propagates an error: it returns whether login succeeded and keeps the
//! failure message as the session notice.

use shared::models::User;

use crate::api::Api;
use crate::http::{HttpClient, NetworkHttpClient};
use crate::session::Session;
use crate::ClientResult;

#[derive(Debug, Clone)]
pub struct AuthStore<C = NetworkHttpClient> {
    api: Api<C>,
}

impl<C: HttpClient> AuthStore<C> {
    pub fn new(api: Api<C>) -> Self {
        Self { api }
    }

    pub fn session(&self) -> &Session {
        self.api.session()
    }

    pub fn user(&self) -> Option<User> {
        self.session().user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.session().is_loading()
    }

    /// Last failure message, if any
    pub fn notice(&self) -> Option<String> {
        self.session().notice()
    }

    /// Log in and persist the session; returns `false` on any failure
    pub async fn login(&self, email: &str, password: &str) -> bool {
        let session = self.session();
        session.set_loading(true);
        session.set_notice(None);

        let result = self.api.auth().login(email, password).await;
        session.set_loading(false);

        let token = match result {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(email = %email, error = %e, "Login failed");
                session.set_notice(Some(e.notice()));
                return false;
            }
        };

        let username = token.user.username.clone();
        if let Err(e) = session.establish(token.user, token.access_token) {
            // The in-memory session is usable; only persistence failed
            tracing::error!(error = %e, "Failed to persist session");
        }
        tracing::info!(username = %username, "Logged in");
        true
    }

    /// Clear memory and persisted storage
    pub fn logout(&self) -> ClientResult<()> {
        let username = self.user().map(|u| u.username);
        self.session().clear()?;
        tracing::info!(username = ?username, "Logged out");
        Ok(())
    }

    /// Rehydrate from storage
    pub fn restore(&self) -> bool {
        self.session().restore()
    }

    /// Renew the bearer token before it expires
    pub async fn refresh_token(&self) -> ClientResult<()> {
        let token = self.api.auth().refresh().await?;
        self.session().establish(token.user, token.access_token)?;
        tracing::debug!(expires_in = token.expires_in, "Token refreshed");
        Ok(())
    }

    /// Re-fetch the current user from the backend and keep it in the session
    pub async fn refresh_user(&self) -> ClientResult<User> {
        let user = self.api.auth().me().await?;
        self.session().update_user(user.clone())?;
        Ok(user)
    }
}
