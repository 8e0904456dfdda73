// aquaflow-client/src/session.rs
// Session context and its persisted form

//! Session context
//!
//! [`Session`] is the explicit, injectable authentication context: the HTTP
//! client reads the bearer token from it and clears it on `401`; the router
//! guard consumes the pending redirect. It is cheap to clone and every clone
//! shares the same state, so independent sessions can coexist in one process.
//!
//! The persisted form lives in `auth-storage.json` inside the storage
//! directory and holds `{user, token, isAuthenticated}`.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared::models::User;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Fixed key of the persisted session
pub const STORAGE_KEY: &str = "auth-storage";

/// Persistence error
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// ==================== Persistence ====================

/// What gets written to disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedAuth {
    pub user: Option<User>,
    pub token: Option<String>,
    #[serde(rename = "isAuthenticated")]
    pub is_authenticated: bool,
}

/// JSON file store for [`PersistedAuth`]
#[derive(Debug, Clone)]
pub struct AuthStorage {
    path: PathBuf,
}

impl AuthStorage {
    /// Store at `<dir>/auth-storage.json`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(format!("{STORAGE_KEY}.json")),
        }
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Save the session, creating the directory if needed
    pub fn save(&self, auth: &PersistedAuth) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(auth)?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }

    /// Load the session; a missing or unreadable file yields `None`
    pub fn load(&self) -> Option<PersistedAuth> {
        let json = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&json) {
            Ok(auth) => Some(auth),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring corrupt session file");
                None
            }
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Remove the file; a missing file is not an error
    pub fn delete(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

// ==================== Session ====================

#[derive(Debug, Default)]
struct SessionState {
    user: Option<User>,
    token: Option<String>,
    is_authenticated: bool,
    is_loading: bool,
    notice: Option<String>,
    /// Bumped on every login, logout and expiry
    generation: u64,
    redirect_pending: bool,
}

/// Token and generation captured when a request is sent
#[derive(Debug, Clone)]
pub(crate) struct Credentials {
    pub token: Option<String>,
    pub generation: u64,
}

/// Shared authentication context
#[derive(Debug, Clone)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
    storage: Option<AuthStorage>,
}

impl Session {
    /// Session persisted through `storage`
    pub fn new(storage: AuthStorage) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            storage: Some(storage),
        }
    }

    /// Session that lives only in memory
    pub fn in_memory() -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            storage: None,
        }
    }

    /// Session persisted under `dir`, rehydrated from disk
    pub fn restore_from(dir: impl Into<PathBuf>) -> Self {
        let session = Self::new(AuthStorage::new(dir));
        session.restore();
        session
    }

    /// Rehydrate from storage; with no stored token the session is unauthenticated
    pub fn restore(&self) -> bool {
        let persisted = self
            .storage
            .as_ref()
            .and_then(AuthStorage::load)
            .unwrap_or_default();

        let authenticated = persisted.token.is_some();
        let mut state = self.state.write();
        state.is_authenticated = authenticated;
        state.user = persisted.user.filter(|_| authenticated);
        state.token = persisted.token;
        authenticated
    }

    pub fn storage(&self) -> Option<&AuthStorage> {
        self.storage.as_ref()
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().is_loading
    }

    pub fn set_loading(&self, loading: bool) {
        self.state.write().is_loading = loading;
    }

    /// Last user-facing notice (e.g. why a login failed)
    pub fn notice(&self) -> Option<String> {
        self.state.read().notice.clone()
    }

    pub fn set_notice(&self, notice: Option<String>) {
        self.state.write().notice = notice;
    }

    pub(crate) fn credentials(&self) -> Credentials {
        let state = self.state.read();
        Credentials {
            token: state.token.clone(),
            generation: state.generation,
        }
    }

    /// Store a freshly issued token and persist it
    pub fn establish(&self, user: User, token: String) -> Result<(), StorageError> {
        let persisted = PersistedAuth {
            user: Some(user.clone()),
            token: Some(token.clone()),
            is_authenticated: true,
        };
        {
            let mut state = self.state.write();
            state.generation += 1;
            state.user = Some(user);
            state.token = Some(token);
            state.is_authenticated = true;
            state.redirect_pending = false;
            state.notice = None;
        }
        match &self.storage {
            Some(storage) => storage.save(&persisted),
            None => Ok(()),
        }
    }

    /// Replace the cached user of an authenticated session
    pub fn update_user(&self, user: User) -> Result<(), StorageError> {
        let persisted = {
            let mut state = self.state.write();
            if !state.is_authenticated {
                return Ok(());
            }
            state.user = Some(user);
            PersistedAuth {
                user: state.user.clone(),
                token: state.token.clone(),
                is_authenticated: true,
            }
        };
        match &self.storage {
            Some(storage) => storage.save(&persisted),
            None => Ok(()),
        }
    }

    /// Explicit logout: clear memory and storage, no redirect
    pub fn clear(&self) -> Result<(), StorageError> {
        {
            let mut state = self.state.write();
            state.generation += 1;
            state.user = None;
            state.token = None;
            state.is_authenticated = false;
            state.is_loading = false;
            state.redirect_pending = false;
        }
        match &self.storage {
            Some(storage) => storage.delete(),
            None => Ok(()),
        }
    }

    /// Handle a `401` observed by a request sent under `generation`
    ///
    /// Only the first `401` of a generation clears the session and schedules
    /// a redirect; later ones (concurrent requests, or requests that raced a
    /// new login) are ignored. Returns whether this call did it.
    pub(crate) fn expire(&self, generation: u64) -> bool {
        let mut state = self.state.write();
        if state.generation != generation {
            return false;
        }
        state.generation += 1;
        state.user = None;
        state.token = None;
        state.is_authenticated = false;
        state.redirect_pending = true;

        if let Some(storage) = &self.storage
            && let Err(e) = storage.delete()
        {
            tracing::error!(error = %e, "Failed to remove persisted session");
        }
        true
    }

    /// Consume the pending redirect, if any
    pub fn take_redirect(&self) -> bool {
        std::mem::take(&mut self.state.write().redirect_pending)
    }

    pub fn redirect_pending(&self) -> bool {
        self.state.read().redirect_pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use shared::models::Role;
    use tempfile::TempDir;

    fn user() -> User {
        User {
            id: 1,
            email: "admin@aquaflow.com".into(),
            username: "admin".into(),
            full_name: "Admin".into(),
            role: Role::Admin,
            is_active: true,
            is_superuser: true,
            created_at: NaiveDateTime::default(),
            updated_at: None,
            last_login: None,
        }
    }

    #[test]
    fn test_storage_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = AuthStorage::new(dir.path());
        assert!(storage.load().is_none());
        assert!(storage.path().ends_with("auth-storage.json"));

        let auth = PersistedAuth {
            user: Some(user()),
            token: Some("t".into()),
            is_authenticated: true,
        };
        storage.save(&auth).unwrap();
        assert_eq!(storage.load().unwrap(), auth);

        let raw = std::fs::read_to_string(storage.path()).unwrap();
        assert!(raw.contains("\"isAuthenticated\": true"));

        storage.delete().unwrap();
        assert!(!storage.exists());
        // deleting twice is fine
        storage.delete().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let storage = AuthStorage::new(dir.path());
        std::fs::write(storage.path(), "{not json").unwrap();
        assert!(storage.load().is_none());
    }

    #[test]
    fn test_establish_persists_and_restores() {
        let dir = TempDir::new().unwrap();
        let session = Session::new(AuthStorage::new(dir.path()));
        session.establish(user(), "token-1".into()).unwrap();
        assert!(session.is_authenticated());

        let restored = Session::restore_from(dir.path());
        assert!(restored.is_authenticated());
        assert_eq!(restored.token().as_deref(), Some("token-1"));
        assert_eq!(restored.user().unwrap().username, "admin");
    }

    #[test]
    fn test_clear_removes_storage() {
        let dir = TempDir::new().unwrap();
        let session = Session::new(AuthStorage::new(dir.path()));
        session.establish(user(), "token-1".into()).unwrap();
        session.clear().unwrap();

        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
        assert!(!session.take_redirect());

        let fresh = Session::restore_from(dir.path());
        assert!(!fresh.is_authenticated());
    }

    #[test]
    fn test_restore_without_token_is_unauthenticated() {
        let dir = TempDir::new().unwrap();
        let storage = AuthStorage::new(dir.path());
        storage
            .save(&PersistedAuth {
                user: Some(user()),
                token: None,
                is_authenticated: true,
            })
            .unwrap();

        let session = Session::new(storage);
        assert!(!session.restore());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_expire_once_per_generation() {
        let session = Session::in_memory();
        session.establish(user(), "t".into()).unwrap();
        let creds = session.credentials();

        assert!(session.expire(creds.generation));
        assert!(!session.expire(creds.generation));
        assert!(!session.is_authenticated());

        assert!(session.take_redirect());
        assert!(!session.take_redirect());
    }

    #[test]
    fn test_expire_ignores_requests_from_before_login() {
        let session = Session::in_memory();
        let stale = session.credentials();
        session.establish(user(), "t".into()).unwrap();

        assert!(!session.expire(stale.generation));
        assert!(session.is_authenticated());
        assert!(!session.redirect_pending());
    }

    #[test]
    fn test_clones_share_state() {
        let session = Session::in_memory();
        let other = session.clone();
        session.establish(user(), "t".into()).unwrap();
        assert!(other.is_authenticated());
    }
}
