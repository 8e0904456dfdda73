//! Shared server state

use std::sync::Arc;
use tokio::sync::RwLock;

use shared::{AppError, AppResult};

use crate::auth::{JwtService, hash_password};
use crate::config::MockConfig;
use crate::store::Store;

/// Cloned into every handler; clones share the same store
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<RwLock<Store>>,
    pub jwt: Arc<JwtService>,
}

impl AppState {
    /// Empty store with the configured admin seeded
    pub fn new(config: &MockConfig) -> AppResult<Self> {
        let hash = hash_password(&config.admin_password)
            .map_err(|e| AppError::internal(format!("Failed to hash seed password: {e}")))?;

        let mut store = Store::new();
        let admin = store.seed_admin(&config.admin_email, hash);
        tracing::info!(user_id = admin.id, email = %admin.email, "Seeded admin user");

        Ok(Self {
            store: Arc::new(RwLock::new(store)),
            jwt: Arc::new(JwtService::new(
                &config.jwt_secret,
                config.jwt_expiration_minutes,
            )),
        })
    }
}
