//! Mock backend configuration
//!
//! | Variable | Default |
//! |----------|---------|
//! | `MOCK_BIND_ADDR` | `127.0.0.1:8000` |
//! | `JWT_SECRET` | development secret |
//! | `JWT_EXPIRATION_MINUTES` | `1440` |
//! | `SEED_ADMIN_EMAIL` | `admin@aquaflow.com` |
//! | `SEED_ADMIN_PASSWORD` | `admin123` |

use std::net::SocketAddr;

pub const DEFAULT_EXPIRATION_MINUTES: i64 = 1440;

const DEV_JWT_SECRET: &str = "aquaflow-mock-development-secret-change-me";

#[derive(Debug, Clone)]
pub struct MockConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub jwt_expiration_minutes: i64,
    pub admin_email: String,
    pub admin_password: String,
}

impl MockConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let bind_addr = std::env::var("MOCK_BIND_ADDR")
            .ok()
            .and_then(|s| match s.parse() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    tracing::warn!(value = %s, error = %e, "Ignoring invalid MOCK_BIND_ADDR");
                    None
                }
            })
            .unwrap_or(defaults.bind_addr);

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using the development secret");
            defaults.jwt_secret.clone()
        });

        Self {
            bind_addr,
            jwt_secret,
            jwt_expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_EXPIRATION_MINUTES),
            admin_email: std::env::var("SEED_ADMIN_EMAIL").unwrap_or(defaults.admin_email),
            admin_password: std::env::var("SEED_ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
        }
    }

    pub fn with_expiration_minutes(mut self, minutes: i64) -> Self {
        self.jwt_expiration_minutes = minutes;
        self
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiration_minutes: DEFAULT_EXPIRATION_MINUTES,
            admin_email: "admin@aquaflow.com".to_string(),
            admin_password: "admin123".to_string(),
        }
    }
}
