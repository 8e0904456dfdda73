//! AquaFlow Client - typed client for the AquaFlow backend
//!
//! Session handling, the HTTP wrapper and resource APIs, plus the view
//! models behind the dashboard screens (enrollment, schedule grid, finance).

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod enrollment;
pub mod error;
pub mod grid;
pub mod guard;
pub mod http;
pub mod session;
pub mod whatsapp;

pub use api::Api;
pub use auth::AuthStore;
pub use config::{ClientConfig, ConfigError};
pub use dashboard::Dashboard;
pub use enrollment::{EnrollmentError, EnrollmentManager};
pub use error::{ClientError, ClientResult};
pub use grid::ScheduleGrid;
pub use guard::{Navigator, RouterGuard};
pub use http::{HttpClient, NetworkHttpClient};
pub use session::{AuthStorage, PersistedAuth, Session, StorageError};

// Re-export shared types for convenience
pub use shared::client::{EnrollmentReceipt, TokenResponse};
