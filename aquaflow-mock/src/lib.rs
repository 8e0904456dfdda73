//! aquaflow-mock — in-memory AquaFlow backend
//!
//! Speaks the same REST dialect as the school's backend (paths, Portuguese
//! field names, `{"detail": ...}` errors, JWT bearer auth) so the client can
//! be exercised end to end without a database.

pub mod api;
pub mod auth;
pub mod config;
pub mod state;
pub mod store;

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::MockConfig;
pub use state::AppState;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Requests served at once
const MAX_CONCURRENT_REQUESTS: usize = 100;

/// Every route, without middleware or state
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(api::health::router())
        .merge(api::auth::router())
        .merge(api::students::router())
        .merge(api::payments::router())
        .merge(api::schedules::router())
        .merge(api::instructors::router())
        .merge(api::plans::router())
        .merge(api::users::router())
}

/// Routes plus authentication, CORS, request tracing and a concurrency cap
pub fn build_app(state: AppState) -> Router {
    build_router()
        // innermost: resolves CurrentUser before any handler runs
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
        .with_state(state)
}

/// Serve on an already bound listener until the task is dropped
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, build_app(state)).await
}

/// A server running in the background on an ephemeral port
#[derive(Debug)]
pub struct MockServer {
    pub addr: SocketAddr,
    pub state: AppState,
    handle: tokio::task::JoinHandle<()>,
}

impl MockServer {
    /// Bind `127.0.0.1:0` and serve in a background task
    pub async fn spawn(config: MockConfig) -> Result<Self, BoxError> {
        let state = AppState::new(&config)?;
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let server_state = state.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = serve(listener, server_state).await {
                tracing::error!("Mock server error: {e}");
            }
        });
        tracing::debug!(%addr, "Mock server started");

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
