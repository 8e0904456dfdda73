//! aquaflow-mock — in-memory AquaFlow backend for local development

use aquaflow_mock::{AppState, BoxError, MockConfig};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aquaflow_mock=info,tower_http=info".into()),
        )
        .init();

    let config = MockConfig::from_env();
    let state = AppState::new(&config)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        "aquaflow-mock listening on {} (login: {})",
        config.bind_addr,
        config.admin_email
    );

    aquaflow_mock::serve(listener, state).await?;
    Ok(())
}
