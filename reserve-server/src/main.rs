//! reserve-server — table reservation scheduling service
//!
//! Long-running service that:
//! - Books tables against half-open time windows (no double-booking)
//! - Answers availability queries for a window + party size
//! - Drives the reservation status lifecycle with an audit trail
//! - Pushes status changes to subscribed WebSocket clients

use reserve_server::{AppState, Config, api, init_logger_with_file};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env();
    init_logger_with_file(None, config.log_dir.as_deref());

    tracing::info!("Starting reserve-server (env: {})", config.environment);

    // Initialize application state (opens the database, runs migrations)
    let state = AppState::new(&config).await?;

    let app = api::router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("reserve-server HTTP listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
