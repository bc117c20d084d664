use std::sync::Arc;

use lolprofile::config::Config;
use lolprofile::error::AppError;
use lolprofile::riot::RiotClient;
use lolprofile::web::{AppState, build_router};
use lolprofile::{db, logging};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    logging::init();

    info!(version = env!("CARGO_PKG_VERSION"), "🐙 Starting lolprofile");

    if let Err(e) = run().await {
        error!(error = %e, "💥 Fatal error");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;

    let pool = db::connect(&config.database_url).await?;
    let riot = RiotClient::new(config.riot_api_key.clone(), config.riot_rate_limit_per_second);

    let state = Arc::new(AppState {
        pool,
        riot: Arc::new(riot),
        settings: config.reconcile.clone(),
    });

    let listener = TcpListener::bind(config.bind_addr.as_str()).await?;
    info!(addr = %config.bind_addr, "🌐 Listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}
