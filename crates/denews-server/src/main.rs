mod dto;
mod error;
mod extract;
mod handlers;
mod routes;
mod services;
mod state;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use anyhow::{Context, Result};
use denews_config::Config;
use tracing::info;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = Config::from_env().context("invalid configuration")?;
    let state = Arc::new(AppState::from_config(&config)?);
    let app = routes::build_router(state, &config.server);

    let addr = config.server.bind_addr();
    info!("Starting server on {}", addr);
    info!("CORS origins: {}", config.server.allowed_origins.join(", "));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
