use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pr_relay::config::Config;
use pr_relay::delivery::DiscordWebhookClient;
use pr_relay::server::{AppState, build_router};

/// Used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "pr_relay=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal in production.
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if config.routes.is_empty() {
        tracing::warn!("No DISCORD_WEBHOOK_* variables set; every event will be dropped");
    }
    for repo in config.routes.repos() {
        tracing::info!(repo, "Routing repository to Discord");
    }
    tracing::info!(users = config.directory.len(), "Loaded Discord user directory");
    tracing::info!(
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window.as_secs(),
        "Rate limiting webhook endpoint"
    );

    let client = DiscordWebhookClient::new(config.delivery_timeout)
        .context("failed to build Discord HTTP client")?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = build_router(AppState::from_config(config, client));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Ctrl-C received, shutting down");
}
