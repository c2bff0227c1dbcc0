//! HTTP surface for neurapress document sync.
//!
//! This server:
//! - Reads markdown files and their revision from a GitHub repository
//! - Commits edits with optimistic-concurrency conflict detection
//! - Saves rendered HTML as WeChat drafts
//! - Imports WeChat markdown into the repository under a dated path

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use neurapress_core::ReqwestTransport;
use neurapress_github::GitHubClient;
use neurapress_wechat::WeChatClient;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod handlers;

use config::Config;
use handlers::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();

    info!("Starting neurapress-server v{}", env!("CARGO_PKG_VERSION"));
    info!("  Host: {}", config.host);
    info!("  Port: {}", config.port);

    let github_settings = config.github_settings();
    let wechat_settings = config.wechat_settings();

    if github_settings.is_configured() {
        info!(
            "  GitHub: {}/{} (default branch {})",
            github_settings.owner.as_deref().unwrap_or_default(),
            github_settings.repository.as_deref().unwrap_or_default(),
            github_settings.default_branch
        );
    } else {
        warn!("  GitHub: NOT CONFIGURED (set GITHUB_TOKEN, GITHUB_OWNER and GITHUB_REPO)");
    }
    if wechat_settings.is_configured() {
        info!("  WeChat: draft publishing enabled");
    } else {
        warn!("  WeChat: NOT CONFIGURED (set WECHAT_ACCESS_TOKEN)");
    }

    // One HTTP client shared by both remote stores
    let transport = Arc::new(ReqwestTransport::new(
        config.http_timeout_secs.map(Duration::from_secs),
    )?);

    let state = AppState {
        github: Arc::new(GitHubClient::new(transport.clone(), github_settings)),
        wechat: Arc::new(WeChatClient::new(transport, wechat_settings)),
        paths: config.path_settings(),
    };

    let app = router(state);

    // Bind and serve
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, initiating shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
        info!("Received SIGTERM, initiating shutdown");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
