use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, app};
use tourdesk_core::{ServerConfig, SubmissionService};

/// Main entry point for the tourdesk server
///
/// Resolves configuration once, builds the submission service and serves the REST API until
/// interrupted.
///
/// # Environment Variables
/// - `WEBHOOK_URL`: Forwarding target for accepted bookings (optional)
/// - `PORT`: Listen port (default: 3000)
/// - `TOURDESK_BIND`: Listen host (default: "0.0.0.0")
/// - `TOURDESK_ENV`: `development` or `production` (default: development)
/// - `WEBHOOK_TIMEOUT_SECS`: Forwarding timeout in seconds (default: 30)
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration is invalid or the listener fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tourdesk_run=info".parse()?)
                .add_directive("tourdesk_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = ServerConfig::from_env()?;
    let service = SubmissionService::from_config(&cfg)?;

    match cfg.webhook_url() {
        Some(url) => tracing::info!("++ Forwarding submissions to {}", url),
        None => tracing::warn!("++ WEBHOOK_URL not set; submissions are stored only"),
    }
    tracing::info!("++ Starting tourdesk REST on {} ({})", cfg.bind_addr(), cfg.mode());

    let rest_app = app(AppState::new(service, cfg.mode()));
    let listener = tokio::net::TcpListener::bind(cfg.bind_addr()).await?;
    axum::serve(listener, rest_app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("++ tourdesk stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
