use anyhow::{anyhow, Context, Result};
use marketplace_dash::config::AppConfig;
use marketplace_dash::router::create_api_router;
use marketplace_dash::state::AppState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing().context("initialize tracing subscriber")?;

    if let Err(err) = run().await {
        tracing::error!(error = ?err, "fatal dashboard error");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let config = AppConfig::load().context("load configuration from environment")?;
    let listen_addr = config.listen_addr;

    info!(
        publisher = %config.publisher,
        default_extension = %config.default_extension,
        stats_days = config.stats_days,
        use_mock_data = config.use_mock_data,
        "configuration loaded"
    );

    let state = AppState::new(config).context("initialize application state")?;
    let app = create_api_router(state);

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("bind HTTP listener on {listen_addr}"))?;
    info!(address = %listen_addr, "Marketplace dashboard online");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "ctrl_c listener error; running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, exiting");
}

fn init_tracing() -> Result<()> {
    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info,hyper=warn,tower_http=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("tracing subscriber init: {err}"))
}
