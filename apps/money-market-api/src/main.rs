//! Money Market API Binary
//!
//! Starts the Compound money-market HTTP API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin money-market-api
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `RPC_URL` (or `INFURA_URL`): Ethereum JSON-RPC endpoint
//! - `PRIVATE_KEY`: Signing key for supply / borrow / repay
//! - `WALLET_ADDRESS`: Address of the signing key
//!
//! ## Optional
//! - `CONFIG_PATH`: YAML config file (default: `config.yaml` if present)
//! - `HTTP_PORT`: HTTP server port (default: 4000)
//! - `CHAIN_ID`: Skip the `eth_chainId` lookup at startup
//! - `BLOCKS_PER_MINUTE`: Block cadence used for APY (default: 4)
//! - `METRICS_ENABLED` / `METRICS_PORT`: Prometheus exporter (default: off, 9090)
//! - `RUST_LOG`: Log filter (overrides `LOG_LEVEL`)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use money_market_api::config::{Config, load_config};
use money_market_api::infrastructure::compound::{CompoundAdapter, CompoundConfig, mainnet_markets};
use money_market_api::infrastructure::http::{AppState, create_router};
use money_market_api::observability::{MetricsConfig, init_metrics, init_tracing};
use money_market_api::{BlockCadence, TokenAllowList};
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config = load_config(None).context("failed to load configuration")?;
    init_tracing(&config.observability.logging).context("failed to initialize logging")?;

    tracing::info!("Starting Money Market API");

    if config.observability.metrics.enabled {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.observability.metrics.port));
        init_metrics(&MetricsConfig::with_addr(addr))
            .context("failed to start metrics exporter")?;
        tracing::info!(%addr, "Prometheus metrics exporter listening");
    }

    let cadence = config.rates.cadence();
    log_config(&config, cadence);

    let allow_list = Arc::new(TokenAllowList::new(mainnet_markets()));
    let lending = create_lending(&config, &allow_list).await?;
    let state = AppState::new(
        lending,
        Arc::clone(&allow_list),
        cadence,
        env!("CARGO_PKG_VERSION"),
    );

    start_http_server(&config, state).await?;

    tracing::info!("Money Market API stopped");
    Ok(())
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Log the parsed configuration. The private key is never logged.
fn log_config(config: &Config, cadence: BlockCadence) {
    tracing::info!(
        http_port = config.server.http_port,
        bind_address = %config.server.bind_address,
        wallet = %config.chain.wallet_address,
        chain_id = ?config.chain.chain_id,
        request_timeout_secs = config.chain.request_timeout_secs,
        confirmations = config.chain.confirmations,
        blocks_per_minute = cadence.blocks_per_minute(),
        blocks_per_year = cadence.blocks_per_year(),
        metrics_enabled = config.observability.metrics.enabled,
        "Configuration loaded"
    );
}

/// Connect the Compound adapter for every allow-listed market.
async fn create_lending(
    config: &Config,
    allow_list: &TokenAllowList,
) -> anyhow::Result<Arc<CompoundAdapter>> {
    let compound_config = CompoundConfig::from(&config.chain);
    let adapter = CompoundAdapter::connect(&compound_config, allow_list.markets())
        .await
        .context("failed to connect to the Ethereum node")?;

    tracing::info!(
        wallet = %format!("{:#x}", adapter.wallet()),
        markets = ?allow_list.symbols(),
        "CompoundAdapter initialized"
    );

    Ok(Arc::new(adapter))
}

/// Serve the HTTP API until a shutdown signal arrives.
async fn start_http_server(
    config: &Config,
    state: AppState<CompoundAdapter>,
) -> anyhow::Result<()> {
    let app = create_router(state);

    let http_addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.http_port)
        .parse()
        .context("invalid bind address")?;

    tracing::info!(%http_addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /compound_rates");
    tracing::info!("  POST /supply_usdc");
    tracing::info!("  POST /borrow_dai");
    tracing::info!("  POST /repay_dai");
    tracing::info!("  GET  /compound/supported-tokens");
    tracing::info!("  POST /compound/supply");
    tracing::info!("  POST /compound/borrow");
    tracing::info!("  POST /compound/repay");
    tracing::info!("  GET  /compound/rates/{{token}}");

    let listener = TcpListener::bind(http_addr)
        .await
        .with_context(|| format!("failed to bind {http_addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
