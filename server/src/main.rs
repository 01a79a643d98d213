//! Todo service entrypoint.
//!
//! Reads configuration (see `todo_server::config`), connects to the store,
//! and serves until Ctrl+C or SIGTERM. `RUST_LOG` controls log output
//! (default: `todo_server=debug,tower_http=debug`).

use std::process::ExitCode;

use thiserror::Error;
use tokio::net::TcpListener;
use todo_server::{
    app, lifecycle, store, AppState, Config, ConfigError, LifecycleError, ShutdownBudget,
    StoreError,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
enum FatalError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to open the document store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "Fatal error, exiting");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), FatalError> {
    let config = Config::from_env()?;
    tracing::info!(
        storage_mode = ?config.storage_mode,
        database = %config.database,
        collection = %config.collection,
        "Configuration loaded"
    );

    let address = config.listen_address()?;
    let store = store::open(&config).await?;

    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| FatalError::Bind { address, source })?;
    match listener.local_addr() {
        Ok(address) => tracing::info!("Listening on {}", address),
        Err(error) => tracing::warn!(%error, "Could not determine local address"),
    }

    let router = app(AppState::new(store.clone()), config.request_timeout);
    let budget = ShutdownBudget {
        storage_timeout: config.storage_timeout,
        shutdown_grace: config.shutdown_grace,
    };
    lifecycle::serve(listener, router, store, budget, lifecycle::shutdown_signal()).await?;
    Ok(())
}
