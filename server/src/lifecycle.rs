//! Process lifecycle: serve until told to stop, then tear down in order.
//!
//! `serve` runs the HTTP listener on a background task and waits for the
//! caller's shutdown future. When it resolves, teardown is strictly ordered:
//!
//! 1. the listener stops accepting new connections,
//! 2. the store is disconnected (bounded by `storage_timeout`),
//! 3. in-flight requests get `shutdown_grace` to finish.
//!
//! Either step failing is fatal and comes back as `LifecycleError`.

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::store::{StoreError, TodoStore};

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("failed to disconnect from the document store: {0}")]
    Disconnect(#[source] StoreError),

    #[error("server did not shut down within {0:?}")]
    GraceExceeded(Duration),

    #[error("server error: {0}")]
    Serve(#[source] io::Error),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Time budgets for the two teardown steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownBudget {
    pub storage_timeout: Duration,
    pub shutdown_grace: Duration,
}

/// Serves `router` on `listener` until `shutdown` resolves, then disconnects
/// `store` and drains the listener.
///
/// If the listener fails on its own before any shutdown signal, the store is
/// still disconnected and the listener's error is returned.
pub async fn serve<F>(
    listener: TcpListener,
    router: Router,
    store: Arc<dyn TodoStore>,
    budget: ShutdownBudget,
    shutdown: F,
) -> Result<(), LifecycleError>
where
    F: Future<Output = ()> + Send,
{
    let (stop_tx, mut stop_rx) = watch::channel(false);
    let server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.wait_for(|stop| *stop).await;
            })
            .await
    });

    supervise(server, stop_tx, store.as_ref(), budget, shutdown).await
}

/// Drives the ordered teardown of an already running server task.
///
/// The stop signal goes out as soon as shutdown begins, so no connection is
/// accepted while the store disconnects. The grace period for in-flight
/// requests starts once the disconnect has finished.
async fn supervise<F>(
    mut server: JoinHandle<io::Result<()>>,
    stop_tx: watch::Sender<bool>,
    store: &dyn TodoStore,
    budget: ShutdownBudget,
    shutdown: F,
) -> Result<(), LifecycleError>
where
    F: Future<Output = ()> + Send,
{
    let stopped_early = tokio::select! {
        () = shutdown => None,
        joined = &mut server => Some(joined),
    };

    if let Some(joined) = stopped_early {
        tracing::error!("Server stopped before a shutdown signal");
        disconnect(store, budget.storage_timeout).await?;
        return joined?.map_err(LifecycleError::Serve);
    }

    tracing::info!("Closing the listener to new connections");
    let _ = stop_tx.send(true);

    tracing::info!("Disconnecting from the document store");
    if let Err(error) = disconnect(store, budget.storage_timeout).await {
        server.abort();
        return Err(error);
    }

    tracing::info!(grace = ?budget.shutdown_grace, "Draining in-flight requests");
    match tokio::time::timeout(budget.shutdown_grace, &mut server).await {
        Ok(joined) => joined?.map_err(LifecycleError::Serve)?,
        Err(_) => {
            server.abort();
            return Err(LifecycleError::GraceExceeded(budget.shutdown_grace));
        }
    }

    tracing::info!("Server shutdown gracefully");
    Ok(())
}

async fn disconnect(store: &dyn TodoStore, timeout: Duration) -> Result<(), LifecycleError> {
    match tokio::time::timeout(timeout, store.disconnect()).await {
        Ok(result) => result.map_err(LifecycleError::Disconnect),
        Err(_) => Err(LifecycleError::Disconnect(StoreError::Timeout(timeout))),
    }
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, initiating shutdown"),
        () = terminate => tracing::info!("Received SIGTERM, initiating shutdown"),
    }
}
