//! Graceful shutdown trigger.

use std::fmt::Display;
use std::future::Future;

use tracing::{error, info};

/// Resolve once `signal` fires.
///
/// A signal source that fails to install never resolves, so the server
/// keeps running instead of stopping right after startup.
pub async fn shutdown_on<F, E>(signal: F)
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match signal.await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
