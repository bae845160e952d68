//! Periodic background cycles: expired-candidate cleanup and weight
//! adaptation.
//!
//! Both run on their own tokio tasks and stop cleanly on shutdown,
//! finishing any in-flight iteration before exiting.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use deferlink_core::config::MaintenanceConfig;

use crate::coordinator::Resolver;

/// Handle over the spawned background tasks.
pub struct MaintenanceHandle {
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl MaintenanceHandle {
    /// Signal both cycles to stop and wait for them to drain.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "maintenance task did not exit cleanly");
            }
        }
    }
}

/// Start the cleanup and adaptation cycles for `resolver`.
pub fn spawn(resolver: Arc<Resolver>, config: &MaintenanceConfig) -> MaintenanceHandle {
    let (shutdown, _) = watch::channel(false);

    let cleanup = tokio::spawn(cleanup_cycle(
        Arc::clone(&resolver),
        Duration::from_secs(config.cleanup_interval_secs),
        shutdown.subscribe(),
    ));
    let adaptation = tokio::spawn(adaptation_cycle(
        resolver,
        Duration::from_secs(config.adaptation_interval_secs),
        config.auto_optimize_weights,
        shutdown.subscribe(),
    ));

    MaintenanceHandle {
        shutdown,
        tasks: vec![cleanup, adaptation],
    }
}

async fn cleanup_cycle(
    resolver: Arc<Resolver>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                tracing::debug!("cleanup cycle stopping");
                return;
            }
            _ = tokio::time::sleep(interval) => {}
        }
        match resolver.cleanup_expired() {
            Ok(deleted) => {
                tracing::debug!(deleted, "cleanup cycle ran");
            }
            Err(e) => {
                tracing::warn!(error = %e, "cleanup cycle failed");
            }
        }
        // Bound memo-cache memory on the same cadence.
        resolver.clear_caches();
    }
}

async fn adaptation_cycle(
    resolver: Arc<Resolver>,
    interval: Duration,
    auto_optimize: bool,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                tracing::debug!("adaptation cycle stopping");
                return;
            }
            _ = tokio::time::sleep(interval) => {}
        }
        if !auto_optimize {
            continue;
        }
        if let Err(e) = resolver.adapt_weights() {
            tracing::warn!(error = %e, "weight adaptation cycle failed");
        }
    }
}
