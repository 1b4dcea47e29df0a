//! OS signal handling.
//!
//! Ctrl-c (SIGINT) triggers the shutdown broadcast once. Workers ignore
//! signals: they exit when their work is done or when the coordinator
//! kills them.

use tokio::task::JoinHandle;

use super::Shutdown;

/// Trigger `shutdown` on the first ctrl-c.
pub fn spawn_ctrl_c_handler(shutdown: Shutdown) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                shutdown.trigger();
            }
            Err(e) => tracing::error!(error = %e, "Failed to install ctrl-c handler"),
        }
    })
}
