//! Structured logging for cedar's own diagnostics.
//!
//! # Design Decisions
//! - Uses tracing with an `EnvFilter`; `RUST_LOG` wins over the configured level
//! - Always writes to stderr: a worker's stdout is its channel to the
//!   coordinator, and the coordinator's stdout belongs to console transports

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter used when neither `RUST_LOG` nor the config provide one.
pub const DEFAULT_FILTER: &str = "cedar=info";

/// Install the global subscriber. Later calls are ignored.
pub fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("cedar={}", config.log_level)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
