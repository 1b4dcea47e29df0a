//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! coordinator / worker / transports produce:
//!     → logging.rs (tracing events on stderr)
//!     → metrics.rs (counters and gauges)
//! ```
//!
//! # Design Decisions
//! - Diagnostics of the aggregation layer never go through the aggregate
//!   loggers themselves
//! - Metrics are cheap no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
