//! Process lifecycle: wiring a coordinator or a worker from configuration.
//!
//! # Data Flow
//! ```text
//! Coordinator (startup.rs):
//!     Load config → build registry + coordinator loggers
//!     → spawn worker processes (ids from 1) → attach their stdout
//!     → wait for every worker, or ctrl-c
//!
//! Worker (startup.rs):
//!     Load config → build worker loggers on a stdout channel
//!     → emit calls → drain channel → exit
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     ctrl-c → broadcast → reader tasks stop → workers killed
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Coordinator and workers read the same config file, so both sides derive
//!   the same identities without a handshake

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use signals::spawn_ctrl_c_handler;
pub use startup::{
    build_loggers, run_coordinator, run_worker, spawn_worker, LoggerGroup, StartupError,
};
