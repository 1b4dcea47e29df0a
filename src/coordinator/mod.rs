//! Coordinator subsystem.
//!
//! # Data Flow
//! ```text
//! worker channel (one line per payload)
//!     → server.rs (one reader task per worker, in order)
//!     → router.rs (WireCodec::decode, registry lookup, method → Level)
//!     → registry.rs (identity → CoordinatorLogger)
//!     → CoordinatorLogger::dispatch (skip leaves bound to other workers)
//! ```
//!
//! # Design Decisions
//! - The registry is an explicit value, not process-global state
//! - Unknown identities and methods are discarded, never errors
//! - tracker.rs counts online workers for orderly exit

pub mod registry;
pub mod router;
pub mod server;
pub mod tracker;

pub use registry::Registry;
pub use router::{CoordinatorRouter, RouteOutcome};
pub use server::Coordinator;
pub use tracker::{WorkerGuard, WorkerTracker};
