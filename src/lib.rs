//! Cedar: aggregate loggers for multi-process programs.
//!
//! One logical logger fans every call out to several transports. In a worker
//! process the same logger forwards its calls to the coordinator process,
//! which routes them to the coordinator-side logger with the same identity.

pub mod config;
pub mod coordinator;
pub mod identity;
pub mod lifecycle;
pub mod logger;
pub mod observability;
pub mod serialize;
pub mod spec;
pub mod transport;
pub mod wire;
pub mod worker;

pub use config::schema::CedarConfig;
pub use coordinator::{Coordinator, CoordinatorRouter, Registry, RouteOutcome};
pub use identity::{derive_identity, Identity};
pub use lifecycle::Shutdown;
pub use logger::{AggregateLogger, Level, Logger, Role};
pub use serialize::{SafeSerializer, Value};
pub use spec::LoggerSpec;
pub use transport::StandardTransports;
pub use worker::{WorkerChannel, WorkerId};
