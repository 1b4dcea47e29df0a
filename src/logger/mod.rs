//! Logger capability set and the aggregate logger.
//!
//! # Data Flow
//! ```text
//! Coordinator process:
//!     AggregateLogger::Coordinator.warn(args)
//!         → every LeafLogger.warn(args), in spec order
//!         → level filter → stringify → Sink
//!
//! Worker process:
//!     AggregateLogger::Worker.warn(args)
//!         → WireMessage {identity, "warn", args}
//!         → WireCodec::encode → WorkerChannel::send
//! ```
//!
//! # Design Decisions
//! - Role is an explicit construction argument, fixed for the logger's life
//! - Both variants expose the same [`Logger`] capability set
//! - Coordinator loggers register themselves in an explicit [`crate::coordinator::Registry`]

pub mod aggregate;
pub mod leaf;
pub mod level;

pub use aggregate::{AggregateLogger, BuildError, CoordinatorLogger, Role, WorkerLogger};
pub use leaf::LeafLogger;
pub use level::{Level, LevelFilter, UnknownLevel};

use crate::serialize::Value;
use crate::worker::WorkerId;

/// Where a call entered the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Called directly in the coordinator process.
    Local,
    /// Forwarded by a worker.
    Worker(WorkerId),
}

/// One entry point per severity level.
pub trait Logger {
    fn write(&self, level: Level, args: &[Value]);

    fn error(&self, args: &[Value]) {
        self.write(Level::Error, args);
    }

    fn warn(&self, args: &[Value]) {
        self.write(Level::Warn, args);
    }

    fn info(&self, args: &[Value]) {
        self.write(Level::Info, args);
    }

    /// Also the default entry point.
    fn log(&self, args: &[Value]) {
        self.write(Level::Log, args);
    }

    fn trace(&self, args: &[Value]) {
        self.write(Level::Trace, args);
    }

    fn debug(&self, args: &[Value]) {
        self.write(Level::Debug, args);
    }
}
