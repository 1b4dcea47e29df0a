//! Worker-side plumbing.
//!
//! # Data Flow
//! ```text
//! WorkerLogger::info(args)
//!     → WireCodec::encode
//!     → WorkerChannel::send (unbounded queue, never blocks)
//!     → writer task → AsyncWrite (stdout of the worker process)
//!     → coordinator reader task
//! ```
//!
//! # Design Decisions
//! - Fire and forget: a closed channel turns every send into a no-op
//! - One payload per line; payloads never contain raw newlines
//! - Per-worker ordering comes from the single FIFO queue and writer task

pub mod channel;

pub use channel::WorkerChannel;

use std::fmt;
use std::str::FromStr;

/// Identifier of a worker process, assigned by the coordinator from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(u32);

impl WorkerId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}

impl FromStr for WorkerId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}
