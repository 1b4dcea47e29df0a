//! Per-transport logger.
//!
//! # Responsibilities
//! - Filter calls by level threshold
//! - Turn the argument list into one message
//! - Hand the message to its sink
//! - Carry the worker affinity used by the router

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;

use super::{Level, LevelFilter, Logger, Origin};
use crate::serialize::{SafeSerializer, Value};
use crate::spec::TransportConfig;
use crate::transport::{lock, Sink};
use crate::worker::WorkerId;

/// One concrete logger, owned by a coordinator logger.
pub struct LeafLogger {
    index: usize,
    transport: String,
    worker: Option<WorkerId>,
    /// Encoded [`LevelFilter`].
    filter: AtomicU8,
    serializer: Mutex<SafeSerializer>,
    sink: Box<dyn Sink>,
}

impl LeafLogger {
    /// Build a leaf from its normalized descriptor.
    ///
    /// Honors the `level` and `indent` options; without `indent` the leaf
    /// formats like `default`.
    pub fn new(config: &TransportConfig, sink: Box<dyn Sink>, default: &SafeSerializer) -> Self {
        let serializer = config
            .option_str("indent")
            .map(SafeSerializer::new)
            .unwrap_or_else(|| default.clone());

        let leaf = Self {
            index: config.index,
            transport: config.transport.clone(),
            worker: config.worker,
            filter: AtomicU8::new(LevelFilter::ALL.to_u8()),
            serializer: Mutex::new(serializer),
            sink,
        };

        if let Some(level) = config.option_str("level") {
            leaf.set_level(level);
        }
        leaf
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn transport(&self) -> &str {
        &self.transport
    }

    /// Worker whose messages this leaf renders; `None` means every worker.
    pub fn worker(&self) -> Option<WorkerId> {
        self.worker
    }

    pub fn level(&self) -> LevelFilter {
        LevelFilter::from_u8(self.filter.load(Ordering::Relaxed))
    }

    /// Set the threshold by name.
    ///
    /// `"nothing"` disables every level. An unknown name is reported as a
    /// warning and also disables every level.
    pub fn set_level(&self, name: &str) {
        let filter = match name.parse::<LevelFilter>() {
            Ok(filter) => filter,
            Err(unknown) => {
                tracing::warn!(
                    transport = %self.transport,
                    index = self.index,
                    "{}",
                    unknown
                );
                LevelFilter::Nothing
            }
        };
        self.set_filter(filter);
    }

    pub fn set_filter(&self, filter: LevelFilter) {
        self.filter.store(filter.to_u8(), Ordering::Relaxed);
    }

    pub fn indent(&self) -> String {
        lock(&self.serializer).indent().to_string()
    }

    /// Replace the JSON indentation and line-break indent of later calls.
    pub fn set_indent(&self, indent: impl Into<String>) {
        *lock(&self.serializer) = SafeSerializer::new(indent);
    }

    /// Whether a call from `origin` should reach this leaf.
    pub fn accepts(&self, origin: Origin) -> bool {
        match (origin, self.worker) {
            (Origin::Local, _) | (Origin::Worker(_), None) => true,
            (Origin::Worker(from), Some(bound)) => from == bound,
        }
    }
}

impl Logger for LeafLogger {
    fn write(&self, level: Level, args: &[Value]) {
        if !self.level().enabled(level) {
            return;
        }
        let message = lock(&self.serializer).stringify_arguments(args);
        self.sink.write(level, &message);
    }
}

impl std::fmt::Debug for LeafLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeafLogger")
            .field("index", &self.index)
            .field("transport", &self.transport)
            .field("worker", &self.worker)
            .field("level", &self.level())
            .finish()
    }
}
