//! Shared utilities for integration tests.

use std::sync::Arc;
use std::time::Duration;

use cedar::coordinator::{Coordinator, CoordinatorRouter, Registry};
use cedar::lifecycle::Shutdown;
use cedar::logger::{AggregateLogger, Role};
use cedar::spec::LoggerSpec;
use cedar::transport::{MemorySink, StandardTransports};
use cedar::wire::{FramedCodec, WireCodec};
use cedar::worker::{WorkerChannel, WorkerId};
use tokio::task::JoinHandle;

pub fn spec(value: serde_json::Value) -> LoggerSpec {
    serde_json::from_value(value).unwrap()
}

/// A coordinator with memory transports and in-process worker pipes.
pub struct Harness {
    pub transports: Arc<StandardTransports>,
    pub registry: Registry,
    pub coordinator: Coordinator,
    pub shutdown: Shutdown,
    codec: Arc<dyn WireCodec>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_codec(Arc::new(FramedCodec))
    }

    pub fn with_codec(codec: Arc<dyn WireCodec>) -> Self {
        let registry = Registry::new();
        Self {
            transports: Arc::new(StandardTransports::new()),
            coordinator: Coordinator::new(CoordinatorRouter::new(registry.clone(), Arc::clone(&codec))),
            registry,
            shutdown: Shutdown::new(),
            codec,
        }
    }

    /// Build and register a coordinator-side logger.
    pub fn coordinator_logger(&self, value: serde_json::Value) -> AggregateLogger {
        let role = Role::coordinator(self.registry.clone(), self.transports.clone());
        AggregateLogger::new(&spec(value), &role).unwrap()
    }

    /// Open a pipe from a new worker channel into the coordinator.
    pub fn connect(&self, worker: WorkerId) -> WorkerPipe {
        let (worker_end, coordinator_end) = tokio::io::duplex(64 * 1024);
        let (channel, writer) = WorkerChannel::spawn_writer(worker_end);
        let reader = self
            .coordinator
            .attach(worker, coordinator_end, self.shutdown.subscribe());
        WorkerPipe {
            channel,
            codec: Arc::clone(&self.codec),
            writer,
            reader,
        }
    }

    pub fn sinks(&self) -> Vec<MemorySink> {
        self.transports.memory_sinks()
    }
}

/// Worker end of a connected pipe.
pub struct WorkerPipe {
    channel: WorkerChannel,
    codec: Arc<dyn WireCodec>,
    writer: JoinHandle<()>,
    reader: JoinHandle<()>,
}

impl WorkerPipe {
    /// Build a worker-side logger on this pipe.
    pub fn logger(&self, value: serde_json::Value) -> AggregateLogger {
        let role = Role::worker(self.channel.clone()).with_codec(Arc::clone(&self.codec));
        AggregateLogger::new(&spec(value), &role).unwrap()
    }

    pub fn channel(&self) -> &WorkerChannel {
        &self.channel
    }

    /// Close the pipe and wait until the coordinator has routed everything.
    ///
    /// Every logger built from this pipe must be dropped first.
    pub async fn finish(self) {
        drop(self.channel);
        within(self.writer).await;
        within(self.reader).await;
    }
}

/// Await a task, failing the test if it hangs.
pub async fn within(handle: JoinHandle<()>) {
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("task did not finish in time")
        .expect("task panicked");
}
