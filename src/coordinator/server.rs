//! Per-worker reader tasks.
//!
//! # Responsibilities
//! - Read one payload per line from each worker channel
//! - Route payloads in the order the worker sent them
//! - Track which workers are online
//! - Stop on EOF, read error or shutdown

use std::borrow::Cow;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::{CoordinatorRouter, WorkerTracker};
use crate::worker::WorkerId;

/// Coordinator side of every worker channel.
#[derive(Debug, Clone)]
pub struct Coordinator {
    router: Arc<CoordinatorRouter>,
    tracker: WorkerTracker,
}

impl Coordinator {
    pub fn new(router: CoordinatorRouter) -> Self {
        Self {
            router: Arc::new(router),
            tracker: WorkerTracker::new(),
        }
    }

    pub fn router(&self) -> &CoordinatorRouter {
        &self.router
    }

    pub fn tracker(&self) -> &WorkerTracker {
        &self.tracker
    }

    /// Start routing everything `worker` writes to `reader`.
    ///
    /// One task per worker keeps that worker's messages in order; tasks of
    /// different workers interleave freely.
    pub fn attach<R>(
        &self,
        worker: WorkerId,
        reader: R,
        mut shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let guard = self.tracker.track(worker);
        let router = Arc::clone(&self.router);

        tokio::spawn(async move {
            let worker = guard.worker();
            let mut reader = BufReader::new(reader);
            let mut buf = Vec::new();
            loop {
                buf.clear();
                tokio::select! {
                    read = reader.read_until(b'\n', &mut buf) => match read {
                        Ok(0) => {
                            tracing::info!(worker = %worker, "Worker channel closed");
                            break;
                        }
                        Ok(_) => {
                            router.route(worker, &decode_line(&buf));
                        }
                        Err(e) => {
                            tracing::warn!(worker = %worker, error = %e, "Worker channel read failed");
                            break;
                        }
                    },
                    _ = shutdown.recv() => {
                        tracing::debug!(worker = %worker, "Reader received shutdown signal");
                        break;
                    }
                }
            }
            drop(guard);
        })
    }
}

/// One line as text: line terminator stripped, invalid UTF-8 replaced.
fn decode_line(line: &[u8]) -> Cow<'_, str> {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line)
}
