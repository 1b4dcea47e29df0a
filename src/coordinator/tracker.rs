//! Online worker tracking.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::observability::metrics;
use crate::worker::WorkerId;

/// Counts workers whose channel is still open.
#[derive(Debug, Clone, Default)]
pub struct WorkerTracker {
    online: Arc<AtomicU64>,
}

impl WorkerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `worker` online until the returned guard is dropped.
    pub fn track(&self, worker: WorkerId) -> WorkerGuard {
        let online = self.online.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::record_workers_online(online);
        tracing::debug!(worker = %worker, online, "Worker online");
        WorkerGuard {
            online: Arc::clone(&self.online),
            worker,
        }
    }

    pub fn online_count(&self) -> u64 {
        self.online.load(Ordering::SeqCst)
    }

    /// Wait until every tracked worker has gone offline.
    pub async fn wait_until_idle(&self) {
        while self.online.load(Ordering::SeqCst) > 0 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }
}

/// Keeps one worker counted as online.
#[derive(Debug)]
pub struct WorkerGuard {
    online: Arc<AtomicU64>,
    worker: WorkerId,
}

impl WorkerGuard {
    pub fn worker(&self) -> WorkerId {
        self.worker
    }
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        let online = self.online.fetch_sub(1, Ordering::SeqCst) - 1;
        metrics::record_workers_online(online);
        tracing::debug!(worker = %self.worker, online, "Worker offline");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_counts() {
        let tracker = WorkerTracker::new();
        assert_eq!(tracker.online_count(), 0);

        let g1 = tracker.track(WorkerId::new(1));
        let g2 = tracker.track(WorkerId::new(2));
        assert_eq!(tracker.online_count(), 2);
        assert_eq!(g2.worker(), WorkerId::new(2));

        drop(g1);
        assert_eq!(tracker.online_count(), 1);
        drop(g2);
        assert_eq!(tracker.online_count(), 0);
    }

    #[tokio::test]
    async fn wait_until_idle_returns_after_last_guard() {
        let tracker = WorkerTracker::new();
        let guard = tracker.track(WorkerId::new(1));
        let waiter = {
            let tracker = tracker.clone();
            tokio::spawn(async move { tracker.wait_until_idle().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());
        drop(guard);
        tokio::time::timeout(Duration::from_secs(2), waiter)
            .await
            .unwrap()
            .unwrap();
    }
}
