//! Worker → coordinator send channel.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Sending half of a worker's channel to the coordinator.
///
/// Cheap to clone; every clone feeds the same ordered queue.
#[derive(Debug, Clone)]
pub struct WorkerChannel {
    tx: mpsc::UnboundedSender<String>,
}

impl WorkerChannel {
    /// Create a channel and hand back the receiving end.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// A channel with no receiver: every send is dropped.
    pub fn disconnected() -> Self {
        let (channel, _) = Self::new();
        channel
    }

    /// Create a channel whose payloads are written to `writer`, one per line.
    ///
    /// Must be called inside a tokio runtime. The writer task ends once every
    /// clone of the channel is dropped and the queue is drained, or on the
    /// first write error; after a write error later sends are dropped.
    pub fn spawn_writer<W>(writer: W) -> (Self, JoinHandle<()>)
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (channel, rx) = Self::new();
        let handle = tokio::spawn(write_loop(rx, writer));
        (channel, handle)
    }

    /// Channel over this process's stdout.
    pub fn stdout() -> (Self, JoinHandle<()>) {
        Self::spawn_writer(tokio::io::stdout())
    }

    /// Queue a payload. Returns `false` when the channel is closed; the
    /// payload is then lost.
    pub fn send(&self, payload: String) -> bool {
        self.tx.send(payload).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

async fn write_loop<W>(mut rx: mpsc::UnboundedReceiver<String>, mut writer: W)
where
    W: AsyncWrite + Unpin,
{
    while let Some(mut payload) = rx.recv().await {
        payload.push('\n');
        let result = async {
            writer.write_all(payload.as_bytes()).await?;
            writer.flush().await
        }
        .await;

        if let Err(e) = result {
            tracing::debug!(error = %e, "Worker channel write failed, closing channel");
            rx.close();
            return;
        }
    }
    let _ = writer.shutdown().await;
}
