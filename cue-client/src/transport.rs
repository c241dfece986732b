//! Snapshot stream transports
//!
//! Transport abstraction for the snapshot subscription: a connector opens a
//! fresh subscription (one per connection attempt) and the stream yields
//! complete snapshots in arrival order. Two implementations: the SSE
//! network transport used against a real server, and an in-memory broadcast
//! transport for same-process wiring and tests.

use async_trait::async_trait;
use futures::{Stream, StreamExt, TryStreamExt};
use shared::SnapshotPayload;
use std::pin::Pin;
use tokio::sync::broadcast;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// An open snapshot subscription
#[async_trait]
pub trait SnapshotStream: Send {
    /// Next snapshot, or the transport error that ended the subscription
    async fn next_snapshot(&mut self) -> ClientResult<SnapshotPayload>;
}

/// Opens snapshot subscriptions
///
/// Each reconnect attempt calls `connect` again; the server answers every
/// fresh subscription with full snapshots, so no resume state is carried
/// between connections.
#[async_trait]
pub trait SnapshotConnector: Send + Sync {
    async fn connect(&self) -> ClientResult<Box<dyn SnapshotStream>>;
}

// ============================================================================
// SSE network transport
// ============================================================================

/// Connector for the server's SSE stream endpoint
#[derive(Debug, Clone)]
pub struct SseConnector {
    client: reqwest::Client,
    stream_url: String,
}

impl SseConnector {
    /// Create a connector from configuration
    ///
    /// The streaming request deliberately has no read timeout: the
    /// subscription is long-lived and silence between pushes is normal.
    pub fn new(config: &ClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            stream_url: config.stream_url(),
        }
    }
}

#[async_trait]
impl SnapshotConnector for SseConnector {
    async fn connect(&self) -> ClientResult<Box<dyn SnapshotStream>> {
        let response = self
            .client
            .get(&self.stream_url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!(url = %self.stream_url, "Snapshot stream opened");
        Ok(Box::new(SseStream {
            body: response.bytes_stream().map_ok(|chunk| chunk.to_vec()).boxed(),
            buffer: Vec::new(),
        }))
    }
}

/// SSE-framed snapshot stream
///
/// Events are `data:` lines terminated by a blank line; each event body is
/// one JSON snapshot.
struct SseStream {
    body: Pin<Box<dyn Stream<Item = Result<Vec<u8>, reqwest::Error>> + Send>>,
    buffer: Vec<u8>,
}

impl SseStream {
    /// Extract the next complete event body from the buffer, if any
    ///
    /// Heartbeat/comment events (no `data:` lines) are consumed and skipped.
    fn take_event(&mut self) -> Option<String> {
        loop {
            let end = self
                .buffer
                .windows(2)
                .position(|window| window == b"\n\n")?;
            let raw: Vec<u8> = self.buffer.drain(..end + 2).collect();
            let event = String::from_utf8_lossy(&raw[..end]);

            let data: Vec<&str> = event
                .lines()
                .filter_map(|line| line.strip_prefix("data:"))
                .map(|line| line.strip_prefix(' ').unwrap_or(line).trim_end_matches('\r'))
                .collect();
            if !data.is_empty() {
                return Some(data.join("\n"));
            }
        }
    }
}

#[async_trait]
impl SnapshotStream for SseStream {
    async fn next_snapshot(&mut self) -> ClientResult<SnapshotPayload> {
        loop {
            if let Some(data) = self.take_event() {
                match SnapshotPayload::from_bytes(data.as_bytes()) {
                    Ok(snapshot) => return Ok(snapshot),
                    Err(e) => {
                        // Skip unparseable frames; the next full snapshot
                        // supersedes anything a dropped one carried.
                        tracing::warn!(error = %e, "Skipping malformed snapshot frame");
                        continue;
                    }
                }
            }

            match self.body.next().await {
                Some(Ok(chunk)) => self.buffer.extend_from_slice(&chunk),
                Some(Err(e)) => return Err(ClientError::Http(e)),
                None => return Err(ClientError::Stream("Subscription closed by server".into())),
            }
        }
    }
}

// ============================================================================
// In-memory transport
// ============================================================================

/// In-memory snapshot connector (same-process communication)
///
/// Pushed frames fan out to every open subscription; each `connect` call
/// starts a fresh one, mirroring the reconnect semantics of the network
/// transport. `push_error` injects a transport failure into all open
/// subscriptions.
#[derive(Debug, Clone)]
pub struct MemoryConnector {
    tx: broadcast::Sender<Result<SnapshotPayload, String>>,
}

impl MemoryConnector {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Push a snapshot to all open subscriptions
    pub fn push(&self, snapshot: SnapshotPayload) {
        let _ = self.tx.send(Ok(snapshot));
    }

    /// Fail all open subscriptions with a transport error
    pub fn push_error(&self, message: impl Into<String>) {
        let _ = self.tx.send(Err(message.into()));
    }

    /// Number of open subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for MemoryConnector {
    fn default() -> Self {
        Self::new(16)
    }
}

#[async_trait]
impl SnapshotConnector for MemoryConnector {
    async fn connect(&self) -> ClientResult<Box<dyn SnapshotStream>> {
        Ok(Box::new(MemoryStream {
            rx: self.tx.subscribe(),
        }))
    }
}

struct MemoryStream {
    rx: broadcast::Receiver<Result<SnapshotPayload, String>>,
}

#[async_trait]
impl SnapshotStream for MemoryStream {
    async fn next_snapshot(&mut self) -> ClientResult<SnapshotPayload> {
        loop {
            match self.rx.recv().await {
                Ok(Ok(snapshot)) => return Ok(snapshot),
                Ok(Err(message)) => return Err(ClientError::Stream(message)),
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(ClientError::Stream("Memory channel closed".into()));
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Older snapshots are superseded by newer ones anyway
                    tracing::warn!(skipped, "Memory stream lagged");
                    continue;
                }
            }
        }
    }
}
