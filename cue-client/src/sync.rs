//! Snapshot stream synchronization
//!
//! Maintains the subscription to server-pushed full-state snapshots and
//! reconciles the table registry against each one. A supervising loop
//! drives an explicit three-state machine; on any transport failure it
//! falls back to `Disconnected` and retries on a fixed delay, forever.
//! Every new connection starts from a fresh full snapshot, so nothing
//! missed during an outage needs replaying.

use std::sync::Arc;
use std::time::Duration;

use shared::SnapshotPayload;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::clock::SessionClock;
use crate::events::UiEvent;
use crate::state::HallState;
use crate::transport::SnapshotConnector;

/// Subscription state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Disconnected,
    Connecting,
    Connected,
}

/// Supervises the snapshot subscription
pub struct StreamSync {
    state: Arc<HallState>,
    clock: SessionClock,
    connector: Arc<dyn SnapshotConnector>,
    reconnect_delay: Duration,
    sync_state: watch::Sender<SyncState>,
}

impl StreamSync {
    pub fn new(
        state: Arc<HallState>,
        connector: Arc<dyn SnapshotConnector>,
        reconnect_delay: Duration,
    ) -> Self {
        let clock = SessionClock::new(state.clone());
        let (sync_state, _rx) = watch::channel(SyncState::Disconnected);
        Self {
            state,
            clock,
            connector,
            reconnect_delay,
            sync_state,
        }
    }

    /// Observe subscription state transitions
    pub fn state_watch(&self) -> watch::Receiver<SyncState> {
        self.sync_state.subscribe()
    }

    /// Spawn the supervising loop as a background task
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Run the supervising loop until `shutdown` is cancelled
    pub async fn run(self, shutdown: CancellationToken) {
        loop {
            self.transition(SyncState::Connecting);

            match self.connector.connect().await {
                Ok(mut stream) => {
                    self.transition(SyncState::Connected);
                    loop {
                        tokio::select! {
                            _ = shutdown.cancelled() => return,
                            result = stream.next_snapshot() => match result {
                                Ok(snapshot) => self.apply_snapshot(snapshot).await,
                                Err(e) => {
                                    tracing::warn!(error = %e, "Snapshot stream failed");
                                    break;
                                }
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Snapshot stream connect failed");
                }
            }

            self.transition(SyncState::Disconnected);
            tokio::select! {
                _ = shutdown.cancelled() => return,
                _ = tokio::time::sleep(self.reconnect_delay) => {}
            }
        }
    }

    fn transition(&self, next: SyncState) {
        self.sync_state.send_replace(next);
        let (connected, reconnecting) = match next {
            SyncState::Connected => (true, false),
            SyncState::Connecting | SyncState::Disconnected => (false, true),
        };
        self.state.emit(UiEvent::ConnectionStatus {
            connected,
            reconnecting,
        });
    }

    /// Reconcile registry and rate state against one full snapshot
    ///
    /// Idempotent: re-delivering an identical snapshot changes nothing and
    /// publishes nothing. Clock lifecycle follows occupancy transitions
    /// only; an occupied entry with a clock already running is left alone,
    /// so a snapshot can never produce a duplicate timer.
    pub async fn apply_snapshot(&self, snapshot: SnapshotPayload) {
        if let Some(rates) = snapshot.rates {
            self.state.update_rates(rates).await;
        }

        for entry in snapshot.tables {
            if !self.state.registry.contains(entry.id) {
                tracing::warn!(table_id = entry.id, "Snapshot names unknown table");
                continue;
            }

            let changed =
                self.state
                    .registry
                    .update_info(entry.id, entry.is_occupied, entry.customer_name.clone());
            if changed {
                self.state.emit(UiEvent::TableUpdated {
                    table_id: entry.id,
                    occupied: entry.is_occupied,
                    customer_name: entry.customer_name,
                });
            }

            let has_clock = self.state.registry.has_clock(entry.id);
            if entry.is_occupied && !has_clock {
                match entry.start_time {
                    Some(start) => {
                        if let Some(mut table) = self.state.registry.get_mut(entry.id) {
                            table.session_start = Some(start);
                        }
                        self.clock.start(entry.id, start);
                    }
                    None => {
                        tracing::warn!(
                            table_id = entry.id,
                            "Occupied entry without start_time; clock not started"
                        );
                    }
                }
            } else if !entry.is_occupied && has_clock {
                self.clock.stop(entry.id);
                if let Some(mut table) = self.state.registry.get_mut(entry.id) {
                    table.session_start = None;
                }
            }
        }
    }
}
