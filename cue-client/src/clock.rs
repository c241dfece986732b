//! Per-table session clock
//!
//! One ticking task per occupied table. Each tick recomputes the running
//! estimate from the shared rate schedule and publishes a display update.
//! The tick is best-effort display state; the authoritative bill comes from
//! the server at stop time.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use shared::TableId;
use shared::util::format_duration_hms;
use tokio_util::sync::CancellationToken;

use crate::events::UiEvent;
use crate::pricing;
use crate::registry::ClockHandle;
use crate::state::HallState;

/// Tick cadence of the session clock
const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Starts and stops per-table tick tasks
///
/// Lifecycle is strictly 1:1 with occupancy: a clock exists iff the table's
/// last-known occupancy is true, and both `start` and `stop` are idempotent.
#[derive(Debug, Clone)]
pub struct SessionClock {
    state: Arc<HallState>,
}

impl SessionClock {
    pub fn new(state: Arc<HallState>) -> Self {
        Self { state }
    }

    /// Start ticking for a table
    ///
    /// No-op if the table already has a running clock or is unknown.
    pub fn start(&self, table_id: TableId, session_start: DateTime<Utc>) {
        let Some(mut table) = self.state.registry.get_mut(table_id) else {
            tracing::warn!(table_id, "Ignoring clock start for unknown table");
            return;
        };
        if table.clock.is_some() {
            return;
        }

        let cancel = CancellationToken::new();
        let task = tokio::spawn(tick_loop(
            self.state.clone(),
            table_id,
            session_start,
            cancel.clone(),
        ));
        table.clock = Some(ClockHandle::new(cancel, task));
        tracing::info!(table_id, %session_start, "Session clock started");
    }

    /// Stop ticking for a table
    ///
    /// Cancels immediately and synchronously; no-op if no clock is running.
    pub fn stop(&self, table_id: TableId) {
        if let Some(handle) = self.state.registry.take_clock(table_id) {
            handle.cancel();
            tracing::info!(table_id, "Session clock stopped");
        }
    }
}

/// The per-table tick task
async fn tick_loop(
    state: Arc<HallState>,
    table_id: TableId,
    session_start: DateTime<Utc>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(TICK_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let schedule = state.rates().await;
                let now = Utc::now();
                let result = pricing::compute(
                    session_start.with_timezone(&Local).naive_local(),
                    now.with_timezone(&Local).naive_local(),
                    &schedule,
                );

                let elapsed_seconds = (now - session_start).num_seconds();
                state.emit(UiEvent::Tick {
                    table_id,
                    duration: format_duration_hms(elapsed_seconds),
                    cost: format!("{:.2}", result.cost),
                    is_peak: result.is_peak,
                });
            }
        }
    }
}
