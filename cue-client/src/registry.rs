//! Table registry
//!
//! Arena-style mapping from stable table id to table state. Entries are
//! created once at initialization (one per physical table) and never added
//! or removed at runtime; only their session fields and clock handle change.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::one::RefMut;
use shared::TableId;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handle to a running per-table tick task
#[derive(Debug)]
pub struct ClockHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl ClockHandle {
    pub fn new(cancel: CancellationToken, task: JoinHandle<()>) -> Self {
        Self { cancel, task }
    }

    /// Cancel the tick task immediately
    ///
    /// Synchronous; the task observes the token at its next suspension
    /// point, which for a ticking clock is within the current tick.
    pub fn cancel(self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

/// Mutable state of one table
#[derive(Debug, Default)]
pub struct TableState {
    pub occupied: bool,
    pub customer_name: Option<String>,
    pub session_start: Option<DateTime<Utc>>,
    pub clock: Option<ClockHandle>,
}

/// Read-only copy of a table's display state (no clock handle)
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub id: TableId,
    pub occupied: bool,
    pub customer_name: Option<String>,
    pub session_start: Option<DateTime<Utc>>,
    pub has_clock: bool,
}

/// Registry of all physical tables
#[derive(Debug, Default)]
pub struct TableRegistry {
    tables: DashMap<TableId, TableState>,
}

impl TableRegistry {
    /// Create a registry seeded with tables `1..=table_count`
    pub fn new(table_count: u32) -> Self {
        let tables = DashMap::new();
        for id in 1..=i64::from(table_count) {
            tables.insert(id, TableState::default());
        }
        Self { tables }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn contains(&self, id: TableId) -> bool {
        self.tables.contains_key(&id)
    }

    /// Sorted list of all table ids
    pub fn table_ids(&self) -> Vec<TableId> {
        let mut ids: Vec<TableId> = self.tables.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }

    /// Exclusive access to one table's state
    ///
    /// The guard locks a map shard; callers must not hold it across `await`.
    pub fn get_mut(&self, id: TableId) -> Option<RefMut<'_, TableId, TableState>> {
        self.tables.get_mut(&id)
    }

    /// Whether the table currently has a running clock
    pub fn has_clock(&self, id: TableId) -> bool {
        self.tables
            .get(&id)
            .map(|state| state.clock.is_some())
            .unwrap_or(false)
    }

    /// Detach and return the table's clock handle, if any
    pub fn take_clock(&self, id: TableId) -> Option<ClockHandle> {
        self.tables.get_mut(&id).and_then(|mut state| state.clock.take())
    }

    /// Mark a session as running on the table
    pub fn set_session(&self, id: TableId, customer_name: String, start: DateTime<Utc>) {
        if let Some(mut state) = self.tables.get_mut(&id) {
            state.occupied = true;
            state.customer_name = Some(customer_name);
            state.session_start = Some(start);
        }
    }

    /// Clear the table's session fields (occupancy, name, start instant)
    pub fn clear_session(&self, id: TableId) {
        if let Some(mut state) = self.tables.get_mut(&id) {
            state.occupied = false;
            state.customer_name = None;
            state.session_start = None;
        }
    }

    /// Update occupancy and customer info from a snapshot entry
    ///
    /// Returns `true` if anything changed, so re-delivered identical
    /// snapshots produce no display events.
    pub fn update_info(
        &self,
        id: TableId,
        occupied: bool,
        customer_name: Option<String>,
    ) -> bool {
        let Some(mut state) = self.tables.get_mut(&id) else {
            return false;
        };
        let changed = state.occupied != occupied || state.customer_name != customer_name;
        state.occupied = occupied;
        state.customer_name = customer_name;
        changed
    }

    pub fn session_start(&self, id: TableId) -> Option<DateTime<Utc>> {
        self.tables.get(&id).and_then(|state| state.session_start)
    }

    /// Display snapshot of one table
    pub fn view(&self, id: TableId) -> Option<TableView> {
        self.tables.get(&id).map(|state| TableView {
            id,
            occupied: state.occupied,
            customer_name: state.customer_name.clone(),
            session_start: state.session_start,
            has_clock: state.clock.is_some(),
        })
    }
}
