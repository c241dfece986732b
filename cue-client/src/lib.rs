//! Cue Client - per-table session billing engine
//!
//! Ticks a billing clock for every occupied table, keeps local state
//! reconciled against server-pushed full snapshots across disconnects, and
//! issues start/stop actions. Display output is published as events; the
//! rendering layer lives elsewhere.

pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod http;
pub mod pricing;
pub mod registry;
pub mod state;
pub mod sync;
pub mod transport;

pub use clock::SessionClock;
pub use config::ClientConfig;
pub use controller::TableController;
pub use error::{ClientError, ClientResult};
pub use events::UiEvent;
pub use pricing::{TickResult, compute};
pub use registry::{TableRegistry, TableView};
pub use state::HallState;
pub use sync::{StreamSync, SyncState};
pub use transport::{MemoryConnector, SnapshotConnector, SnapshotStream, SseConnector};

// Re-export shared types for convenience
pub use shared::{PoolTable, RateSchedule, SnapshotPayload, StopSummary, TableId};
