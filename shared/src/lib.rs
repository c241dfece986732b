//! Shared types for the cue billing engine
//!
//! Wire and data types shared between the client engine and any frontend:
//! snapshot payloads, action responses, and the rate/table models.

pub mod message;
pub mod models;
pub mod response;
pub mod types;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use message::SnapshotPayload;
pub use models::{PoolTable, RateSchedule, StopSummary};
pub use response::{StartResponse, StopResponse};
pub use types::TableId;
