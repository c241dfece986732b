//! Stream message types
//!
//! The server pushes complete, non-incremental state snapshots over one
//! long-lived subscription. A snapshot is enough to rebuild all table and
//! rate state from scratch, so reconnects are stateless: no resume tokens,
//! no diffs.

use serde::{Deserialize, Serialize};

use crate::models::{PoolTable, RateSchedule};

/// Full-state snapshot payload (服务端 -> 所有客户端)
///
/// `tables` always lists every physical table. `rates` is optional per
/// message; when present the whole schedule is replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPayload {
    pub tables: Vec<PoolTable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rates: Option<RateSchedule>,
}

impl SnapshotPayload {
    pub fn new(tables: Vec<PoolTable>) -> Self {
        Self {
            tables,
            rates: None,
        }
    }

    pub fn with_rates(mut self, rates: RateSchedule) -> Self {
        self.rates = Some(rates);
        self
    }

    /// 序列化为二进制
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// 从二进制解析
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
