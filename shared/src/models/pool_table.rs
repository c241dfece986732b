//! Pool Table Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::TableId;

/// Pool table entry as carried in a full-state snapshot
///
/// One entry per physical table. `customer_name` and `start_time` are only
/// present while a session is running on the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolTable {
    pub id: TableId,
    pub is_occupied: bool,
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Session start instant (ISO-8601), set while occupied
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
}

impl PoolTable {
    /// A vacant table entry
    pub fn vacant(id: TableId) -> Self {
        Self {
            id,
            is_occupied: false,
            customer_name: None,
            start_time: None,
        }
    }

    /// An occupied table entry
    pub fn occupied(
        id: TableId,
        customer_name: impl Into<String>,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            is_occupied: true,
            customer_name: Some(customer_name.into()),
            start_time: Some(start_time),
        }
    }
}
