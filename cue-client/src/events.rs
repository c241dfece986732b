//! Display event definitions
//!
//! The engine publishes everything a frontend needs over one broadcast
//! channel; rendering, dialogs and styling live on the other side of this
//! seam. Payloads are serializable so they can be forwarded to a webview
//! or page verbatim.

use serde::Serialize;
use shared::{StopSummary, TableId};

/// Event published to the display layer
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UiEvent {
    /// Stream subscription state changed
    ConnectionStatus { connected: bool, reconnecting: bool },

    /// Table occupancy or customer info changed
    TableUpdated {
        table_id: TableId,
        occupied: bool,
        customer_name: Option<String>,
    },

    /// Periodic clock tick for an occupied table
    ///
    /// `duration` is `HH:MM:SS`; `cost` is the running estimate with two
    /// decimal places. Both are display-ready strings.
    Tick {
        table_id: TableId,
        duration: String,
        cost: String,
        is_peak: bool,
    },

    /// A start/stop action is in flight (show/hide the loading indicator)
    Loading { table_id: TableId, active: bool },

    /// Session stopped; the server-billed summary to display as final
    SessionEnded {
        table_id: TableId,
        summary: StopSummary,
    },

    /// An action failed; `message` is a dismissible user notice
    ActionFailed { table_id: TableId, message: String },
}
