//! Stop Summary Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Server-computed final bill for a stopped session
///
/// Authoritative: computed server-side at stop time and may differ from the
/// client's last ticking estimate. Displayed verbatim, never reconciled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopSummary {
    /// Billed duration in minutes
    pub actual_duration_minutes: i64,
    /// Final cost as billed
    pub final_cost: Decimal,
    /// Whether the minimum-charge floor was applied
    pub minimum_applied: bool,
}

impl StopSummary {
    /// Render the billed duration as `Xh Ym` (summary-dialog format)
    pub fn duration_label(&self) -> String {
        let minutes = self.actual_duration_minutes.max(0);
        format!("{}h {}m", minutes / 60, minutes % 60)
    }
}
