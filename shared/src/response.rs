//! Action response types
//!
//! Wire structures for the start/stop table actions. The server answers
//! with a `status` string rather than an HTTP error code; anything other
//! than `"success"` is a rejection and carries a human-readable `message`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::StopSummary;

/// Status value for an accepted action
pub const STATUS_SUCCESS: &str = "success";

/// Response to a start-session action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StartResponse {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Rejection message, or a fallback when the server sent none
    pub fn message_or_default(&self) -> &str {
        self.message.as_deref().unwrap_or("Request rejected")
    }
}

/// Response to a stop-session action
///
/// On success the billing fields carry the authoritative final bill;
/// on rejection they are absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_cost: Option<Decimal>,
    /// Billed duration in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_applied: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StopResponse {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    pub fn message_or_default(&self) -> &str {
        self.message.as_deref().unwrap_or("Request rejected")
    }

    /// Extract the final bill from a success response
    ///
    /// `None` when any billing field is missing.
    pub fn into_summary(self) -> Option<StopSummary> {
        Some(StopSummary {
            actual_duration_minutes: self.actual_duration?,
            final_cost: self.final_cost?,
            minimum_applied: self.minimum_applied?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_response_success() {
        let resp: StartResponse = serde_json::from_str(r#"{"status": "success"}"#).unwrap();
        assert!(resp.is_success());
        assert!(resp.message.is_none());
    }

    #[test]
    fn test_start_response_rejection() {
        let resp: StartResponse =
            serde_json::from_str(r#"{"status": "error", "message": "Table already occupied"}"#)
                .unwrap();
        assert!(!resp.is_success());
        assert_eq!(resp.message_or_default(), "Table already occupied");
    }

    #[test]
    fn test_stop_response_carries_final_bill() {
        let resp: StopResponse = serde_json::from_str(
            r#"{"status": "success", "final_cost": 18.75,
                "actual_duration": 37, "minimum_applied": false}"#,
        )
        .unwrap();
        assert!(resp.is_success());
        let summary = resp.into_summary().unwrap();
        assert_eq!(summary.final_cost, Decimal::new(1875, 2));
        assert_eq!(summary.actual_duration_minutes, 37);
        assert!(!summary.minimum_applied);
    }

    #[test]
    fn test_stop_rejection_has_no_summary() {
        let resp: StopResponse =
            serde_json::from_str(r#"{"status": "error", "message": "No active session found"}"#)
                .unwrap();
        assert!(!resp.is_success());
        assert_eq!(resp.message_or_default(), "No active session found");
        assert!(resp.into_summary().is_none());
    }
}
