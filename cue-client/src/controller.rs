//! Table session controller
//!
//! Issues start/stop actions against the server and applies the confirmed
//! result to local state. Failures are surfaced and never retried; the
//! user triggers again. Local state only moves on server confirmation: a
//! rejected or failed action leaves the registry and any running clock
//! exactly as they were.

use std::sync::Arc;

use chrono::Utc;
use shared::{StopSummary, TableId};

use crate::clock::SessionClock;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::events::UiEvent;
use crate::http::ActionClient;
use crate::state::HallState;

/// Controller for user-triggered table actions
#[derive(Debug, Clone)]
pub struct TableController {
    state: Arc<HallState>,
    clock: SessionClock,
    actions: ActionClient,
}

impl TableController {
    pub fn new(state: Arc<HallState>, config: &ClientConfig) -> Self {
        let clock = SessionClock::new(state.clone());
        let actions = ActionClient::new(config);
        Self {
            state,
            clock,
            actions,
        }
    }

    /// Start a session for a customer on a table
    ///
    /// Rejects an empty or whitespace-only customer name before issuing any
    /// request. On server confirmation the table becomes occupied with the
    /// local observation time as session start (the server does not echo
    /// one) and its clock starts.
    pub async fn start_session(
        &self,
        table_id: TableId,
        customer_name: &str,
    ) -> ClientResult<()> {
        let name = customer_name.trim();
        if name.is_empty() {
            return Err(ClientError::Validation("Customer name is required".into()));
        }
        if !self.state.registry.contains(table_id) {
            return Err(ClientError::Validation(format!("Unknown table {}", table_id)));
        }

        let _loading = LoadingGuard::begin(&self.state, table_id);

        let response = match self.actions.start_table(table_id, name).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(table_id, error = %e, "Start action failed");
                self.fail(table_id, e.to_string());
                return Err(e);
            }
        };

        if !response.is_success() {
            let message = response.message_or_default().to_string();
            tracing::warn!(table_id, %message, "Start action rejected");
            self.fail(table_id, message.clone());
            return Err(ClientError::Rejected(message));
        }

        let session_start = Utc::now();
        self.state
            .registry
            .set_session(table_id, name.to_string(), session_start);
        self.clock.start(table_id, session_start);
        self.state.emit(UiEvent::TableUpdated {
            table_id,
            occupied: true,
            customer_name: Some(name.to_string()),
        });
        tracing::info!(table_id, customer = name, "Session started");
        Ok(())
    }

    /// Stop the session on a table
    ///
    /// On confirmation, stops the clock, clears the session and publishes
    /// the server-billed summary, which may differ from the last ticking
    /// estimate and is displayed as final. On any failure the clock keeps
    /// running.
    pub async fn stop_session(&self, table_id: TableId) -> ClientResult<StopSummary> {
        let _loading = LoadingGuard::begin(&self.state, table_id);

        let response = match self.actions.stop_table(table_id).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(table_id, error = %e, "Stop action failed");
                self.fail(table_id, e.to_string());
                return Err(e);
            }
        };

        if !response.is_success() {
            let message = response.message_or_default().to_string();
            tracing::warn!(table_id, %message, "Stop action rejected");
            self.fail(table_id, message.clone());
            return Err(ClientError::Rejected(message));
        }

        let Some(summary) = response.into_summary() else {
            let message = "Stop response missing billing fields".to_string();
            self.fail(table_id, message.clone());
            return Err(ClientError::InvalidResponse(message));
        };

        self.clock.stop(table_id);
        self.state.registry.clear_session(table_id);
        self.state.emit(UiEvent::TableUpdated {
            table_id,
            occupied: false,
            customer_name: None,
        });
        self.state.emit(UiEvent::SessionEnded {
            table_id,
            summary: summary.clone(),
        });
        tracing::info!(
            table_id,
            final_cost = %summary.final_cost,
            minutes = summary.actual_duration_minutes,
            "Session stopped"
        );
        Ok(summary)
    }

    fn fail(&self, table_id: TableId, message: String) {
        self.state.emit(UiEvent::ActionFailed { table_id, message });
    }
}

/// Loading-indicator guard
///
/// Shows the indicator on creation and guarantees the matching clear on
/// every exit path, success or failure, when the guard drops.
struct LoadingGuard {
    state: Arc<HallState>,
    table_id: TableId,
}

impl LoadingGuard {
    fn begin(state: &Arc<HallState>, table_id: TableId) -> Self {
        state.emit(UiEvent::Loading {
            table_id,
            active: true,
        });
        Self {
            state: state.clone(),
            table_id,
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.state.emit(UiEvent::Loading {
            table_id: self.table_id,
            active: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Arc<HallState>, TableController) {
        // Unroutable port: any issued request fails at the network layer
        let config = ClientConfig::new("http://127.0.0.1:9").with_timeout(1);
        let state = HallState::new(&config);
        let controller = TableController::new(state.clone(), &config);
        (state, controller)
    }

    #[tokio::test]
    async fn test_empty_name_fails_before_any_request() {
        let (state, controller) = fixture();
        let mut events = state.subscribe();

        let result = controller.start_session(1, "   ").await;
        assert!(matches!(result, Err(ClientError::Validation(_))));

        // Fast-fail: no loading indicator was ever shown
        assert!(events.try_recv().is_err());
        assert!(!state.registry.has_clock(1));
    }

    #[tokio::test]
    async fn test_transport_failure_leaves_state_unchanged() {
        let (state, controller) = fixture();
        let mut events = state.subscribe();

        let result = controller.start_session(1, "Ada").await;
        assert!(matches!(result, Err(ClientError::Http(_))));
        assert!(!state.registry.has_clock(1));
        assert!(!state.registry.view(1).unwrap().occupied);

        // Loading indicator was shown and cleared despite the failure
        let mut saw_loading_on = false;
        let mut saw_loading_off = false;
        let mut saw_failure = false;
        while let Ok(event) = events.try_recv() {
            match event {
                UiEvent::Loading { active: true, .. } => saw_loading_on = true,
                UiEvent::Loading { active: false, .. } => saw_loading_off = true,
                UiEvent::ActionFailed { .. } => saw_failure = true,
                _ => {}
            }
        }
        assert!(saw_loading_on && saw_loading_off && saw_failure);
    }

    #[tokio::test]
    async fn test_stop_failure_keeps_clock_running() {
        let (state, controller) = fixture();
        let start = Utc::now();
        state.registry.set_session(1, "Ada".to_string(), start);
        controller.clock.start(1, start);

        let result = controller.stop_session(1).await;
        assert!(result.is_err());

        // Clock and session untouched
        assert!(state.registry.has_clock(1));
        assert_eq!(state.registry.session_start(1), Some(start));

        controller.clock.stop(1);
    }
}
