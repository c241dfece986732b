//! Engine integration tests
//!
//! Drives the full engine (sync loop, registry, clocks, controller) over
//! the in-memory snapshot transport and a mock action server.

use std::sync::Arc;
use std::time::Duration;

use axum::Form;
use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::routing::post;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use cue_client::{
    ClientConfig, ClientError, HallState, MemoryConnector, PoolTable, RateSchedule,
    SnapshotPayload, StreamSync, SyncState, TableController, UiEvent,
};

const TEST_RECONNECT_DELAY: Duration = Duration::from_millis(200);

struct Engine {
    state: Arc<HallState>,
    connector: MemoryConnector,
    shutdown: CancellationToken,
    sync_state: tokio::sync::watch::Receiver<SyncState>,
}

impl Engine {
    fn start(config: &ClientConfig) -> Self {
        let state = HallState::new(config);
        let connector = MemoryConnector::default();
        let sync = StreamSync::new(
            state.clone(),
            Arc::new(connector.clone()),
            TEST_RECONNECT_DELAY,
        );
        let sync_state = sync.state_watch();
        let shutdown = CancellationToken::new();
        let _ = sync.spawn(shutdown.clone());
        Self {
            state,
            connector,
            shutdown,
            sync_state,
        }
    }

    async fn wait_for(&mut self, target: SyncState) {
        timeout(Duration::from_secs(2), async {
            while *self.sync_state.borrow_and_update() != target {
                self.sync_state.changed().await.unwrap();
            }
        })
        .await
        .unwrap_or_else(|_| panic!("sync did not reach {:?} within 2 seconds", target));
    }

    /// Push a snapshot and wait until the supervisor has applied it
    async fn push_and_settle(&self, snapshot: SnapshotPayload) {
        self.connector.push(snapshot);
        // The supervisor applies snapshots in arrival order; a short yield
        // window is enough for the single-push cases below.
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_snapshot_restores_running_session() {
    let mut engine = Engine::start(&ClientConfig::default().with_table_count(3));
    engine.wait_for(SyncState::Connected).await;

    let start = Utc::now();
    engine
        .push_and_settle(SnapshotPayload::new(vec![
            PoolTable::occupied(1, "Ada", start),
            PoolTable::vacant(2),
            PoolTable::vacant(3),
        ]))
        .await;

    let view = engine.state.registry.view(1).unwrap();
    assert!(view.occupied);
    assert!(view.has_clock);
    assert_eq!(view.session_start, Some(start));
    assert_eq!(view.customer_name.as_deref(), Some("Ada"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_duplicate_snapshot_yields_single_clock() {
    let mut engine = Engine::start(&ClientConfig::default().with_table_count(2));
    engine.wait_for(SyncState::Connected).await;

    let snapshot = SnapshotPayload::new(vec![
        PoolTable::occupied(1, "Ada", Utc::now()),
        PoolTable::vacant(2),
    ]);
    engine.push_and_settle(snapshot.clone()).await;
    engine.push_and_settle(snapshot).await;

    let view = engine.state.registry.view(1).unwrap();
    assert!(view.occupied && view.has_clock);
    // Exactly one tick arrives per second: two clocks would double up
    let mut events = engine.state.subscribe();
    let mut ticks_in_window = 0;
    let _ = timeout(Duration::from_millis(1200), async {
        loop {
            if let Ok(UiEvent::Tick { table_id: 1, .. }) = events.recv().await {
                ticks_in_window += 1;
            }
        }
    })
    .await;
    assert!(
        ticks_in_window <= 2,
        "expected a single ticking clock, saw {} ticks",
        ticks_in_window
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_reconnect_restores_state_after_outage() {
    let mut engine = Engine::start(&ClientConfig::default().with_table_count(2));
    engine.wait_for(SyncState::Connected).await;

    let start = Utc::now();
    engine
        .push_and_settle(SnapshotPayload::new(vec![
            PoolTable::occupied(1, "Ada", start),
            PoolTable::vacant(2),
        ]))
        .await;
    assert!(engine.state.registry.has_clock(1));

    // Sever the subscription
    engine.connector.push_error("link down");
    engine.wait_for(SyncState::Disconnected).await;

    // One reconnect is scheduled after the fixed delay
    engine.wait_for(SyncState::Connected).await;

    // The fresh full snapshot reports the session gone; no stale timer survives
    engine
        .push_and_settle(SnapshotPayload::new(vec![
            PoolTable::vacant(1),
            PoolTable::vacant(2),
        ]))
        .await;

    let view = engine.state.registry.view(1).unwrap();
    assert!(!view.occupied);
    assert!(!view.has_clock);
    assert!(view.session_start.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_rates_update_reaches_all_consumers() {
    let mut engine = Engine::start(&ClientConfig::default().with_table_count(1));
    engine.wait_for(SyncState::Connected).await;

    let rates = RateSchedule {
        standard_rate: Decimal::from(24),
        peak_rate: Decimal::from(36),
        peak_start: "20:00".to_string(),
        peak_end: "01:00".to_string(),
        minimum_minutes: 20,
    };
    engine
        .push_and_settle(SnapshotPayload::new(vec![PoolTable::vacant(1)]).with_rates(rates.clone()))
        .await;

    assert_eq!(engine.state.rates().await, rates);
}

// ============================================================================
// Controller against a mock action server
// ============================================================================

#[derive(Deserialize)]
struct StartForm {
    customer_name: String,
}

/// Mock hall server: table 1 accepts everything, table 2 rejects starts,
/// stop returns a fixed authoritative bill.
async fn spawn_mock_server() -> String {
    let app = Router::new()
        .route(
            "/table/{id}/start",
            post(|Path(id): Path<i64>, Form(form): Form<StartForm>| async move {
                if id == 2 {
                    return Json(serde_json::json!({
                        "status": "error",
                        "message": "Table already occupied"
                    }));
                }
                assert!(!form.customer_name.trim().is_empty());
                Json(serde_json::json!({"status": "success"}))
            }),
        )
        .route(
            "/table/{id}/stop",
            post(|Path(_id): Path<i64>| async move {
                Json(serde_json::json!({
                    "status": "success",
                    "final_cost": 18.75,
                    "actual_duration": 37,
                    "minimum_applied": false
                }))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_start_and_stop_against_mock_server() {
    let base_url = spawn_mock_server().await;
    let config = ClientConfig::new(base_url).with_table_count(3);
    let state = HallState::new(&config);
    let controller = TableController::new(state.clone(), &config);
    let mut events = state.subscribe();

    controller.start_session(1, "Ada").await.unwrap();
    let view = state.registry.view(1).unwrap();
    assert!(view.occupied && view.has_clock);

    let summary = controller.stop_session(1).await.unwrap();
    // The server bill is displayed verbatim, whatever the local tick said
    assert_eq!(summary.final_cost, Decimal::new(1875, 2));
    assert_eq!(summary.actual_duration_minutes, 37);
    assert!(!summary.minimum_applied);

    let view = state.registry.view(1).unwrap();
    assert!(!view.occupied && !view.has_clock);

    // SessionEnded carries the same authoritative summary
    let mut ended = None;
    while let Ok(event) = events.try_recv() {
        if let UiEvent::SessionEnded { table_id: 1, summary } = event {
            ended = Some(summary);
        }
    }
    let ended = ended.expect("SessionEnded event should have been published");
    assert_eq!(ended.final_cost, Decimal::new(1875, 2));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_server_rejection_leaves_table_untouched() {
    let base_url = spawn_mock_server().await;
    let config = ClientConfig::new(base_url).with_table_count(3);
    let state = HallState::new(&config);
    let controller = TableController::new(state.clone(), &config);

    let result = controller.start_session(2, "Bo").await;
    match result {
        Err(ClientError::Rejected(message)) => {
            assert_eq!(message, "Table already occupied");
        }
        other => panic!("expected rejection, got {:?}", other),
    }

    let view = state.registry.view(2).unwrap();
    assert!(!view.occupied && !view.has_clock);
}
