//! Hall Monitor Example
//!
//! Wires the full engine against the in-memory transport and plays a short
//! scripted evening: a snapshot seeds one running session, the controller
//! path is skipped (no real server here), and every display event is
//! printed as it is published.
//!
//! Run: cargo run --example hall_monitor

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use cue_client::{
    ClientConfig, HallState, MemoryConnector, PoolTable, RateSchedule, SnapshotPayload,
    StreamSync, UiEvent,
};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("\n🎱 Hall Monitor");
    println!("================\n");

    let config = ClientConfig::default().with_table_count(5);
    let state = HallState::new(&config);
    let connector = MemoryConnector::default();

    let sync = StreamSync::new(
        state.clone(),
        Arc::new(connector.clone()),
        config.reconnect_delay(),
    );
    let shutdown = CancellationToken::new();
    let _ = sync.spawn(shutdown.clone());

    // Print every display event the engine publishes
    let mut events = state.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                UiEvent::Tick {
                    table_id,
                    duration,
                    cost,
                    is_peak,
                } => {
                    let marker = if is_peak { " [peak]" } else { "" };
                    println!("table {table_id}: {duration}  €{cost}{marker}");
                }
                UiEvent::ConnectionStatus {
                    connected,
                    reconnecting,
                } => {
                    println!("stream: connected={connected} reconnecting={reconnecting}");
                }
                UiEvent::TableUpdated {
                    table_id,
                    occupied,
                    customer_name,
                } => {
                    println!(
                        "table {table_id}: {} {}",
                        if occupied { "occupied by" } else { "vacant" },
                        customer_name.unwrap_or_default()
                    );
                }
                other => println!("{other:?}"),
            }
        }
    });

    // Let the subscription open before the first push
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Scripted server: one snapshot with a running session and the tariff
    let started = Utc::now() - chrono::Duration::minutes(42);
    connector.push(
        SnapshotPayload::new(vec![
            PoolTable::occupied(1, "Ada", started),
            PoolTable::vacant(2),
            PoolTable::vacant(3),
            PoolTable::vacant(4),
            PoolTable::vacant(5),
        ])
        .with_rates(RateSchedule {
            standard_rate: Decimal::from(30),
            peak_rate: Decimal::from(45),
            peak_start: "17:00".to_string(),
            peak_end: "22:00".to_string(),
            minimum_minutes: 30,
        }),
    );

    // Watch the clock tick for a few seconds, then the table frees up
    tokio::time::sleep(Duration::from_secs(5)).await;
    connector.push(SnapshotPayload::new(vec![
        PoolTable::vacant(1),
        PoolTable::vacant(2),
        PoolTable::vacant(3),
        PoolTable::vacant(4),
        PoolTable::vacant(5),
    ]));
    tokio::time::sleep(Duration::from_secs(1)).await;

    shutdown.cancel();
    printer.abort();
    println!("\nDone.");
    Ok(())
}
