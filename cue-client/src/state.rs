//! Shared engine state
//!
//! `HallState` 持有引擎的全部共享状态：当前价目表、桌台注册表和
//! 显示事件通道。所有组件通过同一个 `Arc<HallState>` 协作，没有
//! 模块级全局变量。

use std::sync::Arc;

use shared::RateSchedule;
use tokio::sync::{RwLock, broadcast};

use crate::config::ClientConfig;
use crate::events::UiEvent;
use crate::registry::TableRegistry;

/// Capacity of the display event channel
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Shared context passed to every engine component
///
/// The rate schedule is the one cross-clock shared resource: every active
/// clock reads it on each tick and only the stream sync replaces it, always
/// as a whole value under the write lock.
#[derive(Debug)]
pub struct HallState {
    rates: RwLock<RateSchedule>,
    pub registry: TableRegistry,
    events: broadcast::Sender<UiEvent>,
}

impl HallState {
    /// Create the shared state with the registry seeded from `config`
    pub fn new(config: &ClientConfig) -> Arc<Self> {
        let (events, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            rates: RwLock::new(RateSchedule::default()),
            registry: TableRegistry::new(config.table_count),
            events,
        })
    }

    /// Current rate schedule (cheap clone of the shared slot)
    pub async fn rates(&self) -> RateSchedule {
        self.rates.read().await.clone()
    }

    /// Replace the rate schedule wholesale
    pub async fn update_rates(&self, new: RateSchedule) {
        let mut slot = self.rates.write().await;
        if *slot != new {
            tracing::info!(
                standard = %new.standard_rate,
                peak = %new.peak_rate,
                window = %format!("{}-{}", new.peak_start, new.peak_end),
                "Rate schedule updated"
            );
        }
        *slot = new;
    }

    /// Subscribe to display events
    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.events.subscribe()
    }

    /// Publish a display event
    ///
    /// Dropped silently when no frontend is subscribed.
    pub fn emit(&self, event: UiEvent) {
        let _ = self.events.send(event);
    }
}
