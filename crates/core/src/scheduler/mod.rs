//! Automation scheduler.
//!
//! Tracks active automated bookings and runs each one in its own task:
//! wait for the booking window to open, then hand the request to the
//! engine's automated loop. Stopping an automation cancels the window wait
//! immediately and the retry loop at its next attempt boundary.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, RwLock};
use tracing::{info, warn};

use crate::booking::BookingRequest;
use crate::engine::{BookingEngine, CancelToken};
use crate::metrics;

struct ActiveAutomation {
    request: BookingRequest,
    cancel: CancelToken,
    cancel_tx: broadcast::Sender<()>,
}

/// Registry and runner for active automated bookings.
pub struct AutomationScheduler {
    engine: Arc<BookingEngine>,
    active: Arc<RwLock<HashMap<String, ActiveAutomation>>>,
}

impl AutomationScheduler {
    /// Create a scheduler driving the given engine.
    pub fn new(engine: Arc<BookingEngine>) -> Self {
        Self {
            engine,
            active: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// How long until the booking window opens for a request.
    ///
    /// Zero when the window is already open (or the travel date has
    /// passed; the engine's validation rejects that case on its own).
    fn window_wait(request: &BookingRequest) -> Duration {
        let until_travel = (request.travel_date - Utc::now())
            .to_std()
            .unwrap_or(Duration::ZERO);
        until_travel.saturating_sub(request.automation.booking_window)
    }

    /// Register a request and spawn its automation task.
    ///
    /// Returns the automation id (the request id). A request whose id is
    /// already active is not restarted.
    pub async fn start(&self, request: BookingRequest) -> String {
        let id = request.id.clone();

        let cancel = CancelToken::new();
        let (cancel_tx, mut cancel_rx) = broadcast::channel(1);

        {
            let mut active = self.active.write().await;
            if active.contains_key(&id) {
                warn!("Automation {} is already active", id);
                return id;
            }

            active.insert(
                id.clone(),
                ActiveAutomation {
                    request: request.clone(),
                    cancel: cancel.clone(),
                    cancel_tx,
                },
            );
        }

        let events = self.engine.events();
        events.status_changed(format!("Automation started for {}", id));
        info!("Automation started for request {}", id);

        let engine = Arc::clone(&self.engine);
        let registry = Arc::clone(&self.active);
        let task_id = id.clone();

        tokio::spawn(async move {
            metrics::ACTIVE_AUTOMATIONS.inc();

            let wait = Self::window_wait(&request);
            if !wait.is_zero() {
                events.status_changed(format!(
                    "Waiting {}s for booking window to open",
                    wait.as_secs()
                ));
                tokio::select! {
                    _ = cancel_rx.recv() => {}
                    _ = tokio::time::sleep(wait) => {}
                }
            }

            if !cancel.is_cancelled() {
                if let Some(result) = engine.automate_with_cancel(&request, &cancel).await {
                    info!(
                        "Automation {} finished with status {:?}",
                        task_id, result.status
                    );
                }
            }

            registry.write().await.remove(&task_id);
            metrics::ACTIVE_AUTOMATIONS.dec();
        });

        id
    }

    /// Stop an active automation.
    ///
    /// Idempotent: stopping an unknown or already-finished id is a no-op
    /// and returns false.
    pub async fn stop(&self, id: &str) -> bool {
        let entry = self.active.write().await.remove(id);
        match entry {
            Some(entry) => {
                entry.cancel.cancel();
                // Wakes the window wait; an error only means the task
                // already passed that point.
                let _ = entry.cancel_tx.send(());
                self.engine
                    .events()
                    .status_changed(format!("Automation stopped for {}", id));
                info!("Automation stopped for request {}", id);
                true
            }
            None => false,
        }
    }

    /// Snapshot of the currently active requests.
    pub async fn list_active(&self) -> Vec<BookingRequest> {
        self.active
            .read()
            .await
            .values()
            .map(|a| a.request.clone())
            .collect()
    }

    /// Number of currently active automations.
    pub async fn active_count(&self) -> usize {
        self.active.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::history::MemoryBookingStore;
    use crate::inventory::{InventorySource, SeatClass};
    use crate::notification::NotificationSink;
    use crate::pricing::PricingAdvisor;
    use crate::testing::{fixtures, MockInventory, MockNotificationSink, MockPricingAdvisor};

    fn test_scheduler() -> AutomationScheduler {
        let engine = BookingEngine::new(
            EngineConfig {
                settlement_delay_ms: 0,
                ..Default::default()
            },
            Arc::new(MockInventory::new()) as Arc<dyn InventorySource>,
            Arc::new(MockPricingAdvisor::new()) as Arc<dyn PricingAdvisor>,
            Arc::new(MockNotificationSink::new()) as Arc<dyn NotificationSink>,
            Arc::new(MemoryBookingStore::new()),
        );
        AutomationScheduler::new(Arc::new(engine))
    }

    fn far_future_request() -> BookingRequest {
        let mut request = fixtures::request("NDLS", "BCT", 1, SeatClass::ThirdAc);
        request.travel_date = Utc::now() + chrono::Duration::days(30);
        request
    }

    #[tokio::test]
    async fn test_start_registers_and_stop_removes() {
        let scheduler = test_scheduler();
        let request = far_future_request();
        let id = scheduler.start(request).await;

        assert_eq!(scheduler.active_count().await, 1);
        assert_eq!(scheduler.list_active().await[0].id, id);

        assert!(scheduler.stop(&id).await);
        assert_eq!(scheduler.active_count().await, 0);
    }

    #[tokio::test]
    async fn test_stop_unknown_id_is_a_noop() {
        let scheduler = test_scheduler();
        assert!(!scheduler.stop("no-such-automation").await);
    }

    #[tokio::test]
    async fn test_duplicate_start_does_not_double_register() {
        let scheduler = test_scheduler();
        let request = far_future_request();

        scheduler.start(request.clone()).await;
        scheduler.start(request).await;

        assert_eq!(scheduler.active_count().await, 1);
    }

    #[test]
    fn test_window_wait_is_zero_inside_window() {
        let mut request = fixtures::request("NDLS", "BCT", 1, SeatClass::ThirdAc);
        request.travel_date = Utc::now() + chrono::Duration::hours(1);
        request.automation.booking_window = Duration::from_secs(2 * 3600);

        assert_eq!(AutomationScheduler::window_wait(&request), Duration::ZERO);
    }

    #[test]
    fn test_window_wait_counts_down_to_window_open() {
        let mut request = fixtures::request("NDLS", "BCT", 1, SeatClass::ThirdAc);
        request.travel_date = Utc::now() + chrono::Duration::hours(10);
        request.automation.booking_window = Duration::from_secs(2 * 3600);

        let wait = AutomationScheduler::window_wait(&request);
        // Roughly eight hours, allowing for test clock skew.
        assert!(wait > Duration::from_secs(7 * 3600));
        assert!(wait <= Duration::from_secs(8 * 3600));
    }
}
