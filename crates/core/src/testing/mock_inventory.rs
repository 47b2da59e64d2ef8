//! Mock inventory source for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::inventory::{
    share, InventoryError, InventorySource, SharedTrain, Train, WaitlistStatus,
};

/// A recorded search for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedSearch {
    /// Source station code.
    pub source: String,
    /// Destination station code.
    pub destination: String,
    /// Requested travel date.
    pub travel_date: DateTime<Utc>,
    /// When the search was made.
    pub timestamp: Instant,
}

/// Mock implementation of the InventorySource trait.
///
/// Provides controllable behavior for testing:
/// - Serve a configurable set of shared trains (mutations persist across
///   searches, so repeated attempts see seats they already booked)
/// - Track search queries for assertions
/// - Simulate failures and delays
/// - Track how many searches run concurrently, for bound assertions
pub struct MockInventory {
    /// Trains returned by every search.
    trains: Arc<RwLock<Vec<SharedTrain>>>,
    /// Recorded search queries.
    searches: Arc<RwLock<Vec<RecordedSearch>>>,
    /// If set, the next search fails with this error.
    next_error: Arc<RwLock<Option<InventoryError>>>,
    /// Artificial latency applied inside each search.
    search_delay: Arc<RwLock<Option<Duration>>>,
    /// Scripted waitlist statuses, consumed front-first. Empty = Pending.
    waitlist_statuses: Arc<RwLock<VecDeque<WaitlistStatus>>>,
    /// If set, the next waitlist check fails.
    fail_next_waitlist: AtomicBool,
    /// Searches currently in flight.
    active_searches: AtomicUsize,
    /// High-water mark of concurrent searches.
    max_active_searches: AtomicUsize,
}

impl Default for MockInventory {
    fn default() -> Self {
        Self::new()
    }
}

impl MockInventory {
    /// Create a mock inventory with no trains.
    pub fn new() -> Self {
        Self {
            trains: Arc::new(RwLock::new(Vec::new())),
            searches: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            search_delay: Arc::new(RwLock::new(None)),
            waitlist_statuses: Arc::new(RwLock::new(VecDeque::new())),
            fail_next_waitlist: AtomicBool::new(false),
            active_searches: AtomicUsize::new(0),
            max_active_searches: AtomicUsize::new(0),
        }
    }

    /// Add a train to the served inventory.
    pub async fn add_train(&self, train: Train) {
        self.trains.write().await.push(share(train));
    }

    /// Replace the served inventory.
    pub async fn set_trains(&self, trains: Vec<Train>) {
        *self.trains.write().await = trains.into_iter().map(share).collect();
    }

    /// Get recorded search queries.
    pub async fn recorded_searches(&self) -> Vec<RecordedSearch> {
        self.searches.read().await.clone()
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: InventoryError) {
        *self.next_error.write().await = Some(error);
    }

    /// Apply an artificial delay inside every search.
    pub async fn set_search_delay(&self, delay: Duration) {
        *self.search_delay.write().await = Some(delay);
    }

    /// Script the sequence of waitlist statuses to report, front-first.
    /// Once exhausted, further checks report Pending.
    pub async fn set_waitlist_statuses(&self, statuses: Vec<WaitlistStatus>) {
        *self.waitlist_statuses.write().await = statuses.into();
    }

    /// Make the next waitlist check fail.
    pub async fn fail_next_waitlist_check(&self) {
        self.fail_next_waitlist.store(true, Ordering::SeqCst);
    }

    /// Highest number of searches that were ever in flight at once.
    pub fn max_concurrent_searches(&self) -> usize {
        self.max_active_searches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InventorySource for MockInventory {
    async fn search_trains(
        &self,
        source: &str,
        destination: &str,
        travel_date: DateTime<Utc>,
    ) -> Result<Vec<SharedTrain>, InventoryError> {
        let active = self.active_searches.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active_searches
            .fetch_max(active, Ordering::SeqCst);

        let delay = *self.search_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.active_searches.fetch_sub(1, Ordering::SeqCst);

        self.searches.write().await.push(RecordedSearch {
            source: source.to_string(),
            destination: destination.to_string(),
            travel_date,
            timestamp: Instant::now(),
        });

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(self.trains.read().await.clone())
    }

    async fn waitlist_status(&self, pnr: &str) -> Result<WaitlistStatus, InventoryError> {
        if self.fail_next_waitlist.swap(false, Ordering::SeqCst) {
            return Err(InventoryError::Unavailable(format!(
                "waitlist check failed for {}",
                pnr
            )));
        }

        Ok(self
            .waitlist_statuses
            .write()
            .await
            .pop_front()
            .unwrap_or(WaitlistStatus::Pending))
    }
}
