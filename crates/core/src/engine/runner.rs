//! Booking engine implementation.
//!
//! Drives a single attempt through the pipeline
//! validate -> search -> select -> allocate -> price -> settle,
//! and wraps it in the fixed-interval automated retry loop. Every failure
//! inside an attempt is converted into a `Failed` result at this boundary;
//! nothing propagates to the scheduler or the bulk dispatcher.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::allocator;
use crate::booking::BookingRequest;
use crate::events::{BookingEvent, EventBus};
use crate::history::{self, BookingAnalytics, BookingStore, HistoryError};
use crate::inventory::InventorySource;
use crate::metrics;
use crate::notification::NotificationSink;
use crate::pricing::PricingAdvisor;
use crate::recommendation::RecommendationAdvisor;
use crate::selector;
use crate::waitlist::WaitlistMonitor;

use super::config::EngineConfig;
use super::types::{
    BookingError, BookingResult, BookingStatus, CancelToken, PaymentStatus, TrainSummary,
};

/// Seedable source for PNRs and confirmation codes.
///
/// Seeded from config so tests get reproducible identifiers.
struct PnrGenerator {
    rng: Mutex<StdRng>,
}

impl PnrGenerator {
    fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// 4-digit + 6-digit numeric PNR. Collisions are not checked.
    fn next_pnr(&self) -> String {
        let mut rng = self.rng.lock().unwrap();
        format!(
            "{}{}",
            rng.gen_range(1000..10000),
            rng.gen_range(100000..1000000)
        )
    }

    /// Short opaque confirmation token, unrelated to the PNR's state.
    fn confirmation_code(&self) -> String {
        let mut rng = self.rng.lock().unwrap();
        format!("{:08X}", rng.gen::<u32>())
    }
}

/// The booking engine - executes attempts against the inventory source.
pub struct BookingEngine {
    config: EngineConfig,
    inventory: Arc<dyn InventorySource>,
    pricing: Arc<dyn PricingAdvisor>,
    notifier: Arc<dyn NotificationSink>,
    recommender: Option<Arc<dyn RecommendationAdvisor>>,
    store: Arc<dyn BookingStore>,
    events: EventBus,
    pnr: PnrGenerator,
    bulk_slots: Arc<Semaphore>,
}

impl BookingEngine {
    /// Create a new engine.
    pub fn new(
        config: EngineConfig,
        inventory: Arc<dyn InventorySource>,
        pricing: Arc<dyn PricingAdvisor>,
        notifier: Arc<dyn NotificationSink>,
        store: Arc<dyn BookingStore>,
    ) -> Self {
        let bulk_slots = Arc::new(Semaphore::new(config.bulk_concurrency.max(1)));
        let pnr = PnrGenerator::new(config.rng_seed);

        Self {
            config,
            inventory,
            pricing,
            notifier,
            recommender: None,
            store,
            events: EventBus::new(),
            pnr,
            bulk_slots,
        }
    }

    /// Attach an optional recommendation advisor.
    pub fn with_recommender(mut self, recommender: Arc<dyn RecommendationAdvisor>) -> Self {
        self.recommender = Some(recommender);
        self
    }

    /// Handle for subscribing to completion/failure/status events.
    pub fn events(&self) -> EventBus {
        self.events.clone()
    }

    /// Execute one end-to-end booking attempt, no retry.
    pub async fn attempt(&self, request: &BookingRequest) -> BookingResult {
        self.run_attempt(request, 1).await
    }

    /// Run the automated retry loop for a request.
    pub async fn automate(&self, request: &BookingRequest) -> BookingResult {
        match self.automate_with_cancel(request, &CancelToken::new()).await {
            Some(result) => result,
            // A fresh token is never cancelled.
            None => self.failed_result(
                request,
                "automation cancelled".to_string(),
                0,
                Duration::ZERO,
            ),
        }
    }

    /// Run the automated retry loop, observing cancellation before each
    /// attempt.
    ///
    /// Returns `None` when cancelled: no terminal result is produced, only
    /// a status signal. An attempt already in flight runs to completion.
    pub async fn automate_with_cancel(
        &self,
        request: &BookingRequest,
        cancel: &CancelToken,
    ) -> Option<BookingResult> {
        let max_attempts = request.max_retries;
        let retry_interval = request.retry_interval;
        let mut attempt = 1u32;
        let mut last_error = String::from("unknown");

        self.events.status_changed("Starting automated booking...");

        while attempt <= max_attempts {
            if cancel.is_cancelled() {
                info!("Automation cancelled for request {}", request.id);
                self.events
                    .status_changed(format!("Automation cancelled for {}", request.id));
                return None;
            }

            self.events
                .status_changed(format!("Attempt {}/{}", attempt, max_attempts));

            // Price tracking: waiting for a better price still charges an
            // attempt. An advisor failure fails the attempt like any other
            // collaborator error and is retried on the same schedule.
            let result = if request.automation.enable_price_tracking {
                let started = Instant::now();
                match self.pricing.should_wait_for_better_price(request).await {
                    Ok(true) if attempt < max_attempts => {
                        self.events.status_changed("Waiting for better price...");
                        tokio::time::sleep(retry_interval).await;
                        attempt += 1;
                        continue;
                    }
                    Ok(_) => self.run_attempt(request, attempt).await,
                    Err(e) => {
                        self.record_failure(request, e.into(), attempt, started.elapsed())
                            .await
                    }
                }
            } else {
                self.run_attempt(request, attempt).await
            };

            match result.status {
                BookingStatus::Confirmed => return Some(result),
                BookingStatus::Waitlisted
                    if request.automation.enable_waitlist_monitoring =>
                {
                    if let Some(pnr) = result.pnr.clone() {
                        self.events.status_changed("Monitoring waitlist...");
                        WaitlistMonitor::spawn(
                            pnr,
                            self.config.waitlist.clone(),
                            Arc::clone(&self.inventory),
                            Arc::clone(&self.notifier),
                            self.events.clone(),
                        );
                    }
                    return Some(result);
                }
                _ => {
                    if let Some(message) = result.messages.first() {
                        last_error = message.clone();
                    }
                }
            }

            if attempt == max_attempts {
                return Some(self.failed_result(
                    request,
                    BookingError::RetriesExhausted {
                        attempts: max_attempts,
                        last_error,
                    }
                    .to_string(),
                    attempt,
                    Duration::ZERO,
                ));
            }

            tokio::time::sleep(retry_interval).await;
            attempt += 1;
        }

        // Reached only when max_retries is zero.
        Some(self.failed_result(
            request,
            format!("Booking failed after {} attempts", max_attempts),
            0,
            Duration::ZERO,
        ))
    }

    /// Run many requests through the automated loop under the bulk budget.
    ///
    /// Returns one result per input request, in input order, regardless of
    /// completion order. Each request holds a slot for its whole automated
    /// run; the slot is released on completion or panic.
    pub async fn bulk(&self, requests: Vec<BookingRequest>) -> Vec<BookingResult> {
        let tasks = requests.into_iter().map(|request| {
            let slots = Arc::clone(&self.bulk_slots);
            async move {
                let _permit = slots.acquire_owned().await.ok();
                self.automate(&request).await
            }
        });

        futures::future::join_all(tasks).await
    }

    /// One attempt, tagged with its attempt number.
    async fn run_attempt(&self, request: &BookingRequest, attempt_number: u32) -> BookingResult {
        let started = Instant::now();
        self.events.status_changed("Initiating booking process...");

        match self.try_attempt(request, attempt_number, started).await {
            Ok(result) => {
                metrics::BOOKING_ATTEMPTS
                    .with_label_values(&["confirmed"])
                    .inc();
                metrics::ATTEMPT_DURATION
                    .with_label_values(&["confirmed"])
                    .observe(result.duration.as_secs_f64());

                if let Err(e) = self.store.append(&result) {
                    warn!("Failed to record booking {}: {}", result.booking_id, e);
                }
                self.events.emit(BookingEvent::Completed(result.clone()));

                if request.automation.enable_notifications {
                    if let Err(e) = self.notifier.send_booking_confirmation(&result).await {
                        // Advisory; never alters the result.
                        warn!("Confirmation notification failed: {}", e);
                    }
                }

                info!(
                    "Booking confirmed for {} on attempt {}: PNR {}",
                    request.id,
                    attempt_number,
                    result.pnr.as_deref().unwrap_or("-")
                );
                result
            }
            Err(e) => {
                self.record_failure(request, e, attempt_number, started.elapsed())
                    .await
            }
        }
    }

    /// Bookkeeping for a failed attempt: metrics, history record, Failed
    /// event, best-effort failure notification.
    async fn record_failure(
        &self,
        request: &BookingRequest,
        error: BookingError,
        attempt_number: u32,
        duration: Duration,
    ) -> BookingResult {
        let reason = error.to_string();
        warn!(
            "Booking attempt {} failed for {}: {}",
            attempt_number, request.id, reason
        );
        metrics::BOOKING_ATTEMPTS
            .with_label_values(&["failed"])
            .inc();
        metrics::ATTEMPT_DURATION
            .with_label_values(&["failed"])
            .observe(duration.as_secs_f64());

        let result = self.failed_result(request, reason.clone(), attempt_number, duration);
        if let Err(err) = self.store.append(&result) {
            warn!("Failed to record booking {}: {}", result.booking_id, err);
        }
        self.events.emit(BookingEvent::Failed(result.clone()));

        if request.automation.enable_notifications {
            if let Err(err) = self.notifier.send_booking_failure(request, &reason).await {
                warn!("Failure notification failed: {}", err);
            }
        }
        result
    }

    /// The fallible pipeline of a single attempt.
    async fn try_attempt(
        &self,
        request: &BookingRequest,
        attempt_number: u32,
        started: Instant,
    ) -> Result<BookingResult, BookingError> {
        self.validate(request)?;

        let trains = self
            .inventory
            .search_trains(&request.source, &request.destination, request.travel_date)
            .await?;
        if trains.is_empty() {
            return Err(BookingError::NoInventory(request.route()));
        }

        // Ranking hints are advisory; the selector is self-sufficient.
        if let Some(ref advisor) = self.recommender {
            match advisor.route_recommendations(request).await {
                Ok(hints) if !hints.is_empty() => {
                    debug!("{} ranking hints for {}", hints.len(), request.route());
                }
                Ok(_) => {}
                Err(e) => debug!("Recommendation advisor failed: {}", e),
            }
        }

        // Score candidates under each train's lock; first max wins.
        let mut best: Option<(usize, f64)> = None;
        for (idx, handle) in trains.iter().enumerate() {
            let train = handle.lock().await;
            let score = selector::score(&train, request);
            if best.map_or(true, |(_, current)| score > current) {
                best = Some((idx, score));
            }
        }
        let (selected_idx, _) = best.ok_or(BookingError::NoSelection)?;

        // Allocation is a read-then-write of the seat graph; the train
        // lock is held for the whole step so concurrent attempts against
        // the same snapshot serialize.
        let (allocations, summary) = {
            let mut train = trains[selected_idx].lock().await;
            self.events.status_changed(format!("Selected {}", train.name));
            let allocations = allocator::allocate(request, &mut train);
            (allocations, TrainSummary::from(&*train))
        };

        if allocations.len() < request.passengers.len() {
            return Err(BookingError::AllocationShortfall {
                allocated: allocations.len(),
                passengers: request.passengers.len(),
            });
        }

        let total_amount: f64 = allocations.iter().map(|a| a.fare).sum();

        self.events.status_changed("Processing payment...");
        self.settle().await?;

        Ok(BookingResult {
            booking_id: uuid::Uuid::new_v4().to_string(),
            pnr: Some(self.pnr.next_pnr()),
            request: request.clone(),
            selected_train: Some(summary),
            seat_allocations: allocations,
            total_amount,
            tax_amount: total_amount * self.config.tax_rate,
            convenience_fee: self.config.convenience_fee,
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Completed,
            attempt_number,
            duration: started.elapsed(),
            booked_at: Utc::now(),
            confirmation_code: Some(self.pnr.confirmation_code()),
            messages: vec!["Booking confirmed successfully".to_string()],
        })
    }

    fn validate(&self, request: &BookingRequest) -> Result<(), BookingError> {
        if request.source.is_empty() || request.destination.is_empty() {
            return Err(BookingError::Validation(
                "source and destination are required".to_string(),
            ));
        }
        // Exactly today is invalid; tomorrow is the earliest bookable date.
        if request.travel_date.date_naive() <= Utc::now().date_naive() {
            return Err(BookingError::Validation(
                "travel date must be in the future".to_string(),
            ));
        }
        if request.passengers.is_empty() {
            return Err(BookingError::Validation(
                "at least one passenger is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Simulated settlement; stands in for the payment collaborator.
    async fn settle(&self) -> Result<(), BookingError> {
        if self.config.settlement_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.settlement_delay_ms)).await;
        }
        Ok(())
    }

    fn failed_result(
        &self,
        request: &BookingRequest,
        message: String,
        attempt_number: u32,
        duration: Duration,
    ) -> BookingResult {
        BookingResult {
            booking_id: uuid::Uuid::new_v4().to_string(),
            pnr: None,
            request: request.clone(),
            selected_train: None,
            seat_allocations: Vec::new(),
            total_amount: 0.0,
            tax_amount: 0.0,
            convenience_fee: 0.0,
            status: BookingStatus::Failed,
            payment_status: PaymentStatus::Pending,
            attempt_number,
            duration,
            booked_at: Utc::now(),
            confirmation_code: None,
            messages: vec![message],
        }
    }

    // ---- History queries ----------------------------------------------

    /// Booking history for a user. The "default_user" id sees everything.
    pub fn booking_history(&self, user_id: &str) -> Result<Vec<BookingResult>, HistoryError> {
        if user_id == "default_user" {
            self.store.all()
        } else {
            self.store.by_user(user_id)
        }
    }

    /// Look up one booking by PNR.
    pub fn booking_details(&self, pnr: &str) -> Result<Option<BookingResult>, HistoryError> {
        self.store.by_pnr(pnr)
    }

    /// Analytics summary over a booked-at date range.
    pub fn booking_analytics(
        &self,
        from: chrono::DateTime<Utc>,
        to: chrono::DateTime<Utc>,
    ) -> Result<BookingAnalytics, HistoryError> {
        let results = self.store.in_range(from, to)?;
        Ok(history::analyze(&results))
    }

    /// Re-run a stored booking's request through a fresh attempt.
    pub async fn retry_booking(
        &self,
        booking_id: &str,
    ) -> Result<Option<BookingResult>, HistoryError> {
        match self.store.by_booking_id(booking_id)? {
            Some(original) => Ok(Some(self.attempt(&original.request).await)),
            None => Ok(None),
        }
    }

    /// Mark a stored booking as cancelled.
    ///
    /// Seat release is an inventory concern, not the engine's; the seat
    /// graph is left untouched.
    pub fn cancel_booking(&self, pnr: &str) -> Result<bool, HistoryError> {
        let cancelled = self.store.update_status(pnr, BookingStatus::Cancelled)?;
        if cancelled {
            self.events
                .status_changed(format!("Booking cancelled for PNR {}", pnr));
        }
        Ok(cancelled)
    }

    /// Cancel an existing booking and attempt a replacement.
    pub async fn modify_booking(
        &self,
        pnr: &str,
        new_request: &BookingRequest,
    ) -> Result<BookingResult, HistoryError> {
        self.cancel_booking(pnr)?;
        Ok(self.attempt(new_request).await)
    }
}
