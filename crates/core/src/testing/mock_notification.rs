//! Mock notification sink for testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::booking::BookingRequest;
use crate::engine::BookingResult;
use crate::notification::{NotificationError, NotificationSink};

/// One delivered notification, recorded for assertions.
#[derive(Debug, Clone)]
pub enum NotificationRecord {
    /// A booking confirmation.
    Confirmation {
        /// Result's booking id.
        booking_id: String,
        /// Result's PNR.
        pnr: Option<String>,
    },
    /// A booking failure notice.
    Failure {
        /// Failed request's id.
        request_id: String,
        /// Failure reason as given to the sink.
        reason: String,
    },
    /// A waitlist status update.
    WaitlistUpdate {
        /// PNR the update refers to.
        pnr: String,
        /// Reported status.
        status: String,
    },
}

/// Mock implementation of the NotificationSink trait.
///
/// Records every delivery; can be scripted to fail the next one.
pub struct MockNotificationSink {
    records: Arc<RwLock<Vec<NotificationRecord>>>,
    fail_next: AtomicBool,
}

impl Default for MockNotificationSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotificationSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            fail_next: AtomicBool::new(false),
        }
    }

    /// Make the next delivery fail.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// All recorded deliveries, in order.
    pub async fn records(&self) -> Vec<NotificationRecord> {
        self.records.read().await.clone()
    }

    /// Number of confirmation deliveries.
    pub async fn confirmation_notifications(&self) -> usize {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| matches!(r, NotificationRecord::Confirmation { .. }))
            .count()
    }

    /// Number of failure deliveries.
    pub async fn failure_notifications(&self) -> usize {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| matches!(r, NotificationRecord::Failure { .. }))
            .count()
    }

    fn check_failure(&self) -> Result<(), NotificationError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(NotificationError::DeliveryFailed(
                "simulated delivery failure".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationSink for MockNotificationSink {
    async fn send_booking_confirmation(
        &self,
        result: &BookingResult,
    ) -> Result<(), NotificationError> {
        self.check_failure()?;
        self.records
            .write()
            .await
            .push(NotificationRecord::Confirmation {
                booking_id: result.booking_id.clone(),
                pnr: result.pnr.clone(),
            });
        Ok(())
    }

    async fn send_booking_failure(
        &self,
        request: &BookingRequest,
        reason: &str,
    ) -> Result<(), NotificationError> {
        self.check_failure()?;
        self.records.write().await.push(NotificationRecord::Failure {
            request_id: request.id.clone(),
            reason: reason.to_string(),
        });
        Ok(())
    }

    async fn send_waitlist_update(
        &self,
        pnr: &str,
        status: &str,
    ) -> Result<(), NotificationError> {
        self.check_failure()?;
        self.records
            .write()
            .await
            .push(NotificationRecord::WaitlistUpdate {
                pnr: pnr.to_string(),
                status: status.to_string(),
            });
        Ok(())
    }
}
