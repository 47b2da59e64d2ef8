//! Notification delivery abstraction.
//!
//! All delivery is best-effort from the engine's perspective: a failed
//! notification is logged and swallowed, and never alters a booking result
//! that has already been produced.

use async_trait::async_trait;
use thiserror::Error;

use crate::booking::BookingRequest;
use crate::engine::BookingResult;

/// Errors returned by a notification sink.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The delivery channel rejected the message.
    #[error("notification delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Trait for notification backends (email, SMS, push, desktop toast).
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Notify the user that a booking was confirmed.
    async fn send_booking_confirmation(
        &self,
        result: &BookingResult,
    ) -> Result<(), NotificationError>;

    /// Notify the user that a booking attempt failed.
    async fn send_booking_failure(
        &self,
        request: &BookingRequest,
        reason: &str,
    ) -> Result<(), NotificationError>;

    /// Notify the user of a waitlist status change.
    async fn send_waitlist_update(&self, pnr: &str, status: &str)
        -> Result<(), NotificationError>;
}
