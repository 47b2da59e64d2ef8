//! Booking history storage trait.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::engine::{BookingResult, BookingStatus};

/// Error type for history operations.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Database error.
    #[error("database error: {0}")]
    Database(String),
    /// A stored payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Trait for booking history backends.
///
/// The history is append-only: one record per attempt, confirmed or failed.
/// Records are never rewritten except for the status transitions driven by
/// cancellation.
pub trait BookingStore: Send + Sync {
    /// Append one attempt's result.
    fn append(&self, result: &BookingResult) -> Result<(), HistoryError>;

    /// Look up a result by its booking id.
    fn by_booking_id(&self, booking_id: &str) -> Result<Option<BookingResult>, HistoryError>;

    /// Look up a result by PNR. Failed attempts carry no PNR and are never
    /// returned here.
    fn by_pnr(&self, pnr: &str) -> Result<Option<BookingResult>, HistoryError>;

    /// All results recorded for one user, oldest first.
    fn by_user(&self, user_id: &str) -> Result<Vec<BookingResult>, HistoryError>;

    /// Every recorded result, oldest first.
    fn all(&self) -> Result<Vec<BookingResult>, HistoryError>;

    /// Results whose booked-at timestamp falls inside `[from, to]`.
    fn in_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<BookingResult>, HistoryError>;

    /// Set the status of the booking with the given PNR.
    ///
    /// Returns false when no booking carries that PNR.
    fn update_status(&self, pnr: &str, status: BookingStatus) -> Result<bool, HistoryError>;
}
