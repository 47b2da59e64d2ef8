//! In-memory booking history, for tests and ephemeral runs.

use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::engine::{BookingResult, BookingStatus};

use super::{BookingStore, HistoryError};

/// In-memory booking history backed by a vector.
#[derive(Default)]
pub struct MemoryBookingStore {
    results: RwLock<Vec<BookingResult>>,
}

impl MemoryBookingStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookingStore for MemoryBookingStore {
    fn append(&self, result: &BookingResult) -> Result<(), HistoryError> {
        self.results.write().unwrap().push(result.clone());
        Ok(())
    }

    fn by_booking_id(&self, booking_id: &str) -> Result<Option<BookingResult>, HistoryError> {
        Ok(self
            .results
            .read()
            .unwrap()
            .iter()
            .find(|r| r.booking_id == booking_id)
            .cloned())
    }

    fn by_pnr(&self, pnr: &str) -> Result<Option<BookingResult>, HistoryError> {
        Ok(self
            .results
            .read()
            .unwrap()
            .iter()
            .find(|r| r.pnr.as_deref() == Some(pnr))
            .cloned())
    }

    fn by_user(&self, user_id: &str) -> Result<Vec<BookingResult>, HistoryError> {
        Ok(self
            .results
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.request.user_id == user_id)
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<BookingResult>, HistoryError> {
        Ok(self.results.read().unwrap().clone())
    }

    fn in_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<BookingResult>, HistoryError> {
        Ok(self
            .results
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.booked_at >= from && r.booked_at <= to)
            .cloned()
            .collect())
    }

    fn update_status(&self, pnr: &str, status: BookingStatus) -> Result<bool, HistoryError> {
        let mut results = self.results.write().unwrap();
        match results.iter_mut().find(|r| r.pnr.as_deref() == Some(pnr)) {
            Some(result) => {
                result.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
