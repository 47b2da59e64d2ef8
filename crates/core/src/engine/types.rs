//! Types for the booking engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::allocator::SeatAllocation;
use crate::booking::BookingRequest;
use crate::inventory::Train;

/// Errors raised inside one booking attempt.
///
/// All of these are caught at the engine boundary and converted into a
/// `Failed` [`BookingResult`]; they never escape to the scheduler or the
/// bulk dispatcher.
#[derive(Debug, Error)]
pub enum BookingError {
    /// The request is malformed (empty endpoints, past travel date, no
    /// passengers).
    #[error("invalid booking request: {0}")]
    Validation(String),

    /// The inventory search returned no trains.
    #[error("no trains available for route {0}")]
    NoInventory(String),

    /// The selector could not rank any candidate.
    #[error("no suitable train found")]
    NoSelection,

    /// Fewer seats were allocated than passengers requested.
    #[error("only {allocated} of {passengers} passengers could be seated")]
    AllocationShortfall { allocated: usize, passengers: usize },

    /// The simulated settlement step failed.
    #[error("settlement failed: {0}")]
    Settlement(String),

    /// The automated loop reached its attempt budget.
    #[error("all {attempts} attempts failed. Last error: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    /// Inventory collaborator failure.
    #[error("inventory error: {0}")]
    Inventory(#[from] crate::inventory::InventoryError),

    /// Pricing collaborator failure.
    #[error("pricing error: {0}")]
    Pricing(#[from] crate::pricing::PricingError),

    /// History store failure.
    #[error("history error: {0}")]
    History(#[from] crate::history::HistoryError),
}

/// Outcome status of a booking attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    InProgress,
    Confirmed,
    Failed,
    Cancelled,
    Waitlisted,
    Refunded,
}

/// Payment state recorded on a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Refunded,
    Cancelled,
}

/// Compact snapshot of the selected train, recorded on a result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainSummary {
    /// Train number.
    pub number: String,
    /// Display name.
    pub name: String,
    /// Source station code.
    pub source: String,
    /// Destination station code.
    pub destination: String,
    /// Scheduled departure.
    pub departure_time: DateTime<Utc>,
}

impl From<&Train> for TrainSummary {
    fn from(train: &Train) -> Self {
        Self {
            number: train.number.clone(),
            name: train.name.clone(),
            source: train.source.clone(),
            destination: train.destination.clone(),
            departure_time: train.departure_time,
        }
    }
}

/// The outcome of one booking attempt. Immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResult {
    /// Unique id of this result.
    pub booking_id: String,
    /// Passenger name record; present only when confirmed.
    pub pnr: Option<String>,
    /// The request that produced this result.
    pub request: BookingRequest,
    /// The train the attempt booked against, when one was selected.
    pub selected_train: Option<TrainSummary>,
    /// Seat allocations, one per seated passenger.
    pub seat_allocations: Vec<SeatAllocation>,
    /// Sum of allocation fares, before tax and fee.
    pub total_amount: f64,
    /// Tax charged on the total amount.
    pub tax_amount: f64,
    /// Fixed convenience fee.
    pub convenience_fee: f64,
    /// Outcome status.
    pub status: BookingStatus,
    /// Payment state.
    pub payment_status: PaymentStatus,
    /// Which attempt of the automation run produced this result.
    pub attempt_number: u32,
    /// Wall time the attempt took.
    pub duration: Duration,
    /// When the result was produced.
    pub booked_at: DateTime<Utc>,
    /// Opaque confirmation code minted at settlement.
    pub confirmation_code: Option<String>,
    /// Free-text progress/outcome messages.
    pub messages: Vec<String>,
}

impl BookingResult {
    /// Whether every passenger in the request holds a confirmed seat.
    pub fn fully_allocated(&self) -> bool {
        self.seat_allocations.len() == self.request.passengers.len()
            && self.seat_allocations.iter().all(|a| a.is_confirmed)
    }
}

/// Cooperative cancellation flag shared between the scheduler and the
/// engine's automated loop.
///
/// Cancellation is observed before each attempt starts; an attempt already
/// committed to settlement runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_round_trip() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_error_display() {
        let err = BookingError::AllocationShortfall {
            allocated: 1,
            passengers: 3,
        };
        assert_eq!(
            err.to_string(),
            "only 1 of 3 passengers could be seated"
        );

        let err = BookingError::RetriesExhausted {
            attempts: 5,
            last_error: "no trains available for route NDLS-BCT".to_string(),
        };
        assert!(err.to_string().contains("5 attempts"));
    }
}
