//! Types for the train inventory graph.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors returned by an inventory source.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The backend could not be reached.
    #[error("inventory backend unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected the query.
    #[error("invalid inventory query: {0}")]
    InvalidQuery(String),

    /// No record exists for the given PNR.
    #[error("unknown PNR: {0}")]
    UnknownPnr(String),
}

/// Fare tier governing price and seat layout.
///
/// Ordinal order doubles as the allocator's scan order (cheapest class
/// first), so variants must stay sorted by fare.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SeatClass {
    GeneralSeating,
    SecondSitting,
    Sleeper,
    ThirdAc,
    SecondAc,
    FirstAc,
    ExecutiveChair,
    Business,
}

/// Berth kind of a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatType {
    Sitting,
    LowerBerth,
    MiddleBerth,
    UpperBerth,
    SideLower,
    SideUpper,
}

/// Occupancy status of a seat.
///
/// `Available -> Booked` is the only transition the engine performs; it is
/// not reversible by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatStatus {
    Available,
    Booked,
    Blocked,
    Maintenance,
    Reserved,
}

/// Service category of a train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainType {
    Express,
    SuperFast,
    Local,
    Metro,
    HighSpeed,
    Luxury,
}

/// Resolution state of a waitlisted PNR, as reported by the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitlistStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// A single seat within a coach.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    /// Seat number within the coach (e.g. "B1-23").
    pub number: String,
    /// Berth kind.
    pub seat_type: SeatType,
    /// Occupancy status.
    pub status: SeatStatus,
    /// Whether the seat is at a window.
    pub is_window: bool,
    /// Whether the seat is on the aisle.
    pub is_aisle: bool,
}

impl Seat {
    /// Create an available seat.
    pub fn available(number: impl Into<String>, seat_type: SeatType) -> Self {
        Self {
            number: number.into(),
            seat_type,
            status: SeatStatus::Available,
            is_window: false,
            is_aisle: false,
        }
    }

    /// Mark the seat as a window seat.
    pub fn window(mut self) -> Self {
        self.is_window = true;
        self
    }

    /// Mark the seat as an aisle seat.
    pub fn aisle(mut self) -> Self {
        self.is_aisle = true;
        self
    }
}

/// A coach within a train.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coach {
    /// Coach number (e.g. "B1").
    pub number: String,
    /// Fare class of every seat in this coach.
    pub class: SeatClass,
    /// Seats in layout order.
    pub seats: Vec<Seat>,
    /// Count of seats currently available. Kept in sync by the allocator.
    pub available_seats: u32,
}

impl Coach {
    /// Create a coach; the availability counter is derived from the seats.
    pub fn new(number: impl Into<String>, class: SeatClass, seats: Vec<Seat>) -> Self {
        let available_seats = seats
            .iter()
            .filter(|s| s.status == SeatStatus::Available)
            .count() as u32;
        Self {
            number: number.into(),
            class,
            seats,
            available_seats,
        }
    }
}

/// A train snapshot returned by the inventory source.
///
/// The engine treats this as mutable state: the allocator flips seat
/// statuses and decrements coach counters in place, under the train's lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Train {
    /// Train number (e.g. "12951").
    pub number: String,
    /// Display name (e.g. "Rajdhani Express").
    pub name: String,
    /// Source station code.
    pub source: String,
    /// Destination station code.
    pub destination: String,
    /// Scheduled departure.
    pub departure_time: DateTime<Utc>,
    /// Scheduled arrival.
    pub arrival_time: DateTime<Utc>,
    /// Service category.
    pub train_type: TrainType,
    /// User rating, 0.0-5.0.
    pub rating: f64,
    /// Fare per seat class. Classes absent from this table are not sold on
    /// this train.
    pub prices: HashMap<SeatClass, f64>,
    /// Advertised available seats per class.
    pub available_seats: HashMap<SeatClass, u32>,
    /// Coaches in rake order.
    pub coaches: Vec<Coach>,
}

impl Train {
    /// Hour of the day the train departs, 0-23.
    pub fn departure_hour(&self) -> u32 {
        self.departure_time.hour()
    }
}

/// A train snapshot shared between concurrent attempts.
///
/// All read-then-write access to the coach/seat graph must happen under
/// this lock; the inventory source hands out the same handle for the same
/// train to every caller.
pub type SharedTrain = Arc<Mutex<Train>>;

/// Wrap a train into a shared handle.
pub fn share(train: Train) -> SharedTrain {
    Arc::new(Mutex::new(train))
}

/// Trait for inventory backends.
///
/// Implementations may be remote reservation systems or in-memory fakes;
/// the engine only relies on this contract.
#[async_trait]
pub trait InventorySource: Send + Sync {
    /// Search trains running between two stations on a given date.
    ///
    /// May return an empty list. The returned snapshots are shared and
    /// mutable; see [`SharedTrain`].
    async fn search_trains(
        &self,
        source: &str,
        destination: &str,
        date: DateTime<Utc>,
    ) -> Result<Vec<SharedTrain>, InventoryError>;

    /// Current waitlist resolution state for a PNR.
    async fn waitlist_status(&self, pnr: &str) -> Result<WaitlistStatus, InventoryError>;
}
