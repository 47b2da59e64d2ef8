//! Types describing a user's booking intent.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::inventory::SeatClass;

/// Priority tier for a booking request.
///
/// Carried as metadata; higher tiers may be used by callers to order bulk
/// submissions. The engine itself treats all requests equally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingPriority {
    Low,
    Normal,
    High,
    Critical,
}

impl Default for BookingPriority {
    fn default() -> Self {
        BookingPriority::Normal
    }
}

/// Seat placement preference for a passenger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatPreference {
    Window,
    Aisle,
    Lower,
    Upper,
    NoPreference,
}

impl Default for SeatPreference {
    fn default() -> Self {
        SeatPreference::NoPreference
    }
}

/// Meal preference for a passenger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodPreference {
    Vegetarian,
    NonVegetarian,
    Jain,
    Vegan,
    None,
}

impl Default for FoodPreference {
    fn default() -> Self {
        FoodPreference::None
    }
}

/// A passenger attached to a booking request. Immutable once attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    /// Full name as it should appear on the ticket.
    pub name: String,
    /// Age in years.
    pub age: u8,
    /// Seat placement preference.
    #[serde(default)]
    pub seat_preference: SeatPreference,
    /// Meal preference.
    #[serde(default)]
    pub food_preference: FoodPreference,
}

impl Passenger {
    /// Create a passenger with no seat or food preference.
    pub fn new(name: impl Into<String>, age: u8) -> Self {
        Self {
            name: name.into(),
            age,
            seat_preference: SeatPreference::NoPreference,
            food_preference: FoodPreference::None,
        }
    }

    /// Set the seat preference.
    pub fn with_seat_preference(mut self, preference: SeatPreference) -> Self {
        self.seat_preference = preference;
        self
    }

    /// Children travel under adult fare rules below this age.
    pub fn is_child(&self) -> bool {
        self.age < 12
    }

    /// Senior citizens qualify for concessions from this age.
    pub fn is_senior(&self) -> bool {
        self.age >= 60
    }
}

/// Automation behavior flags and the booking window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationSettings {
    /// Consult the pricing advisor before each attempt.
    #[serde(default = "default_true")]
    pub enable_price_tracking: bool,
    /// Allow the scheduler to book without manual confirmation.
    #[serde(default)]
    pub enable_auto_booking: bool,
    /// Spawn a waitlist monitor when an attempt lands on the waitlist.
    #[serde(default = "default_true")]
    pub enable_waitlist_monitoring: bool,
    /// Opportunistically upgrade the seat class when available.
    #[serde(default)]
    pub enable_seat_upgrade: bool,
    /// Deliver notifications for booking outcomes.
    #[serde(default = "default_true")]
    pub enable_notifications: bool,
    /// Permit more than one attempt per automation run.
    #[serde(default = "default_true")]
    pub enable_multiple_attempts: bool,
    /// Lead time before travel at which attempts may begin.
    #[serde(default = "default_booking_window")]
    pub booking_window: Duration,
}

fn default_true() -> bool {
    true
}

fn default_booking_window() -> Duration {
    Duration::from_secs(2 * 60 * 60)
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            enable_price_tracking: true,
            enable_auto_booking: false,
            enable_waitlist_monitoring: true,
            enable_seat_upgrade: false,
            enable_notifications: true,
            enable_multiple_attempts: true,
            booking_window: default_booking_window(),
        }
    }
}

/// A declarative booking intent.
///
/// Created by the caller and never mutated by the engine. The id keys the
/// scheduler registry and cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Unique request id.
    pub id: String,
    /// User who submitted the request.
    pub user_id: String,
    /// Source station code (e.g. "NDLS").
    pub source: String,
    /// Destination station code (e.g. "BCT").
    pub destination: String,
    /// Intended travel date. Must be strictly in the future.
    pub travel_date: DateTime<Utc>,
    /// Passengers, in allocation order.
    pub passengers: Vec<Passenger>,
    /// Preferred seat class.
    pub preferred_class: SeatClass,
    /// Ranked train numbers the user would prefer, best first.
    #[serde(default)]
    pub preferred_trains: Vec<String>,
    /// Priority tier.
    #[serde(default)]
    pub priority: BookingPriority,
    /// Automation flags and the booking window.
    #[serde(default)]
    pub automation: AutomationSettings,
    /// Maximum attempts per automation run.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Fixed interval between attempts.
    #[serde(default = "default_retry_interval")]
    pub retry_interval: Duration,
    /// Highest acceptable total price, 0 = no cap.
    #[serde(default)]
    pub max_price: f64,
    /// Retry automatically on failed attempts.
    #[serde(default = "default_true")]
    pub auto_retry: bool,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
}

fn default_max_retries() -> u32 {
    5
}

fn default_retry_interval() -> Duration {
    Duration::from_secs(5 * 60)
}

impl BookingRequest {
    /// Create a request with generated id and default automation settings.
    pub fn new(
        user_id: impl Into<String>,
        source: impl Into<String>,
        destination: impl Into<String>,
        travel_date: DateTime<Utc>,
        passengers: Vec<Passenger>,
        preferred_class: SeatClass,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            source: source.into(),
            destination: destination.into(),
            travel_date,
            passengers,
            preferred_class,
            preferred_trains: Vec::new(),
            priority: BookingPriority::Normal,
            automation: AutomationSettings::default(),
            max_retries: default_max_retries(),
            retry_interval: default_retry_interval(),
            max_price: 0.0,
            auto_retry: true,
            created_at: Utc::now(),
        }
    }

    /// Route label used in logs and analytics ("NDLS-BCT").
    pub fn route(&self) -> String {
        format!("{}-{}", self.source, self.destination)
    }
}
