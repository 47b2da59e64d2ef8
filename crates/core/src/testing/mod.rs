//! Testing utilities and mock implementations for integration tests.
//!
//! This module provides mock implementations of all collaborator traits,
//! allowing end-to-end testing of the booking pipeline without real
//! infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use railbook_core::testing::{fixtures, MockInventory, MockNotificationSink};
//!
//! let inventory = MockInventory::new();
//! inventory.add_train(fixtures::train("12951", 4.5, 1200.0, 10)).await;
//!
//! // Use in a BookingEngine...
//! ```

mod mock_inventory;
mod mock_notification;
mod mock_pricing;
mod mock_recommendation;

pub use mock_inventory::{MockInventory, RecordedSearch};
pub use mock_notification::{MockNotificationSink, NotificationRecord};
pub use mock_pricing::MockPricingAdvisor;
pub use mock_recommendation::MockRecommendationAdvisor;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::time::Duration;

    use chrono::{Timelike, Utc};

    use crate::booking::{BookingRequest, Passenger};
    use crate::inventory::{Coach, Seat, SeatClass, SeatType, Train, TrainType};

    /// Create a test train with one third-AC coach of `available` seats.
    ///
    /// Departs tomorrow at 10:00 (daytime, so the selector's convenience
    /// component is stable across tests). Seats alternate window/aisle and
    /// lower/upper berth.
    pub fn train(number: &str, rating: f64, price: f64, available: u32) -> Train {
        let departure = (Utc::now() + chrono::Duration::days(1))
            .with_hour(10)
            .and_then(|d| d.with_minute(0))
            .and_then(|d| d.with_second(0))
            .unwrap_or_else(Utc::now);

        let seats: Vec<Seat> = (1..=available)
            .map(|i| {
                let seat_type = if i % 2 == 1 {
                    SeatType::LowerBerth
                } else {
                    SeatType::UpperBerth
                };
                let seat = Seat::available(format!("B1-{}", i), seat_type);
                if i % 2 == 1 {
                    seat.window()
                } else {
                    seat.aisle()
                }
            })
            .collect();

        Train {
            number: number.to_string(),
            name: format!("{} Express", number),
            source: "NDLS".to_string(),
            destination: "BCT".to_string(),
            departure_time: departure,
            arrival_time: departure + chrono::Duration::hours(16),
            train_type: TrainType::SuperFast,
            rating,
            prices: [(SeatClass::ThirdAc, price)].into(),
            available_seats: [(SeatClass::ThirdAc, available)].into(),
            coaches: vec![Coach::new("B1", SeatClass::ThirdAc, seats)],
        }
    }

    /// Create a test passenger with no preferences.
    pub fn passenger(name: impl Into<String>, age: u8) -> Passenger {
        Passenger::new(name, age)
    }

    /// Create a test booking request with fast, deterministic automation
    /// settings (no price tracking, one attempt, 10ms retry interval).
    pub fn request(
        source: &str,
        destination: &str,
        passenger_count: usize,
        preferred_class: SeatClass,
    ) -> BookingRequest {
        let passengers = (1..=passenger_count)
            .map(|i| passenger(format!("Passenger {}", i), 30))
            .collect();

        let mut request = BookingRequest::new(
            "test-user",
            source,
            destination,
            Utc::now() + chrono::Duration::days(7),
            passengers,
            preferred_class,
        );
        request.automation.enable_price_tracking = false;
        request.max_retries = 1;
        request.retry_interval = Duration::from_millis(10);
        request
    }
}
