//! Booking request domain types.
//!
//! A [`BookingRequest`] is the immutable intent handed to the engine: who
//! travels, where, when, and how aggressively the automation should pursue a
//! seat. The engine never mutates a request; copies travel through the
//! pipeline.

mod types;

pub use types::{
    AutomationSettings, BookingPriority, BookingRequest, FoodPreference, Passenger,
    SeatPreference,
};
