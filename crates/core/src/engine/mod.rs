//! Booking engine.
//!
//! The engine owns the attempt pipeline (validate, search, select,
//! allocate, price, settle) and the automated retry loop around it. Its
//! collaborators (inventory, pricing, notifications, recommendations,
//! history) are trait objects injected at construction.

mod config;
mod runner;
mod types;

pub use config::EngineConfig;
pub use runner::BookingEngine;
pub use types::{
    BookingError, BookingResult, BookingStatus, CancelToken, PaymentStatus, TrainSummary,
};
