//! Booking history and analytics.
//!
//! Append-only record of every booking attempt, with pluggable storage
//! backends (SQLite for real deployments, in-memory for tests) and a small
//! analytics summary computed over a date range.

mod memory;
mod sqlite;
mod store;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::{BookingResult, BookingStatus};

pub use memory::MemoryBookingStore;
pub use sqlite::SqliteBookingStore;
pub use store::{BookingStore, HistoryError};

/// Aggregate booking statistics over a set of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingAnalytics {
    /// Number of results considered.
    pub total_bookings: usize,
    /// Results with status `Confirmed`.
    pub successful_bookings: usize,
    /// Results with status `Failed`.
    pub failed_bookings: usize,
    /// Results with status `Waitlisted`.
    pub waitlisted_bookings: usize,
    /// successful / total, 0.0 when there are no results.
    pub success_rate: f64,
    /// Mean attempt duration across all results.
    pub average_booking_time: Duration,
    /// Sum of total amounts over every result considered. Failed attempts
    /// carry a zero amount; a booking cancelled after confirmation keeps
    /// its amount here.
    pub total_amount_booked: f64,
}

/// Summarize a slice of booking results.
pub fn analyze(results: &[BookingResult]) -> BookingAnalytics {
    let total = results.len();
    let successful = results
        .iter()
        .filter(|r| r.status == BookingStatus::Confirmed)
        .count();
    let failed = results
        .iter()
        .filter(|r| r.status == BookingStatus::Failed)
        .count();
    let waitlisted = results
        .iter()
        .filter(|r| r.status == BookingStatus::Waitlisted)
        .count();

    let average_booking_time = if total == 0 {
        Duration::ZERO
    } else {
        results.iter().map(|r| r.duration).sum::<Duration>() / total as u32
    };

    let total_amount_booked = results.iter().map(|r| r.total_amount).sum();

    BookingAnalytics {
        total_bookings: total,
        successful_bookings: successful,
        failed_bookings: failed,
        waitlisted_bookings: waitlisted,
        success_rate: if total == 0 {
            0.0
        } else {
            successful as f64 / total as f64
        },
        average_booking_time,
        total_amount_booked,
    }
}
