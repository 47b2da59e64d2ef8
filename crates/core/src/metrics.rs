//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Booking engine (attempts, durations)
//! - Automation scheduler (active automations)
//! - Waitlist monitoring (resolutions)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts};

/// Booking attempts total by result.
pub static BOOKING_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("railbook_booking_attempts_total", "Total booking attempts"),
        &["result"], // "confirmed", "failed"
    )
    .unwrap()
});

/// Booking attempt duration in seconds.
pub static ATTEMPT_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "railbook_attempt_duration_seconds",
            "Duration of one booking attempt",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["result"],
    )
    .unwrap()
});

/// Currently active automated bookings.
pub static ACTIVE_AUTOMATIONS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "railbook_active_automations",
        "Automated bookings currently registered with the scheduler",
    )
    .unwrap()
});

/// Waitlist monitor outcomes.
pub static WAITLIST_RESOLUTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "railbook_waitlist_resolutions_total",
            "Waitlist monitoring outcomes",
        ),
        &["outcome"], // "confirmed", "expired"
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(BOOKING_ATTEMPTS.clone()),
        Box::new(ATTEMPT_DURATION.clone()),
        Box::new(ACTIVE_AUTOMATIONS.clone()),
        Box::new(WAITLIST_RESOLUTIONS.clone()),
    ]
}
