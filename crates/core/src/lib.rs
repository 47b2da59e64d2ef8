//! Core booking automation library.
//!
//! The pieces fit together like this: a [`booking::BookingRequest`]
//! describes what the user wants; the [`engine::BookingEngine`] drives
//! attempts against an [`inventory::InventorySource`] using the
//! [`selector`] and [`allocator`]; the [`scheduler::AutomationScheduler`]
//! runs automations in the background; [`history`] keeps the append-only
//! record of every attempt.

pub mod allocator;
pub mod booking;
pub mod config;
pub mod engine;
pub mod events;
pub mod history;
pub mod inventory;
pub mod metrics;
pub mod notification;
pub mod pricing;
pub mod recommendation;
pub mod scheduler;
pub mod selector;
pub mod testing;
pub mod waitlist;

pub use booking::{AutomationSettings, BookingPriority, BookingRequest, Passenger};
pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use engine::{
    BookingEngine, BookingError, BookingResult, BookingStatus, CancelToken, EngineConfig,
};
pub use events::{BookingEvent, EventBus};
pub use history::{BookingStore, MemoryBookingStore, SqliteBookingStore};
pub use inventory::{InventorySource, SeatClass, Train};
pub use scheduler::AutomationScheduler;
