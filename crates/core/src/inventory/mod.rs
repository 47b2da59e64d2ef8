//! Inventory abstraction.
//!
//! This module provides the [`InventorySource`] trait for querying train
//! inventory. Trains come back as shared mutable snapshots
//! ([`SharedTrain`]) that the allocator is permitted to alter; holding the
//! per-train lock while allocating is what keeps concurrent attempts from
//! double-booking a seat.

mod types;

pub use types::{
    share, Coach, InventoryError, InventorySource, Seat, SeatClass, SeatStatus, SeatType,
    SharedTrain, Train, TrainType, WaitlistStatus,
};
