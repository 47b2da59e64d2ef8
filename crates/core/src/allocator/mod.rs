//! Greedy seat allocation.
//!
//! Assigns seats to passengers within a chosen train, mutating the train's
//! seat statuses and coach counters in place. Passengers are processed in
//! request order and seats committed to an earlier passenger are never
//! reconsidered for a later one; this is a fairness/simplicity tradeoff,
//! not an optimal assignment.
//!
//! Callers must hold the train's lock (see [`crate::inventory::SharedTrain`])
//! for the whole call so concurrent attempts against the same snapshot
//! cannot double-book.

use serde::{Deserialize, Serialize};

use crate::booking::{BookingRequest, Passenger, SeatPreference};
use crate::inventory::{SeatStatus, SeatType, Train};

/// One passenger bound to one (coach, seat) pair with a computed fare.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatAllocation {
    /// The passenger this seat was assigned to.
    pub passenger: Passenger,
    /// Coach number within the train.
    pub coach_number: String,
    /// Seat number within the coach.
    pub seat_number: String,
    /// Fare for this seat, from the train's per-class price table.
    pub fare: f64,
    /// Whether the seat is guaranteed (false would mean waitlisted).
    pub is_confirmed: bool,
}

/// Whether a seat satisfies a passenger's placement preference.
fn matches_preference(preference: SeatPreference, seat: &crate::inventory::Seat) -> bool {
    match preference {
        SeatPreference::NoPreference => true,
        SeatPreference::Window => seat.is_window,
        SeatPreference::Aisle => seat.is_aisle,
        SeatPreference::Lower => seat.seat_type == SeatType::LowerBerth,
        SeatPreference::Upper => seat.seat_type == SeatType::UpperBerth,
    }
}

/// Pick a seat for one passenger and mark it booked.
///
/// Scans the given coaches in order; within a coach prefers the first
/// available seat matching the passenger's preference, falling back to the
/// first available seat of any kind. Returns the allocation, or `None` when
/// no coach yields a seat.
fn allocate_one(
    train: &mut Train,
    coach_order: &[usize],
    passenger: &Passenger,
) -> Option<SeatAllocation> {
    for &coach_idx in coach_order {
        let coach = &mut train.coaches[coach_idx];

        let preferred = coach.seats.iter().position(|s| {
            s.status == SeatStatus::Available && matches_preference(passenger.seat_preference, s)
        });
        let seat_idx = preferred
            .or_else(|| {
                coach
                    .seats
                    .iter()
                    .position(|s| s.status == SeatStatus::Available)
            });

        if let Some(seat_idx) = seat_idx {
            let fare = train
                .prices
                .get(&train.coaches[coach_idx].class)
                .copied()
                .unwrap_or(0.0);
            let coach = &mut train.coaches[coach_idx];
            let seat = &mut coach.seats[seat_idx];
            seat.status = SeatStatus::Booked;
            coach.available_seats = coach.available_seats.saturating_sub(1);

            return Some(SeatAllocation {
                passenger: passenger.clone(),
                coach_number: coach.number.clone(),
                seat_number: coach.seats[seat_idx].number.clone(),
                fare,
                is_confirmed: true,
            });
        }
    }
    None
}

/// Allocate seats for every passenger in the request, in request order.
///
/// Passengers for whom no seat could be found are skipped; the caller
/// judges the attempt failed when the returned list is shorter than the
/// passenger list.
pub fn allocate(request: &BookingRequest, train: &mut Train) -> Vec<SeatAllocation> {
    let mut allocations = Vec::with_capacity(request.passengers.len());

    for passenger in &request.passengers {
        // Coaches of the preferred class; when none match, any coach that
        // still has seats. Scanned cheapest class first (enum ordinal).
        let mut candidates: Vec<usize> = train
            .coaches
            .iter()
            .enumerate()
            .filter(|(_, c)| c.class == request.preferred_class)
            .map(|(i, _)| i)
            .collect();
        if candidates.is_empty() {
            candidates = train
                .coaches
                .iter()
                .enumerate()
                .filter(|(_, c)| c.available_seats > 0)
                .map(|(i, _)| i)
                .collect();
        }
        candidates.sort_by_key(|&i| train.coaches[i].class);

        match allocate_one(train, &candidates, passenger) {
            Some(allocation) => allocations.push(allocation),
            None => {
                tracing::debug!(
                    "No seat available for passenger {} on train {}",
                    passenger.name,
                    train.number
                );
            }
        }
    }

    allocations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{Coach, Seat, SeatClass};
    use crate::testing::fixtures;

    fn train_with_coaches(coaches: Vec<Coach>) -> Train {
        let mut train = fixtures::train("12951", 4.0, 1500.0, 0);
        train.coaches = coaches;
        train
    }

    fn seats(prefix: &str, count: usize) -> Vec<Seat> {
        (1..=count)
            .map(|i| {
                let seat = Seat::available(format!("{prefix}-{i}"), SeatType::LowerBerth);
                if i % 2 == 1 {
                    seat.window()
                } else {
                    seat.aisle()
                }
            })
            .collect()
    }

    #[test]
    fn test_never_assigns_booked_seat_or_same_seat_twice() {
        let mut train = train_with_coaches(vec![Coach::new(
            "B1",
            SeatClass::ThirdAc,
            seats("B1", 4),
        )]);
        train.coaches[0].seats[0].status = SeatStatus::Booked;
        train.coaches[0].available_seats -= 1;

        let request = fixtures::request("NDLS", "BCT", 3, SeatClass::ThirdAc);
        let allocations = allocate(&request, &mut train);

        assert_eq!(allocations.len(), 3);
        let mut numbers: Vec<_> = allocations.iter().map(|a| a.seat_number.clone()).collect();
        numbers.sort();
        numbers.dedup();
        assert_eq!(numbers.len(), 3, "same seat assigned twice");
        assert!(!numbers.contains(&"B1-1".to_string()), "booked seat reused");
    }

    #[test]
    fn test_aisle_preference_is_honored() {
        let mut train = train_with_coaches(vec![Coach::new(
            "B1",
            SeatClass::ThirdAc,
            seats("B1", 4),
        )]);
        let mut request = fixtures::request("NDLS", "BCT", 1, SeatClass::ThirdAc);
        request.passengers[0].seat_preference = SeatPreference::Aisle;

        let allocations = allocate(&request, &mut train);
        assert_eq!(allocations.len(), 1);
        // First aisle seat in layout order is B1-2.
        assert_eq!(allocations[0].seat_number, "B1-2");
    }

    #[test]
    fn test_falls_back_to_any_seat_when_preference_unmet() {
        let seats = vec![
            Seat::available("B1-1", SeatType::UpperBerth),
            Seat::available("B1-2", SeatType::UpperBerth),
        ];
        let mut train =
            train_with_coaches(vec![Coach::new("B1", SeatClass::ThirdAc, seats)]);
        let mut request = fixtures::request("NDLS", "BCT", 1, SeatClass::ThirdAc);
        request.passengers[0].seat_preference = SeatPreference::Lower;

        let allocations = allocate(&request, &mut train);
        assert_eq!(allocations.len(), 1);
        assert_eq!(allocations[0].seat_number, "B1-1");
    }

    #[test]
    fn test_falls_back_to_other_classes_when_preferred_class_absent() {
        let mut train = train_with_coaches(vec![
            Coach::new("A1", SeatClass::SecondAc, seats("A1", 2)),
            Coach::new("S1", SeatClass::Sleeper, seats("S1", 2)),
        ]);
        let request = fixtures::request("NDLS", "BCT", 1, SeatClass::ThirdAc);

        let allocations = allocate(&request, &mut train);
        assert_eq!(allocations.len(), 1);
        // Cheapest class scans first: sleeper before second AC.
        assert_eq!(allocations[0].coach_number, "S1");
    }

    #[test]
    fn test_skips_passenger_when_train_is_full() {
        let mut train = train_with_coaches(vec![Coach::new(
            "B1",
            SeatClass::ThirdAc,
            seats("B1", 2),
        )]);
        let request = fixtures::request("NDLS", "BCT", 3, SeatClass::ThirdAc);

        let allocations = allocate(&request, &mut train);
        assert_eq!(allocations.len(), 2);
        assert_eq!(train.coaches[0].available_seats, 0);
    }

    #[test]
    fn test_fare_comes_from_price_table() {
        let mut train = train_with_coaches(vec![Coach::new(
            "B1",
            SeatClass::ThirdAc,
            seats("B1", 2),
        )]);
        train.prices.insert(SeatClass::ThirdAc, 1250.0);
        let request = fixtures::request("NDLS", "BCT", 2, SeatClass::ThirdAc);

        let allocations = allocate(&request, &mut train);
        assert!(allocations.iter().all(|a| a.fare == 1250.0));
    }

    #[test]
    fn test_counters_stay_in_sync() {
        let mut train = train_with_coaches(vec![Coach::new(
            "B1",
            SeatClass::ThirdAc,
            seats("B1", 4),
        )]);
        let request = fixtures::request("NDLS", "BCT", 2, SeatClass::ThirdAc);

        allocate(&request, &mut train);
        let available = train.coaches[0]
            .seats
            .iter()
            .filter(|s| s.status == SeatStatus::Available)
            .count() as u32;
        assert_eq!(train.coaches[0].available_seats, available);
        assert_eq!(available, 2);
    }
}
