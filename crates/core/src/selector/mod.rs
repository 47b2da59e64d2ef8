//! Train selection scoring.
//!
//! Scores candidate trains for a request and picks the best one. The score
//! is a deterministic pure function of (train, request); ties resolve to
//! the first candidate in input order.

use crate::booking::BookingRequest;
use crate::inventory::Train;

/// Weight applied to the train's rating component.
const RATING_WEIGHT: f64 = 0.30;
/// Price above which the price component bottoms out at zero.
const PRICE_CEILING: f64 = 2000.0;

/// Score a single candidate train for a request.
///
/// Components:
/// - rating: `0.30 * rating`
/// - price: `max(0, (2000 - fare) / 2000) * 25`, zero when the preferred
///   class is not sold on this train
/// - availability: `min(available / passengers, 1) * 25`
/// - time of day: 20 for departures between 06:00 and 22:59, else 10
pub fn score(train: &Train, request: &BookingRequest) -> f64 {
    let mut score = train.rating * RATING_WEIGHT;

    let price_score = match train.prices.get(&request.preferred_class) {
        Some(&fare) => ((PRICE_CEILING - fare) / PRICE_CEILING).max(0.0) * 25.0,
        None => 0.0,
    };
    score += price_score;

    let available = train
        .available_seats
        .get(&request.preferred_class)
        .copied()
        .unwrap_or(0);
    let passenger_count = request.passengers.len().max(1);
    let availability_score = (available as f64 / passenger_count as f64).min(1.0) * 25.0;
    score += availability_score;

    let hour = train.departure_hour();
    let time_score = if (6..=22).contains(&hour) { 20.0 } else { 10.0 };
    score += time_score;

    score
}

/// Pick the best train from a candidate list.
///
/// Returns `None` only for an empty slice. The first candidate with the
/// maximum score wins, so identical inputs always yield an identical
/// selection.
pub fn select<'a>(request: &BookingRequest, candidates: &'a [Train]) -> Option<&'a Train> {
    let mut best: Option<(&'a Train, f64)> = None;
    for train in candidates {
        let s = score(train, request);
        if best.map_or(true, |(_, current)| s > current) {
            best = Some((train, s));
        }
    }
    best.map(|(train, _)| train)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::SeatClass;
    use crate::testing::fixtures;
    use chrono::{TimeZone, Utc};

    fn request_for(passengers: usize) -> BookingRequest {
        fixtures::request("NDLS", "BCT", passengers, SeatClass::ThirdAc)
    }

    #[test]
    fn test_score_is_deterministic() {
        let train = fixtures::train("12951", 4.5, 1200.0, 10);
        let request = request_for(2);
        assert_eq!(score(&train, &request), score(&train, &request));
        assert_eq!(
            select(&request, std::slice::from_ref(&train)).map(|t| t.number.clone()),
            select(&request, std::slice::from_ref(&train)).map(|t| t.number.clone()),
        );
    }

    #[test]
    fn test_missing_price_scores_zero_for_price_component() {
        let priced = fixtures::train("12951", 3.0, 0.0, 10);
        let mut unpriced = priced.clone();
        unpriced.prices.remove(&SeatClass::ThirdAc);

        let request = request_for(1);
        // Full price component is worth 25 points at a fare of zero.
        assert_eq!(score(&priced, &request) - score(&unpriced, &request), 25.0);
    }

    #[test]
    fn test_availability_saturates_at_passenger_count() {
        let scarce = fixtures::train("A", 3.0, 1000.0, 1);
        let plenty = fixtures::train("B", 3.0, 1000.0, 100);
        let request = request_for(2);
        // One seat for two passengers is worth half the component.
        assert_eq!(score(&plenty, &request) - score(&scarce, &request), 12.5);
    }

    #[test]
    fn test_time_score_prefers_daytime_departures() {
        let mut day = fixtures::train("A", 3.0, 1000.0, 10);
        day.departure_time = Utc.with_ymd_and_hms(2026, 9, 10, 6, 0, 0).unwrap();
        let mut late = day.clone();
        late.departure_time = Utc.with_ymd_and_hms(2026, 9, 10, 23, 0, 0).unwrap();

        let request = request_for(1);
        assert_eq!(score(&day, &request) - score(&late, &request), 10.0);
    }

    #[test]
    fn test_ties_resolve_to_input_order() {
        let first = fixtures::train("11111", 4.0, 1000.0, 10);
        let second = fixtures::train("22222", 4.0, 1000.0, 10);
        let request = request_for(1);
        let candidates = [first, second];
        let picked = select(&request, &candidates).unwrap();
        assert_eq!(picked.number, "11111");
    }

    #[test]
    fn test_empty_candidates_select_none() {
        let request = request_for(1);
        assert!(select(&request, &[]).is_none());
    }

    #[test]
    fn test_higher_rating_wins() {
        let low = fixtures::train("11111", 2.0, 1000.0, 10);
        let high = fixtures::train("22222", 5.0, 1000.0, 10);
        let request = request_for(1);
        let candidates = [low, high];
        let picked = select(&request, &candidates).unwrap();
        assert_eq!(picked.number, "22222");
    }
}
