//! Bulk dispatch integration tests.
//!
//! Verifies the concurrency bound on bulk submissions and that results
//! come back in input order regardless of completion order.

use std::sync::Arc;
use std::time::Duration;

use railbook_core::{
    inventory::InventorySource,
    notification::NotificationSink,
    pricing::PricingAdvisor,
    testing::{fixtures, MockInventory, MockNotificationSink, MockPricingAdvisor},
    BookingEngine, BookingRequest, BookingStatus, EngineConfig, MemoryBookingStore, SeatClass,
};

struct TestHarness {
    engine: BookingEngine,
    inventory: Arc<MockInventory>,
}

impl TestHarness {
    fn new(bulk_concurrency: usize) -> Self {
        let inventory = Arc::new(MockInventory::new());
        let engine = BookingEngine::new(
            EngineConfig {
                settlement_delay_ms: 0,
                bulk_concurrency,
                rng_seed: Some(7),
                ..Default::default()
            },
            Arc::clone(&inventory) as Arc<dyn InventorySource>,
            Arc::new(MockPricingAdvisor::new()) as Arc<dyn PricingAdvisor>,
            Arc::new(MockNotificationSink::new()) as Arc<dyn NotificationSink>,
            Arc::new(MemoryBookingStore::new()),
        );

        Self { engine, inventory }
    }

    fn request() -> BookingRequest {
        fixtures::request("NDLS", "BCT", 1, SeatClass::ThirdAc)
    }
}

#[tokio::test]
async fn test_bulk_respects_the_concurrency_bound() {
    let harness = TestHarness::new(3);
    harness
        .inventory
        .add_train(fixtures::train("12951", 4.5, 1200.0, 10))
        .await;
    // Hold each search open long enough that overlap is observable.
    harness
        .inventory
        .set_search_delay(Duration::from_millis(50))
        .await;

    let requests: Vec<BookingRequest> = (0..5).map(|_| TestHarness::request()).collect();
    let ids: Vec<String> = requests.iter().map(|r| r.id.clone()).collect();

    let results = harness.engine.bulk(requests).await;

    assert_eq!(results.len(), 5);
    for (result, id) in results.iter().zip(&ids) {
        assert_eq!(&result.request.id, id, "results out of input order");
        assert_eq!(result.status, BookingStatus::Confirmed);
    }

    assert_eq!(
        harness.inventory.max_concurrent_searches(),
        3,
        "bulk ran outside its concurrency budget"
    );
}

#[tokio::test]
async fn test_failed_runs_release_their_slot() {
    let harness = TestHarness::new(2);
    harness
        .inventory
        .add_train(fixtures::train("12951", 4.5, 1200.0, 10))
        .await;

    // Interleave invalid requests (no passengers) with bookable ones. If a
    // failing run leaked its slot the later requests would never finish.
    let mut requests = Vec::new();
    for i in 0..6 {
        let mut request = TestHarness::request();
        if i % 2 == 0 {
            request.passengers.clear();
        }
        requests.push(request);
    }
    let ids: Vec<String> = requests.iter().map(|r| r.id.clone()).collect();

    let results = harness.engine.bulk(requests).await;

    assert_eq!(results.len(), 6);
    for (i, (result, id)) in results.iter().zip(&ids).enumerate() {
        assert_eq!(&result.request.id, id);
        if i % 2 == 0 {
            assert_eq!(result.status, BookingStatus::Failed);
        } else {
            assert_eq!(result.status, BookingStatus::Confirmed);
        }
    }
}

#[tokio::test]
async fn test_bulk_with_no_requests_returns_nothing() {
    let harness = TestHarness::new(3);
    let results = harness.engine.bulk(Vec::new()).await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_single_slot_serializes_runs() {
    let harness = TestHarness::new(1);
    harness
        .inventory
        .add_train(fixtures::train("12951", 4.5, 1200.0, 10))
        .await;
    harness
        .inventory
        .set_search_delay(Duration::from_millis(20))
        .await;

    let requests: Vec<BookingRequest> = (0..3).map(|_| TestHarness::request()).collect();
    let results = harness.engine.bulk(requests).await;

    assert_eq!(results.len(), 3);
    assert_eq!(harness.inventory.max_concurrent_searches(), 1);
}
