//! Mock pricing advisor for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::booking::BookingRequest;
use crate::pricing::{PricingAdvisor, PricingError};

/// Mock implementation of the PricingAdvisor trait.
///
/// Defaults to "book now" (never wait). The answer and failure behavior
/// are scriptable, and calls are counted for assertions.
pub struct MockPricingAdvisor {
    should_wait: Arc<RwLock<bool>>,
    next_error: Arc<RwLock<Option<PricingError>>>,
    calls: AtomicUsize,
}

impl Default for MockPricingAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPricingAdvisor {
    /// Create an advisor that always says "book now".
    pub fn new() -> Self {
        Self {
            should_wait: Arc::new(RwLock::new(false)),
            next_error: Arc::new(RwLock::new(None)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Set the answer returned by subsequent checks.
    pub async fn set_should_wait(&self, wait: bool) {
        *self.should_wait.write().await = wait;
    }

    /// Make the next check fail with the given error.
    pub async fn set_next_error(&self, error: PricingError) {
        *self.next_error.write().await = Some(error);
    }

    /// Number of price checks performed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PricingAdvisor for MockPricingAdvisor {
    async fn should_wait_for_better_price(
        &self,
        _request: &BookingRequest,
    ) -> Result<bool, PricingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(*self.should_wait.read().await)
    }
}
