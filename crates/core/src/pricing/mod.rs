//! Price advisory abstraction.
//!
//! The engine only asks one question of the pricing collaborator: should
//! this request hold off for a better fare? Trend models, alerts, and
//! historical analysis live behind the implementation.

use async_trait::async_trait;
use thiserror::Error;

use crate::booking::BookingRequest;

/// Errors returned by a pricing advisor.
#[derive(Debug, Error)]
pub enum PricingError {
    /// The advisor could not be reached.
    #[error("pricing advisor unavailable: {0}")]
    Unavailable(String),

    /// The advisor has no data for this route/class.
    #[error("no price data for route {0}")]
    NoData(String),
}

/// Trait for price-prediction backends.
#[async_trait]
pub trait PricingAdvisor: Send + Sync {
    /// Whether the automation should wait for a better price before the
    /// next attempt.
    async fn should_wait_for_better_price(
        &self,
        request: &BookingRequest,
    ) -> Result<bool, PricingError>;
}
