//! Route recommendation abstraction.
//!
//! An optional collaborator that can supply ranking hints for a request.
//! The train selector is self-sufficient; hints are advisory and a failing
//! advisor never fails an attempt.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::booking::BookingRequest;

/// Errors returned by a recommendation advisor.
#[derive(Debug, Error)]
pub enum RecommendationError {
    /// The advisor could not be reached.
    #[error("recommendation advisor unavailable: {0}")]
    Unavailable(String),
}

/// A ranking hint for a candidate train.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRecommendation {
    /// Train number the hint applies to.
    pub train_number: String,
    /// Human-readable rationale.
    pub reason: String,
    /// Advisor confidence, 0.0-1.0.
    pub confidence: f64,
}

/// Trait for recommendation backends.
#[async_trait]
pub trait RecommendationAdvisor: Send + Sync {
    /// Ranking hints for the request's route, best first.
    async fn route_recommendations(
        &self,
        request: &BookingRequest,
    ) -> Result<Vec<RouteRecommendation>, RecommendationError>;
}
