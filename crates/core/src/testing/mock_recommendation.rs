//! Mock recommendation advisor for testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::booking::BookingRequest;
use crate::recommendation::{RecommendationAdvisor, RecommendationError, RouteRecommendation};

/// Mock implementation of the RecommendationAdvisor trait.
pub struct MockRecommendationAdvisor {
    recommendations: Arc<RwLock<Vec<RouteRecommendation>>>,
    next_error: Arc<RwLock<Option<RecommendationError>>>,
}

impl Default for MockRecommendationAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRecommendationAdvisor {
    /// Create an advisor with no hints.
    pub fn new() -> Self {
        Self {
            recommendations: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the hints returned by subsequent calls.
    pub async fn set_recommendations(&self, recommendations: Vec<RouteRecommendation>) {
        *self.recommendations.write().await = recommendations;
    }

    /// Make the next call fail with the given error.
    pub async fn set_next_error(&self, error: RecommendationError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl RecommendationAdvisor for MockRecommendationAdvisor {
    async fn route_recommendations(
        &self,
        _request: &BookingRequest,
    ) -> Result<Vec<RouteRecommendation>, RecommendationError> {
        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        Ok(self.recommendations.read().await.clone())
    }
}
