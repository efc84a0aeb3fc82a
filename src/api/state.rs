use std::sync::Arc;

use tokio::sync::RwLock;

use crate::catalog::CatalogSnapshot;
use crate::error::{AppError, AppResult};
use crate::recommender::{Recommender, RecommenderOptions};

/// Limits applied to `top_n` request parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopNLimits {
    pub default: usize,
    pub max: usize,
}

impl Default for TopNLimits {
    fn default() -> Self {
        Self { default: 5, max: 50 }
    }
}

impl TopNLimits {
    /// Applies the default and rejects values outside `1..=max`
    pub fn resolve(&self, requested: Option<usize>) -> AppResult<usize> {
        let top_n = requested.unwrap_or(self.default);
        if top_n == 0 || top_n > self.max {
            return Err(AppError::InvalidInput(format!(
                "top_n must be between 1 and {}, got {}",
                self.max, top_n
            )));
        }
        Ok(top_n)
    }
}

/// Shared application state
///
/// Handlers clone the current [`Recommender`] and release the lock right
/// away; a refresh swaps in a freshly built instance without touching the
/// one in-flight requests hold.
#[derive(Clone)]
pub struct AppState {
    recommender: Arc<RwLock<Arc<Recommender>>>,
    pub limits: TopNLimits,
}

impl AppState {
    pub fn new(recommender: Recommender, limits: TopNLimits) -> Self {
        Self {
            recommender: Arc::new(RwLock::new(Arc::new(recommender))),
            limits,
        }
    }

    /// Snapshot of the recommender currently serving requests
    pub async fn recommender(&self) -> Arc<Recommender> {
        self.recommender.read().await.clone()
    }

    /// Replaces the serving recommender, returning the previous one
    pub async fn swap(&self, next: Recommender) -> Arc<Recommender> {
        let mut guard = self.recommender.write().await;
        std::mem::replace(&mut *guard, Arc::new(next))
    }

    /// Builds a recommender for `catalog` off the async runtime and swaps it in
    pub async fn rebuild(
        &self,
        catalog: CatalogSnapshot,
        options: RecommenderOptions,
    ) -> AppResult<Arc<Recommender>> {
        let next = tokio::task::spawn_blocking(move || {
            Recommender::build(Arc::new(catalog), options)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        tracing::info!(
            backend = %next.kind(),
            movies = next.catalog().len(),
            "Swapping in rebuilt recommender"
        );

        Ok(self.swap(next).await)
    }
}
