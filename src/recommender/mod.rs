use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::catalog::CatalogSnapshot;

pub mod backend;
pub mod error;
pub mod features;
pub mod neighbors;
pub mod similarity;
pub mod stop_words;
pub mod text;

pub use backend::{BackendKind, Neighbor, RecommenderBackend};
pub use error::{RecommendError, RecommendResult};
pub use neighbors::NeighborIndexEngine;
pub use similarity::SimilarityMatrixEngine;

/// Build-time settings for a [`Recommender`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommenderOptions {
    pub backend: BackendKind,
    /// Adds one-hot production companies to the neighbor-index features
    pub include_companies: bool,
    /// Result size the neighbor index is sized for
    pub default_top_n: usize,
}

impl Default for RecommenderOptions {
    fn default() -> Self {
        Self {
            backend: BackendKind::SimilarityMatrix,
            include_companies: false,
            default_top_n: 5,
        }
    }
}

/// A recommended movie with its backend score
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub id: i64,
    pub title: String,
    /// Cosine similarity (similarity matrix) or Euclidean distance (neighbor index)
    pub score: f64,
}

/// Content-based recommender bound to one catalog snapshot.
///
/// The backend is built from the same snapshot it answers for, so row
/// positions always agree. Instances are immutable; refreshing the catalog
/// means building a new one.
pub struct Recommender {
    catalog: Arc<CatalogSnapshot>,
    backend: Box<dyn RecommenderBackend>,
    built_at: DateTime<Utc>,
}

impl std::fmt::Debug for Recommender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recommender")
            .field("backend", &self.backend.kind())
            .field("movies", &self.catalog.len())
            .field("built_at", &self.built_at)
            .finish()
    }
}

impl Recommender {
    /// Fits features and builds the selected backend over `catalog`
    pub fn build(catalog: Arc<CatalogSnapshot>, options: RecommenderOptions) -> RecommendResult<Self> {
        let start = Instant::now();
        let movies = catalog.movies();

        let backend: Box<dyn RecommenderBackend> = match options.backend {
            BackendKind::SimilarityMatrix => Box::new(SimilarityMatrixEngine::build(movies)?),
            BackendKind::NeighborIndex => Box::new(NeighborIndexEngine::build(
                movies,
                options.include_companies,
                options.default_top_n,
            )?),
        };

        if movies.is_empty() {
            tracing::warn!(backend = %options.backend, "Recommender built over an empty catalog");
        }

        tracing::info!(
            backend = %options.backend,
            movies = movies.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Recommender built"
        );

        Ok(Self {
            catalog,
            backend,
            built_at: Utc::now(),
        })
    }

    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn catalog(&self) -> &CatalogSnapshot {
        &self.catalog
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Titles of the `top_n` movies most similar to the movie at `row`.
    ///
    /// Returns fewer than `top_n` titles only when the catalog is smaller
    /// than `top_n + 1`. Fails with `InvalidIndex` for rows outside the
    /// catalog and `InvalidTopN` when `top_n` is 0.
    pub fn recommend(&self, row: usize, top_n: usize) -> RecommendResult<Vec<String>> {
        Ok(self
            .ranked(row, top_n)?
            .into_iter()
            .map(|recommendation| recommendation.title)
            .collect())
    }

    /// Same as [`Self::recommend`], addressed by movie id and keeping scores
    pub fn recommend_by_id(&self, id: i64, top_n: usize) -> RecommendResult<Vec<Recommendation>> {
        let row = self
            .catalog
            .row_of(id)
            .ok_or(RecommendError::UnknownMovie(id))?;
        self.ranked(row, top_n)
    }

    fn ranked(&self, row: usize, top_n: usize) -> RecommendResult<Vec<Recommendation>> {
        if top_n == 0 {
            return Err(RecommendError::InvalidTopN);
        }

        let neighbors = self.backend.neighbors(row, top_n)?;
        neighbors
            .into_iter()
            .map(|neighbor| {
                let movie = self
                    .catalog
                    .movie(neighbor.row)
                    .ok_or(RecommendError::InvalidIndex {
                        index: neighbor.row,
                        len: self.catalog.len(),
                    })?;
                Ok(Recommendation {
                    id: movie.id,
                    title: movie.title.clone(),
                    score: neighbor.score,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Movie;

    fn catalog() -> Arc<CatalogSnapshot> {
        Arc::new(CatalogSnapshot::new(
            vec![
                Movie::new(862, "Toy Story", 1995)
                    .with_genres(["Animation", "Comedy"])
                    .with_overview("toys come to life"),
                Movie::new(9487, "A Bug's Life", 1998)
                    .with_genres(["Animation", "Comedy"])
                    .with_overview("bugs come to life"),
                Movie::new(949, "Heat", 1995)
                    .with_genres(["Crime", "Thriller"])
                    .with_overview("cops and robbers"),
            ],
            None,
        ))
    }

    #[test]
    fn test_build_selects_backend() {
        let recommender = Recommender::build(catalog(), RecommenderOptions::default()).unwrap();
        assert_eq!(recommender.kind(), BackendKind::SimilarityMatrix);

        let options = RecommenderOptions {
            backend: BackendKind::NeighborIndex,
            ..Default::default()
        };
        let recommender = Recommender::build(catalog(), options).unwrap();
        assert_eq!(recommender.kind(), BackendKind::NeighborIndex);
    }

    #[test]
    fn test_recommend_by_id() {
        let recommender = Recommender::build(catalog(), RecommenderOptions::default()).unwrap();
        let recommendations = recommender.recommend_by_id(862, 1).unwrap();

        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].id, 9487);
        assert_eq!(recommendations[0].title, "A Bug's Life");
        assert!(recommendations[0].score > 0.0);
    }

    #[test]
    fn test_backend_rows_missing_from_catalog_are_reported() {
        let mut movies = catalog().movies().to_vec();
        movies.push(Movie::new(1, "Toy Story 2", 1999).with_genres(["Animation", "Comedy"]));
        let backend = SimilarityMatrixEngine::build(&movies).unwrap();

        let recommender = Recommender {
            catalog: catalog(),
            backend: Box::new(backend),
            built_at: Utc::now(),
        };

        assert!(matches!(
            recommender.recommend(0, 3),
            Err(RecommendError::InvalidIndex { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_unknown_id_and_zero_top_n() {
        let recommender = Recommender::build(catalog(), RecommenderOptions::default()).unwrap();
        assert!(matches!(
            recommender.recommend_by_id(1, 5),
            Err(RecommendError::UnknownMovie(1))
        ));
        assert!(matches!(
            recommender.recommend(0, 0),
            Err(RecommendError::InvalidTopN)
        ));
    }
}
