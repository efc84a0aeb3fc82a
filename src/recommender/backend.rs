use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use super::error::{RecommendError, RecommendResult};

/// Which recommendation strategy backs a [`super::Recommender`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum BackendKind {
    /// TF-IDF text vectors with a precomputed cosine-similarity matrix
    SimilarityMatrix,
    /// Encoded numeric features with a Euclidean nearest-neighbor index
    NeighborIndex,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::SimilarityMatrix => "similarity_matrix",
            BackendKind::NeighborIndex => "neighbor_index",
        }
    }
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = RecommendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "similarity_matrix" | "tfidf" | "cosine" => Ok(BackendKind::SimilarityMatrix),
            "neighbor_index" | "knn" | "nearest_neighbors" => Ok(BackendKind::NeighborIndex),
            _ => Err(RecommendError::UnknownBackend(s.to_string())),
        }
    }
}

impl TryFrom<String> for BackendKind {
    type Error = RecommendError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One ranked neighbor of a query row.
///
/// `score` is a cosine similarity for the similarity-matrix backend and a
/// Euclidean distance for the neighbor-index backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub row: usize,
    pub score: f64,
}

/// A built, immutable recommendation structure over one catalog snapshot
pub trait RecommenderBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Number of rows the backend was built from
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns up to `top_n` rows most similar to `row`, best first, never
    /// including `row` itself
    fn neighbors(&self, row: usize, top_n: usize) -> RecommendResult<Vec<Neighbor>>;
}
