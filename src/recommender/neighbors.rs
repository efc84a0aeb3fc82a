use ndarray::{Array2, ArrayView1, Axis};

use super::backend::{BackendKind, Neighbor, RecommenderBackend};
use super::error::{check_index, RecommendResult};
use super::features::FeatureEncoder;
use crate::models::Movie;

/// Exact Euclidean k-nearest-neighbor index over dense feature rows
#[derive(Debug, Clone)]
pub struct NeighborIndex {
    points: Array2<f64>,
    n_neighbors: usize,
}

impl NeighborIndex {
    /// Indexes `points`; `n_neighbors` is the default result size of [`Self::query`]
    pub fn fit(points: Array2<f64>, n_neighbors: usize) -> Self {
        Self {
            points,
            n_neighbors: n_neighbors.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.points.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    pub fn point(&self, row: usize) -> RecommendResult<ArrayView1<'_, f64>> {
        check_index(row, self.len())?;
        Ok(self.points.row(row))
    }

    /// Nearest `n_neighbors` rows to `vector`
    pub fn query(&self, vector: ArrayView1<'_, f64>) -> Vec<Neighbor> {
        self.query_k(vector, self.n_neighbors)
    }

    /// Nearest `k` rows to `vector`, ascending distance, ties in row order
    pub fn query_k(&self, vector: ArrayView1<'_, f64>, k: usize) -> Vec<Neighbor> {
        let mut distances: Vec<Neighbor> = self
            .points
            .axis_iter(Axis(0))
            .enumerate()
            .map(|(row, point)| Neighbor {
                row,
                score: euclidean(point, vector),
            })
            .collect();

        distances.sort_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        distances.truncate(k);
        distances
    }
}

fn euclidean(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Nearest-neighbor recommender over one-hot genres (and optionally
/// companies) plus standardized year and popularity
#[derive(Debug, Clone)]
pub struct NeighborIndexEngine {
    encoder: FeatureEncoder,
    index: NeighborIndex,
}

impl NeighborIndexEngine {
    /// Fits the encoders on `movies` and indexes every encoded row.
    ///
    /// The index keeps `top_n + 1` neighbors per query by default since a
    /// catalog movie always matches itself first.
    pub fn build(movies: &[Movie], include_companies: bool, top_n: usize) -> RecommendResult<Self> {
        let encoder = FeatureEncoder::fit(movies, include_companies);
        let points = encoder.transform_all(movies)?;

        tracing::debug!(
            movies = points.nrows(),
            features = points.ncols(),
            include_companies,
            "Feature matrix encoded"
        );

        Ok(Self {
            encoder,
            index: NeighborIndex::fit(points, top_n.saturating_add(1)),
        })
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn index(&self) -> &NeighborIndex {
        &self.index
    }

    /// Nearest `k` catalog rows to an arbitrary movie, encoded with the
    /// encoders fitted at build time. No row is excluded.
    pub fn nearest(&self, movie: &Movie, k: usize) -> Vec<Neighbor> {
        let vector = self.encoder.transform(movie);
        self.index.query_k(vector.view(), k)
    }
}

impl RecommenderBackend for NeighborIndexEngine {
    fn kind(&self) -> BackendKind {
        BackendKind::NeighborIndex
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn neighbors(&self, row: usize, top_n: usize) -> RecommendResult<Vec<Neighbor>> {
        let point = self.index.point(row)?;
        let window = top_n.saturating_add(1);
        let mut neighbors = if window <= self.index.n_neighbors() {
            let mut fitted = self.index.query(point);
            fitted.truncate(window);
            fitted
        } else {
            self.index.query_k(point, window)
        };

        // Drop the query row itself; if a zero-distance duplicate pushed it
        // out of the window, drop the farthest instead
        match neighbors.iter().position(|n| n.row == row) {
            Some(position) => {
                neighbors.remove(position);
            }
            None => {
                neighbors.truncate(top_n);
            }
        }
        Ok(neighbors)
    }
}
