use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;

use super::backend::{BackendKind, Neighbor, RecommenderBackend};
use super::error::{check_index, RecommendResult};
use super::text::{combined_document, TfidfMatrix, TfidfVectorizer};
use crate::models::Movie;

/// Catalog size above which the dense matrix build logs a memory warning
pub const LARGE_CATALOG_ROWS: usize = 5000;

/// Bytes held by an `rows x rows` similarity matrix
pub fn dense_matrix_bytes(rows: usize) -> usize {
    rows.saturating_mul(rows)
        .saturating_mul(std::mem::size_of::<f64>())
}

/// Precomputed all-pairs cosine similarity over TF-IDF movie documents
#[derive(Debug, Clone)]
pub struct SimilarityMatrixEngine {
    similarity: Array2<f64>,
    vocabulary_size: usize,
}

impl SimilarityMatrixEngine {
    /// Vectorizes `movies` and computes the full similarity matrix
    pub fn build(movies: &[Movie]) -> RecommendResult<Self> {
        if movies.len() > LARGE_CATALOG_ROWS {
            tracing::warn!(
                movies = movies.len(),
                matrix_mib = dense_matrix_bytes(movies.len()) / (1024 * 1024),
                "Building a dense similarity matrix over a large catalog, consider CATALOG_LIMIT"
            );
        }

        let documents: Vec<String> = movies.iter().map(combined_document).collect();
        let tfidf = TfidfVectorizer::new().fit_transform(&documents);

        tracing::debug!(
            movies = tfidf.n_rows(),
            vocabulary = tfidf.n_cols(),
            "TF-IDF matrix fitted"
        );

        let similarity = cosine_similarity(&tfidf)?;
        Ok(Self {
            similarity,
            vocabulary_size: tfidf.n_cols(),
        })
    }

    pub fn similarity(&self) -> &Array2<f64> {
        &self.similarity
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    /// Similarity scores between `row` and every row of the catalog
    pub fn scores(&self, row: usize) -> RecommendResult<ArrayView1<'_, f64>> {
        check_index(row, self.len())?;
        Ok(self.similarity.row(row))
    }
}

impl RecommenderBackend for SimilarityMatrixEngine {
    fn kind(&self) -> BackendKind {
        BackendKind::SimilarityMatrix
    }

    fn len(&self) -> usize {
        self.similarity.nrows()
    }

    fn neighbors(&self, row: usize, top_n: usize) -> RecommendResult<Vec<Neighbor>> {
        let scores = self.scores(row)?;

        // Stable sort keeps catalog order among equal scores
        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(order
            .into_iter()
            .filter(|&candidate| candidate != row)
            .take(top_n)
            .map(|candidate| Neighbor {
                row: candidate,
                score: scores[candidate],
            })
            .collect())
    }
}

/// Cosine similarity between every pair of (L2-normalized) rows.
///
/// The diagonal is pinned to 1, including for rows with no terms.
fn cosine_similarity(tfidf: &TfidfMatrix) -> RecommendResult<Array2<f64>> {
    let n = tfidf.n_rows();
    let data: Vec<f64> = (0..n)
        .into_par_iter()
        .flat_map_iter(|i| {
            let row_i = &tfidf.rows[i];
            tfidf.rows.iter().enumerate().map(move |(j, row_j)| {
                if i == j {
                    1.0
                } else {
                    row_i.dot(row_j).clamp(0.0, 1.0)
                }
            })
        })
        .collect();

    Ok(Array2::from_shape_vec((n, n), data)?)
}
