use thiserror::Error;

/// Errors raised by the recommendation core
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Row index {index} out of bounds for catalog of {len} movies")]
    InvalidIndex { index: usize, len: usize },

    #[error("No movie with id {0} in the catalog")]
    UnknownMovie(i64),

    #[error("top_n must be at least 1")]
    InvalidTopN,

    #[error("Unknown recommender backend: {0}")]
    UnknownBackend(String),

    #[error("Matrix shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

pub type RecommendResult<T> = Result<T, RecommendError>;

/// Fails with `InvalidIndex` unless `index < len`
pub(crate) fn check_index(index: usize, len: usize) -> RecommendResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(RecommendError::InvalidIndex { index, len })
    }
}
