use thiserror::Error;

pub mod snapshot;
pub mod source;

pub use snapshot::{normalize_title, CatalogSnapshot};
pub use source::{CatalogSource, CsvCatalogSource};

/// Errors raised while loading the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Catalog loader task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Loads the full catalog from `source` and freezes it into a snapshot
pub async fn load_snapshot(
    source: &dyn CatalogSource,
    limit: Option<usize>,
) -> CatalogResult<CatalogSnapshot> {
    let movies = source.load().await?;
    let loaded = movies.len();
    let snapshot = CatalogSnapshot::new(movies, limit);

    tracing::info!(
        source = source.name(),
        loaded,
        kept = snapshot.len(),
        "Catalog snapshot ready"
    );

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Movie;
    use super::source::MockCatalogSource;

    #[tokio::test]
    async fn test_load_snapshot_applies_limit() {
        let mut source = MockCatalogSource::new();
        source.expect_load().times(1).returning(|| {
            Ok(vec![
                Movie::new(1, "Toy Story", 1995),
                Movie::new(2, "Heat", 1995),
                Movie::new(3, "Cars", 2006),
            ])
        });
        source.expect_name().return_const("mock");

        let snapshot = load_snapshot(&source, Some(2)).await.unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.resolve_title("heat"), Some(1));
    }

    #[tokio::test]
    async fn test_load_snapshot_propagates_errors() {
        let mut source = MockCatalogSource::new();
        source.expect_load().returning(|| {
            Err(CatalogError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "missing",
            )))
        });
        source.expect_name().return_const("mock");

        let result = load_snapshot(&source, None).await;
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
