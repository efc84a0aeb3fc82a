use std::path::{Path, PathBuf};

use super::{CatalogError, CatalogResult};
use crate::models::Movie;

/// Source of the raw movie catalog
///
/// Implementations load the complete dataset once; the result is frozen into
/// a [`super::CatalogSnapshot`] by the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Loads every movie, in source order
    async fn load(&self) -> CatalogResult<Vec<Movie>>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Reads movies from a CSV export with a header row.
///
/// Expected columns: `id, title, genres, production_companies, overview,
/// release_year, popularity`. Other columns are ignored.
#[derive(Debug, Clone)]
pub struct CsvCatalogSource {
    path: PathBuf,
}

impl CsvCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses the file synchronously. Malformed rows are skipped with a warning.
    pub fn read_movies(path: &Path) -> CatalogResult<Vec<Movie>> {
        let mut reader = csv::Reader::from_path(path)?;

        let mut movies = Vec::new();
        let mut skipped = 0usize;
        for (line, record) in reader.deserialize::<Movie>().enumerate() {
            match record {
                Ok(movie) => movies.push(movie),
                Err(e) if is_row_error(&e) => {
                    skipped += 1;
                    tracing::warn!(row = line + 1, error = %e, "Skipping malformed catalog row");
                }
                Err(e) => return Err(CatalogError::Csv(e)),
            }
        }

        if skipped > 0 {
            tracing::warn!(
                loaded = movies.len(),
                skipped,
                "Catalog loaded with skipped rows"
            );
        }

        Ok(movies)
    }
}

fn is_row_error(error: &csv::Error) -> bool {
    matches!(
        error.kind(),
        csv::ErrorKind::Deserialize { .. } | csv::ErrorKind::UnequalLengths { .. }
    )
}

#[async_trait::async_trait]
impl CatalogSource for CsvCatalogSource {
    async fn load(&self) -> CatalogResult<Vec<Movie>> {
        let path = self.path.clone();
        tracing::info!(path = %path.display(), "Loading movie catalog");

        tokio::task::spawn_blocking(move || Self::read_movies(&path)).await?
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}
