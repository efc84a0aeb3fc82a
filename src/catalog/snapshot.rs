use std::collections::HashMap;

use crate::models::Movie;

/// Normalizes a title for lookups: trimmed, case-folded, single-spaced
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Immutable, row-ordered view of the movie catalog.
///
/// Row positions are stable for the lifetime of the snapshot and are the
/// positions every recommender backend is built against.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    movies: Vec<Movie>,
    rows_by_title: HashMap<String, Vec<usize>>,
    row_by_id: HashMap<i64, usize>,
}

impl CatalogSnapshot {
    /// Builds a snapshot, keeping at most `limit` movies when given
    pub fn new(mut movies: Vec<Movie>, limit: Option<usize>) -> Self {
        if let Some(limit) = limit {
            movies.truncate(limit);
        }

        let mut rows_by_title: HashMap<String, Vec<usize>> = HashMap::new();
        let mut row_by_id = HashMap::with_capacity(movies.len());
        for (row, movie) in movies.iter().enumerate() {
            rows_by_title
                .entry(normalize_title(&movie.title))
                .or_default()
                .push(row);
            if row_by_id.contains_key(&movie.id) {
                tracing::warn!(id = movie.id, row, "Duplicate movie id, keeping the first row");
            } else {
                row_by_id.insert(movie.id, row);
            }
        }

        Self {
            movies,
            rows_by_title,
            row_by_id,
        }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn movie(&self, row: usize) -> Option<&Movie> {
        self.movies.get(row)
    }

    pub fn row_of(&self, id: i64) -> Option<usize> {
        self.row_by_id.get(&id).copied()
    }

    /// Resolves a free-text title to the first matching row
    pub fn resolve_title(&self, query: &str) -> Option<usize> {
        self.find_by_title(query).first().copied()
    }

    /// Every row whose normalized title equals the normalized `query`
    pub fn find_by_title(&self, query: &str) -> &[usize] {
        self.rows_by_title
            .get(&normalize_title(query))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> CatalogSnapshot {
        CatalogSnapshot::new(
            vec![
                Movie::new(862, "Toy Story", 1995),
                Movie::new(949, "Heat", 1995),
                Movie::new(11859, "Heat", 1986),
            ],
            None,
        )
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("  Toy   STORY "), "toy story");
    }

    #[test]
    fn test_resolve_title_is_case_insensitive() {
        let catalog = snapshot();
        assert_eq!(catalog.resolve_title("toy story"), Some(0));
        assert_eq!(catalog.resolve_title("TOY  Story"), Some(0));
        assert_eq!(catalog.resolve_title("Toy"), None);
    }

    #[test]
    fn test_shared_titles_resolve_to_first_row() {
        let catalog = snapshot();
        assert_eq!(catalog.find_by_title("heat"), &[1, 2]);
        assert_eq!(catalog.resolve_title("heat"), Some(1));
    }

    #[test]
    fn test_row_of_id() {
        let catalog = snapshot();
        assert_eq!(catalog.row_of(11859), Some(2));
        assert_eq!(catalog.row_of(1), None);
    }

    #[test]
    fn test_limit_truncates_catalog() {
        let catalog = CatalogSnapshot::new(snapshot().movies().to_vec(), Some(2));
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.row_of(11859), None);
        assert_eq!(catalog.find_by_title("heat"), &[1]);
    }
}
