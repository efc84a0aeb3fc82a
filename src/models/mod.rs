use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::{fmt::Display, str::FromStr};

pub mod movie;

pub use movie::{parse_label_list, Movie};

/// Compact view of a movie returned by lookup endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: i64,
    pub title: String,
    pub release_year: i32,
    pub popularity: f64,
}

impl From<&Movie> for MovieSummary {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            release_year: movie.release_year,
            popularity: movie.popularity,
        }
    }
}

/// Fields that can be read individually from a movie record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MovieField {
    Genres,
    Overview,
    Popularity,
    ProductionCompanies,
    ReleaseYear,
}

impl MovieField {
    pub const ALL: [MovieField; 5] = [
        MovieField::Genres,
        MovieField::Overview,
        MovieField::Popularity,
        MovieField::ProductionCompanies,
        MovieField::ReleaseYear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MovieField::Genres => "genres",
            MovieField::Overview => "overview",
            MovieField::Popularity => "popularity",
            MovieField::ProductionCompanies => "production_companies",
            MovieField::ReleaseYear => "release_year",
        }
    }

    /// Reads this field from a movie as a JSON value
    pub fn read(&self, movie: &Movie) -> Value {
        match self {
            MovieField::Genres => json!(movie.genres),
            MovieField::Overview => json!(movie.overview),
            MovieField::Popularity => json!(movie.popularity),
            MovieField::ProductionCompanies => json!(movie.production_companies),
            MovieField::ReleaseYear => json!(movie.release_year),
        }
    }
}

impl Display for MovieField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a field name is not one of [`MovieField::ALL`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown movie field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for MovieField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        MovieField::ALL
            .into_iter()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_field_from_str() {
        assert_eq!("genres".parse::<MovieField>().unwrap(), MovieField::Genres);
        assert_eq!(
            "Release-Year".parse::<MovieField>().unwrap(),
            MovieField::ReleaseYear
        );
        assert_eq!(
            "budget".parse::<MovieField>(),
            Err(UnknownField("budget".to_string()))
        );
    }

    #[test]
    fn test_movie_field_read() {
        let movie = Movie::new(862, "Toy Story", 1995)
            .with_genres(["Animation", "Comedy"])
            .with_popularity(21.9);

        assert_eq!(MovieField::Genres.read(&movie), json!(["Animation", "Comedy"]));
        assert_eq!(MovieField::ReleaseYear.read(&movie), json!(1995));
        assert_eq!(MovieField::Popularity.read(&movie), json!(21.9));
    }

    #[test]
    fn test_summary_from_movie() {
        let movie = Movie::new(949, "Heat", 1995).with_popularity(17.9);
        let summary = MovieSummary::from(&movie);
        assert_eq!(summary.id, 949);
        assert_eq!(summary.title, "Heat");
        assert_eq!(summary.release_year, 1995);
    }
}
