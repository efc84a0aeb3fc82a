use ndarray::{Array1, Array2};
use std::collections::{BTreeSet, HashMap};

use super::error::RecommendResult;
use crate::models::Movie;

/// One-hot encoder over a fixed, sorted label universe
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OneHotEncoder {
    labels: Vec<String>,
    column_of: HashMap<String, usize>,
}

impl OneHotEncoder {
    /// Fits the label universe from every label observed in `label_sets`
    pub fn fit<'a, I>(label_sets: I) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let labels: Vec<String> = label_sets
            .into_iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let column_of = labels
            .iter()
            .enumerate()
            .map(|(col, label)| (label.clone(), col))
            .collect();
        Self { labels, column_of }
    }

    pub fn width(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Writes the encoding of `labels` into `out`, which must be `width()` long.
    /// Labels outside the fitted universe are ignored.
    pub fn encode_into(&self, labels: &[String], out: &mut [f64]) {
        for label in labels {
            if let Some(&col) = self.column_of.get(label) {
                out[col] = 1.0;
            }
        }
    }
}

/// Zero-mean, unit-variance scaler for one numeric column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardScaler {
    mean: f64,
    scale: f64,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self {
            mean: 0.0,
            scale: 1.0,
        }
    }
}

impl StandardScaler {
    /// Fits mean and population standard deviation. A constant (or empty)
    /// column keeps a scale of 1.
    pub fn fit(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();
        Self {
            mean,
            scale: if std > f64::EPSILON { std } else { 1.0 },
        }
    }

    pub fn transform(&self, value: f64) -> f64 {
        (value - self.mean) / self.scale
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

/// Fitted encoders turning a movie into a dense numeric vector laid out as
/// `[genres] [companies] [year] [popularity]`.
///
/// Fitting happens once; `transform` never refits.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureEncoder {
    genres: OneHotEncoder,
    companies: Option<OneHotEncoder>,
    year: StandardScaler,
    popularity: StandardScaler,
}

impl FeatureEncoder {
    pub fn fit(movies: &[Movie], include_companies: bool) -> Self {
        let genres = OneHotEncoder::fit(movies.iter().map(|m| m.genres.as_slice()));
        let companies = include_companies
            .then(|| OneHotEncoder::fit(movies.iter().map(|m| m.production_companies.as_slice())));

        let years: Vec<f64> = movies.iter().map(|m| m.release_year as f64).collect();
        let popularity: Vec<f64> = movies.iter().map(|m| m.popularity).collect();

        Self {
            genres,
            companies,
            year: StandardScaler::fit(&years),
            popularity: StandardScaler::fit(&popularity),
        }
    }

    /// Total number of columns in an encoded vector
    pub fn width(&self) -> usize {
        self.genres.width() + self.companies.as_ref().map_or(0, OneHotEncoder::width) + 2
    }

    pub fn includes_companies(&self) -> bool {
        self.companies.is_some()
    }

    pub fn transform(&self, movie: &Movie) -> Array1<f64> {
        let mut row = vec![0.0; self.width()];
        self.write_row(movie, &mut row);
        Array1::from_vec(row)
    }

    /// Encodes every movie into one matrix, row order preserved
    pub fn transform_all(&self, movies: &[Movie]) -> RecommendResult<Array2<f64>> {
        let width = self.width();
        let mut data = vec![0.0; movies.len() * width];
        for (movie, row) in movies.iter().zip(data.chunks_mut(width)) {
            self.write_row(movie, row);
        }
        Ok(Array2::from_shape_vec((movies.len(), width), data)?)
    }

    fn write_row(&self, movie: &Movie, row: &mut [f64]) {
        let mut offset = 0;
        let genre_end = offset + self.genres.width();
        self.genres.encode_into(&movie.genres, &mut row[offset..genre_end]);
        offset = genre_end;

        if let Some(companies) = &self.companies {
            let end = offset + companies.width();
            companies.encode_into(&movie.production_companies, &mut row[offset..end]);
            offset = end;
        }

        row[offset] = self.year.transform(movie.release_year as f64);
        row[offset + 1] = self.popularity.transform(movie.popularity);
    }
}
