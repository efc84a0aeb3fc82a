use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

lazy_static! {
    static ref QUOTED_LABEL: Regex =
        Regex::new(r#"'([^']*)'|"([^"]*)""#).expect("valid quoted label regex");
}

/// A single film in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Unique identifier for the movie
    pub id: i64,
    /// Display title
    pub title: String,
    /// Genre labels, deduplicated in first-seen order
    #[serde(default, deserialize_with = "deserialize_labels")]
    pub genres: Vec<String>,
    /// Production company labels, deduplicated in first-seen order
    #[serde(default, deserialize_with = "deserialize_labels")]
    pub production_companies: Vec<String>,
    /// Synopsis, empty when the source has none
    #[serde(default, deserialize_with = "deserialize_text")]
    pub overview: String,
    pub release_year: i32,
    /// Popularity score, missing values become 0
    #[serde(default, deserialize_with = "deserialize_popularity")]
    pub popularity: f64,
}

impl Movie {
    /// Creates a movie with no companies, no overview and zero popularity
    pub fn new(id: i64, title: impl Into<String>, release_year: i32) -> Self {
        Self {
            id,
            title: title.into(),
            genres: Vec::new(),
            production_companies: Vec::new(),
            overview: String::new(),
            release_year,
            popularity: 0.0,
        }
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = dedup_labels(genres.into_iter().map(Into::into));
        self
    }

    pub fn with_companies<I, S>(mut self, companies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.production_companies = dedup_labels(companies.into_iter().map(Into::into));
        self
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = overview.into();
        self
    }

    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = sanitize_popularity(popularity);
        self
    }
}

/// Parses a label list as stored in catalog exports.
///
/// Accepts Python/JSON list literals (`['Animation', 'Comedy']`) as well as
/// plain `|` or `,` separated strings. Quoted items inside a list literal are
/// kept whole, commas included. Empty labels are dropped.
pub fn parse_label_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if let Some(inner) = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
    {
        if QUOTED_LABEL.is_match(inner) {
            return dedup_labels(
                QUOTED_LABEL
                    .captures_iter(inner)
                    .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
                    .map(|label| label.as_str().trim())
                    .filter(|label| !label.is_empty())
                    .map(str::to_string),
            );
        }
        return split_labels(inner, ',');
    }

    if trimmed.contains('|') {
        split_labels(trimmed, '|')
    } else {
        split_labels(trimmed, ',')
    }
}

fn split_labels(body: &str, separator: char) -> Vec<String> {
    dedup_labels(
        body.split(separator)
            .map(|label| label.trim().trim_matches(|c| c == '\'' || c == '"').trim())
            .filter(|label| !label.is_empty())
            .map(str::to_string),
    )
}

fn dedup_labels(labels: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for label in labels {
        if !out.contains(&label) {
            out.push(label);
        }
    }
    out
}

fn sanitize_popularity(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Label columns arrive either as a serialized string or as a real sequence
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLabels {
    Text(String),
    List(Vec<String>),
}

fn deserialize_labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawLabels> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawLabels::Text(text)) => parse_label_list(&text),
        Some(RawLabels::List(list)) => dedup_labels(list.into_iter()),
        None => Vec::new(),
    })
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default())
}

fn deserialize_popularity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<f64> = Option::deserialize(deserializer)?;
    Ok(raw.map(sanitize_popularity).unwrap_or(0.0))
}
