use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

use super::stop_words::is_stop_word;
use crate::models::Movie;

lazy_static! {
    static ref PUNCTUATION: Regex = Regex::new(r"[^\w\s]").expect("valid punctuation regex");
    static ref TOKEN: Regex = Regex::new(r"\b\w\w+\b").expect("valid token regex");
}

/// Builds the text describing a movie: genres, then title, then overview.
///
/// Punctuation is removed so that "Bug's" and "Bugs" produce the same token.
pub fn combined_document(movie: &Movie) -> String {
    let raw = format!(
        "{} {} {}",
        movie.genres.join(" "),
        movie.title,
        movie.overview
    );
    PUNCTUATION.replace_all(&raw, "").into_owned()
}

/// Lowercases and splits a document into tokens of two or more word
/// characters, dropping stop words
pub fn tokenize(document: &str) -> Vec<String> {
    let lowered = document.to_lowercase();
    TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

/// One L2-normalized TF-IDF row, entries sorted by column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseRow {
    entries: Vec<(usize, f64)>,
}

impl SparseRow {
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product of two rows; both are sorted so this is a linear merge
    pub fn dot(&self, other: &SparseRow) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ci, vi) = self.entries[i];
            let (cj, vj) = other.entries[j];
            match ci.cmp(&cj) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += vi * vj;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Sparse document-term matrix produced by [`TfidfVectorizer::fit_transform`]
#[derive(Debug, Clone, Default)]
pub struct TfidfMatrix {
    pub vocabulary: Vec<String>,
    pub idf: Vec<f64>,
    pub rows: Vec<SparseRow>,
}

impl TfidfMatrix {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.vocabulary.len()
    }
}

/// TF-IDF vectorizer with smoothed idf and L2-normalized rows.
///
/// The vocabulary is fitted on exactly the documents passed to
/// `fit_transform`; nothing is carried between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfidfVectorizer;

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self
    }

    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> TfidfMatrix {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();

        // Sorted vocabulary keeps column order independent of document order
        let vocabulary: Vec<String> = tokenized
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let column_of: BTreeMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(col, term)| (term.as_str(), col))
            .collect();

        let counts: Vec<BTreeMap<usize, f64>> = tokenized
            .iter()
            .map(|tokens| {
                let mut counts = BTreeMap::new();
                for token in tokens {
                    *counts.entry(column_of[token.as_str()]).or_insert(0.0) += 1.0;
                }
                counts
            })
            .collect();

        let mut doc_freq = vec![0usize; vocabulary.len()];
        for doc in &counts {
            for col in doc.keys() {
                doc_freq[*col] += 1;
            }
        }

        let n = documents.len() as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let rows = counts
            .into_iter()
            .map(|doc| {
                let mut entries: Vec<(usize, f64)> =
                    doc.into_iter().map(|(col, tf)| (col, tf * idf[col])).collect();
                let norm = entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for (_, v) in entries.iter_mut() {
                        *v /= norm;
                    }
                }
                SparseRow { entries }
            })
            .collect();

        TfidfMatrix {
            vocabulary,
            idf,
            rows,
        }
    }
}
