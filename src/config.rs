use serde::Deserialize;

use crate::recommender::{BackendKind, RecommenderOptions};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the movie catalog CSV export
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Keep only the first N catalog rows
    #[serde(default)]
    pub catalog_limit: Option<usize>,

    /// Recommendation strategy (`similarity_matrix` or `neighbor_index`)
    #[serde(default = "default_backend")]
    pub recommender_backend: BackendKind,

    /// Include production companies in neighbor-index features
    #[serde(default)]
    pub include_companies: bool,

    /// Number of recommendations when the request does not specify one
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Upper bound accepted for `top_n`
    #[serde(default = "default_max_top_n")]
    pub max_top_n: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_path() -> String {
    "data/movies.csv".to_string()
}

fn default_backend() -> BackendKind {
    BackendKind::SimilarityMatrix
}

fn default_top_n() -> usize {
    5
}

fn default_max_top_n() -> usize {
    50
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            catalog_limit: None,
            recommender_backend: default_backend(),
            include_companies: false,
            default_top_n: default_top_n(),
            max_top_n: default_max_top_n(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Build options for the recommender
    pub fn recommender_options(&self) -> RecommenderOptions {
        RecommenderOptions {
            backend: self.recommender_backend,
            include_companies: self.include_companies,
            default_top_n: self.default_top_n,
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.default_top_n == 0 || self.default_top_n > self.max_top_n {
            anyhow::bail!(
                "DEFAULT_TOP_N must be between 1 and MAX_TOP_N ({}), got {}",
                self.max_top_n,
                self.default_top_n
            );
        }
        Ok(())
    }
}
