//! Main application configuration
//!
//! This module defines the primary configuration structures for the movie
//! ranker, including TOML file loading, environment variable overrides and
//! validation.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::RatingConfig;
use crate::matching::SelectorConfig;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub storage: StorageSettings,
    pub search: SearchSettings,
    pub rating: RatingConfig,
    pub matching: SelectorConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// JSON file holding the ranked collection
    pub data_file: PathBuf,
}

/// Movie search provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Base URL of the TMDB v3 API
    pub base_url: String,
    /// TMDB API key; searches return nothing without one
    pub api_key: Option<String>,
    /// Response language requested from the API
    pub language: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Maximum number of search results returned
    pub max_results: usize,
    /// Shortest query that triggers a search
    pub min_query_length: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "movie-ranker".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("movies.json"),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_key: None,
            language: "en-US".to_string(),
            timeout_seconds: 5,
            max_results: 5,
            min_query_length: 2,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Storage settings
        if let Ok(data_file) = env::var("DATA_FILE") {
            self.storage.data_file = PathBuf::from(data_file);
        }

        // Search settings
        if let Ok(api_key) = env::var("TMDB_API_KEY") {
            self.search.api_key = Some(api_key).filter(|key| !key.is_empty());
        }
        if let Ok(base_url) = env::var("TMDB_BASE_URL") {
            self.search.base_url = base_url;
        }
        if let Ok(timeout) = env::var("SEARCH_TIMEOUT_SECONDS") {
            self.search.timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid SEARCH_TIMEOUT_SECONDS value: {}", timeout))?;
        }
        if let Ok(max_results) = env::var("SEARCH_MAX_RESULTS") {
            self.search.max_results = max_results
                .parse()
                .map_err(|_| anyhow!("Invalid SEARCH_MAX_RESULTS value: {}", max_results))?;
        }

        // Matching settings
        if let Ok(rating_diff) = env::var("MAX_RATING_DIFFERENCE") {
            self.matching.max_rating_difference = Some(
                rating_diff
                    .parse()
                    .map_err(|_| anyhow!("Invalid MAX_RATING_DIFFERENCE value: {}", rating_diff))?,
            );
        }

        Ok(())
    }

    /// Get search request timeout as Duration
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search.timeout_seconds)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate storage settings
    if config.storage.data_file.as_os_str().is_empty() {
        return Err(anyhow!("Data file path cannot be empty"));
    }

    // Validate search settings
    if config.search.base_url.is_empty() {
        return Err(anyhow!("Search base URL cannot be empty"));
    }
    if config.search.timeout_seconds == 0 {
        return Err(anyhow!("Search timeout must be greater than 0"));
    }
    if config.search.max_results == 0 {
        return Err(anyhow!("Search max results must be greater than 0"));
    }

    // Validate matching settings
    if let Some(max_diff) = config.matching.max_rating_difference {
        if !max_diff.is_finite() || max_diff <= 0.0 {
            return Err(anyhow!("Max rating difference must be a positive number"));
        }
    }

    config.rating.validate()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.storage.data_file, PathBuf::from("movies.json"));
        assert_eq!(config.search.max_results, 5);
        assert_eq!(config.search_timeout(), Duration::from_secs(5));
        assert!(config.matching.max_rating_difference.is_none());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = AppConfig::default();
        config.service.log_level = "loud".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_search_settings() {
        let mut config = AppConfig::default();
        config.search.timeout_seconds = 0;
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.search.max_results = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_rating_difference() {
        let mut config = AppConfig::default();
        config.matching.max_rating_difference = Some(-10.0);
        assert!(validate_config(&config).is_err());

        config.matching.max_rating_difference = Some(f64::NAN);
        assert!(validate_config(&config).is_err());

        config.matching.max_rating_difference = Some(f64::INFINITY);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml = r#"
            [storage]
            data_file = "/tmp/ranked.json"

            [rating]
            stable_k = 10
        "#;

        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.storage.data_file, PathBuf::from("/tmp/ranked.json"));
        assert_eq!(config.rating.stable_k, 10);
        assert_eq!(config.rating.provisional_k, 64);
        assert_eq!(config.service.log_level, "info");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranker.toml");
        std::fs::write(
            &path,
            "[search]\nmax_results = 3\n\n[matching]\nmax_rating_difference = 250.0\n",
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.search.max_results, 3);
        assert_eq!(config.matching.max_rating_difference, Some(250.0));
    }

    #[test]
    fn test_from_missing_file() {
        assert!(AppConfig::from_file(Path::new("/nonexistent/ranker.toml")).is_err());
    }
}
