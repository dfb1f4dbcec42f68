//! Movie search collaborator
//!
//! Looks up candidate titles while the user types and fetches details for
//! a chosen movie. Providers never fail: network errors, rate limits and
//! malformed responses are logged and degrade to an empty result.

pub mod tmdb;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use tmdb::TmdbClient;

/// A candidate movie returned by a search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: u64,
    pub title: String,
    pub release_year: Option<u16>,
}

impl SearchResult {
    /// Label shown in suggestion lists, e.g. "Heat (1995)"
    pub fn display_label(&self) -> String {
        match self.release_year {
            Some(year) => format!("{} ({})", self.title, year),
            None => self.title.clone(),
        }
    }
}

/// Full record for a single movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub genres: Vec<String>,
    pub vote_average: Option<f64>,
}

/// Trait for movie search backends
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieSearchProvider: Send + Sync {
    /// Search by free text. Returns at most the provider's result limit.
    async fn search(&self, query: &str) -> Vec<SearchResult>;

    /// Fetch one movie, `None` if it does not exist or the lookup failed
    async fn details(&self, movie_id: u64) -> Option<MovieDetails>;
}

/// Search suggestions for partially typed input.
///
/// Queries shorter than `min_query_length` characters (after trimming)
/// return nothing without contacting the provider.
pub async fn suggestions(
    provider: &dyn MovieSearchProvider,
    query: &str,
    min_query_length: usize,
) -> Vec<SearchResult> {
    let query = query.trim();
    if query.chars().count() < min_query_length {
        debug!("Query '{}' too short for suggestions", query);
        return Vec::new();
    }

    provider.search(query).await
}
