//! TMDB (The Movie Database) search client

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::SearchSettings;
use crate::search::{MovieDetails, MovieSearchProvider, SearchResult};

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    #[serde(default)]
    results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovie {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieDetails {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    runtime: Option<u32>,
    #[serde(default)]
    genres: Vec<TmdbGenre>,
    #[serde(default)]
    vote_average: Option<f64>,
}

/// Year from a TMDB date such as "1995-12-15"; empty dates have none
fn release_year(date: Option<&str>) -> Option<u16> {
    date.and_then(|d| d.get(..4)).and_then(|year| year.parse().ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a `/search/movie` response body, keeping at most `limit` results
pub fn parse_search_response(body: &str, limit: usize) -> Result<Vec<SearchResult>> {
    let response: TmdbSearchResponse = serde_json::from_str(body)?;

    Ok(response
        .results
        .into_iter()
        .take(limit)
        .map(|movie| SearchResult {
            id: movie.id,
            release_year: release_year(movie.release_date.as_deref()),
            title: non_empty(movie.title).unwrap_or_else(|| "Unknown Title".to_string()),
        })
        .collect())
}

/// Parse a `/movie/{id}` response body
pub fn parse_details_response(body: &str) -> Result<MovieDetails> {
    let details: TmdbMovieDetails = serde_json::from_str(body)?;

    Ok(MovieDetails {
        id: details.id,
        title: non_empty(details.title).unwrap_or_else(|| "Unknown Title".to_string()),
        overview: non_empty(details.overview),
        release_date: non_empty(details.release_date),
        runtime_minutes: details.runtime.filter(|&minutes| minutes > 0),
        genres: details.genres.into_iter().map(|g| g.name).collect(),
        vote_average: details.vote_average,
    })
}

/// TMDB API client
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    language: String,
    max_results: usize,
}

impl TmdbClient {
    pub fn new(settings: &SearchSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            language: settings.language.clone(),
            max_results: settings.max_results,
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| anyhow!("No TMDB API key configured"))
    }

    async fn try_search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let url = format!("{}/search/movie", self.base_url);
        debug!(query = %query, url = %url, "Searching TMDB");

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key()?),
                ("query", query),
                ("language", self.language.as_str()),
                ("page", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("TMDB search returned HTTP {}", status.as_u16()));
        }

        let body = response.text().await?;
        parse_search_response(&body, self.max_results)
    }

    async fn try_details(&self, movie_id: u64) -> Result<Option<MovieDetails>> {
        let url = format!("{}/movie/{}", self.base_url, movie_id);
        debug!(movie_id, url = %url, "Fetching TMDB movie details");

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key()?),
                ("language", self.language.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(anyhow!("TMDB details returned HTTP {}", status.as_u16()));
        }

        let body = response.text().await?;
        parse_details_response(&body).map(Some)
    }
}

#[async_trait]
impl MovieSearchProvider for TmdbClient {
    async fn search(&self, query: &str) -> Vec<SearchResult> {
        match self.try_search(query).await {
            Ok(results) => results,
            Err(e) => {
                warn!("Error searching movies for '{}': {}", query, e);
                Vec::new()
            }
        }
    }

    async fn details(&self, movie_id: u64) -> Option<MovieDetails> {
        match self.try_details(movie_id).await {
            Ok(details) => details,
            Err(e) => {
                warn!("Error fetching movie details for {}: {}", movie_id, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_BODY: &str = r#"{
        "page": 1,
        "results": [
            {"id": 949, "title": "Heat", "release_date": "1995-12-15"},
            {"id": 1, "title": "Heat", "release_date": ""},
            {"id": 2, "release_date": "1986-03-14"},
            {"id": 3, "title": "Heat Wave", "release_date": "2022-01-01"},
            {"id": 4, "title": "Heatwave", "release_date": "2011-07-01"},
            {"id": 5, "title": "Heat Lightning", "release_date": "1934-03-03"}
        ],
        "total_results": 6
    }"#;

    #[test]
    fn test_parse_search_response_limits_results() {
        let results = parse_search_response(SEARCH_BODY, 5).unwrap();

        assert_eq!(results.len(), 5);
        assert_eq!(results[0].id, 949);
        assert_eq!(results[0].release_year, Some(1995));
        assert_eq!(results[1].release_year, None);
        assert_eq!(results[2].title, "Unknown Title");
        assert!(results.iter().all(|r| r.id != 5));
    }

    #[test]
    fn test_parse_search_response_without_results() {
        assert!(parse_search_response(r#"{"page": 1}"#, 5).unwrap().is_empty());
    }

    #[test]
    fn test_parse_search_response_malformed() {
        assert!(parse_search_response("<html>rate limited</html>", 5).is_err());
    }

    #[test]
    fn test_parse_details_response() {
        let body = r#"{
            "id": 949,
            "title": "Heat",
            "overview": "Obsessive master thief Neil McCauley...",
            "release_date": "1995-12-15",
            "runtime": 170,
            "genres": [{"id": 28, "name": "Action"}, {"id": 80, "name": "Crime"}],
            "vote_average": 7.9
        }"#;

        let details = parse_details_response(body).unwrap();
        assert_eq!(details.id, 949);
        assert_eq!(details.title, "Heat");
        assert_eq!(details.runtime_minutes, Some(170));
        assert_eq!(details.genres, vec!["Action", "Crime"]);
        assert_eq!(details.release_date.as_deref(), Some("1995-12-15"));
    }

    #[test]
    fn test_parse_details_empty_fields() {
        let details = parse_details_response(r#"{"id": 7, "overview": "", "runtime": 0}"#).unwrap();
        assert!(details.overview.is_none());
        assert!(details.runtime_minutes.is_none());
        assert!(details.genres.is_empty());
    }

    #[test]
    fn test_release_year() {
        assert_eq!(release_year(Some("2001-09-28")), Some(2001));
        assert_eq!(release_year(Some("")), None);
        assert_eq!(release_year(Some("n/a")), None);
        assert_eq!(release_year(None), None);
    }

    #[tokio::test]
    async fn test_missing_api_key_degrades_to_empty() {
        let client = TmdbClient::new(&SearchSettings::default()).unwrap();

        assert!(client.search("heat").await.is_empty());
        assert!(client.details(949).await.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_server_degrades_to_empty() {
        let settings = SearchSettings {
            base_url: "http://127.0.0.1:1".to_string(),
            api_key: Some("test-key".to_string()),
            timeout_seconds: 1,
            ..SearchSettings::default()
        };
        let client = TmdbClient::new(&settings).unwrap();

        assert!(client.search("heat").await.is_empty());
        assert!(client.details(949).await.is_none());
    }
}
