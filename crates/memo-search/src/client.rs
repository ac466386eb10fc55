//! Unsplash HTTP client.

use std::time::Duration;

use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{SearchError, SearchResult};

/// Image-search client configuration.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub access_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            access_key: String::new(),
            base_url: "https://api.unsplash.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl SearchConfig {
    /// Create config from environment variables.
    pub fn from_env() -> SearchResult<Self> {
        let access_key =
            std::env::var("UNSPLASH_ACCESS_KEY").map_err(|_| SearchError::MissingAccessKey)?;
        let defaults = Self::default();
        Ok(Self {
            access_key,
            base_url: std::env::var("UNSPLASH_BASE_URL").unwrap_or(defaults.base_url),
            timeout: defaults.timeout,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}

/// Unsplash photo-search client.
pub struct SearchClient {
    http: Client,
    config: SearchConfig,
}

impl SearchClient {
    /// Create a new search client.
    pub fn new(config: SearchConfig) -> SearchResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> SearchResult<Self> {
        Self::new(SearchConfig::from_env()?)
    }

    /// Fetch a relevant landscape photo URL for a location. Picks one of the
    /// returned results at random; zero results is an error.
    pub async fn location_banner(&self, location: &str) -> SearchResult<String> {
        let url = format!("{}/search/photos", self.config.base_url);

        let response = self
            .http
            .get(&url)
            .header(
                "Authorization",
                format!("Client-ID {}", self.config.access_key),
            )
            .query(&[
                ("query", location),
                ("orientation", "landscape"),
                ("order_by", "relevant"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::RequestFailed(format!(
                "search returned {}: {}",
                status, body
            )));
        }

        let search: SearchResponse = response.json().await?;
        if search.results.is_empty() {
            return Err(SearchError::NoResults(location.to_string()));
        }

        let index = rand::rng().random_range(0..search.results.len());
        let picked = search.results[index].urls.regular.clone();

        debug!(location, results = search.results.len(), "Picked location banner");

        Ok(picked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: &str) -> SearchClient {
        SearchClient::new(SearchConfig {
            access_key: "test-key".to_string(),
            base_url: base_url.to_string(),
            ..SearchConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_location_banner_picks_a_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .and(query_param("query", "Kyoto"))
            .and(query_param("orientation", "landscape"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    { "urls": { "regular": "https://img/1" } },
                    { "urls": { "regular": "https://img/2" } }
                ]
            })))
            .mount(&server)
            .await;

        let url = client(&server.uri()).location_banner("Kyoto").await.unwrap();
        assert!(url == "https://img/1" || url == "https://img/2");
    }

    #[tokio::test]
    async fn test_empty_results_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "results": [] })),
            )
            .mount(&server)
            .await;

        let err = client(&server.uri()).location_banner("Nowhere").await.unwrap_err();
        assert!(matches!(err, SearchError::NoResults(_)));
    }

    #[tokio::test]
    async fn test_upstream_failure_surfaces() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .respond_with(ResponseTemplate::new(403).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let err = client(&server.uri()).location_banner("Kyoto").await.unwrap_err();
        assert!(matches!(err, SearchError::RequestFailed(_)));
    }
}
