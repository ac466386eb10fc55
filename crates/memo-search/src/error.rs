//! Image-search error types.

use thiserror::Error;

/// Result type for image-search operations.
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during image search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("UNSPLASH_ACCESS_KEY not configured")]
    MissingAccessKey,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Search request failed: {0}")]
    RequestFailed(String),

    #[error("No results for query: {0}")]
    NoResults(String),
}
