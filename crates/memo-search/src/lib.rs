//! Unsplash image-search client.
//!
//! One operation: given a location string, return the URL of a relevant
//! landscape photo to use as a scene background. The pick among results is
//! random; zero results is an error, never a silent fallback.

pub mod client;
pub mod error;

pub use client::{SearchClient, SearchConfig};
pub use error::{SearchError, SearchResult};
