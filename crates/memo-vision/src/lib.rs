//! HTTP client for the vision sidecar.
//!
//! The sidecar hosts the two capabilities that have no idiomatic in-process
//! Rust equivalent: face detection (bounding boxes over a decoded bitmap)
//! and annotations-template rendering (HTML to PNG in a headless browser).
//! This crate only speaks the sidecar's HTTP contract; cropping the detected
//! boxes happens in `memo-media`.

pub mod client;
pub mod error;
mod types;

pub use client::{VisionClient, VisionConfig};
pub use error::{VisionError, VisionResult};
pub use types::DetectedFace;
