//! Vision sidecar HTTP client.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{VisionError, VisionResult};
use crate::types::{DetectRequest, DetectResponse, DetectedFace, HealthResponse, RenderRequest, RenderResponse};

/// Configuration for the vision client.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Base URL of the vision sidecar
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Max retries for retryable failures
    pub max_retries: u32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8100".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
        }
    }
}

impl VisionConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("VISION_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8100".to_string()),
            timeout: Duration::from_secs(
                std::env::var("VISION_SERVICE_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            max_retries: std::env::var("VISION_SERVICE_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        }
    }
}

/// Client for the vision sidecar.
pub struct VisionClient {
    http: Client,
    config: VisionConfig,
}

impl VisionClient {
    /// Create a new vision client.
    pub fn new(config: VisionConfig) -> VisionResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(VisionError::Network)?;
        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> VisionResult<Self> {
        Self::new(VisionConfig::from_env())
    }

    /// Check if the sidecar is healthy.
    pub async fn health_check(&self) -> VisionResult<bool> {
        let url = format!("{}/health", self.config.base_url);
        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = response
                    .json()
                    .await
                    .map_err(|e| VisionError::MalformedResponse(e.to_string()))?;
                Ok(health.status == "healthy" || health.status == "ok")
            }
            Ok(response) => {
                warn!("Vision sidecar health check failed: {}", response.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Vision sidecar health check error: {}", e);
                Ok(false)
            }
        }
    }

    /// Detect face bounding boxes in a base64 image.
    pub async fn detect_faces(&self, image_base64: &str) -> VisionResult<Vec<DetectedFace>> {
        let response: DetectResponse = self
            .post_json("/faces/detect", &DetectRequest { image: image_base64 })
            .await?;
        debug!(faces = response.faces.len(), "Detected faces");
        Ok(response.faces)
    }

    /// Render the annotations template to a base64 PNG.
    pub async fn render_annotations(
        &self,
        annotations: &serde_json::Value,
    ) -> VisionResult<String> {
        let response: RenderResponse = self
            .post_json("/render/annotations", &RenderRequest { annotations })
            .await?;
        Ok(response.image)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> VisionResult<T> {
        let url = format!("{}{}", self.config.base_url, endpoint);

        let response = self
            .with_retry(|| async {
                self.http
                    .post(&url)
                    .json(body)
                    .send()
                    .await
                    .map_err(VisionError::Network)
            })
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VisionError::RequestFailed(format!(
                "sidecar returned {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| VisionError::MalformedResponse(e.to_string()))
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> VisionResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = VisionResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "Vision request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error
            .unwrap_or_else(|| VisionError::RequestFailed("Unknown error".to_string())))
    }
}
