//! Gemini file-hosting flow.
//!
//! Videos are too large to inline, so they are uploaded to the model's file
//! store and referenced by URI once the store reports them ACTIVE. The
//! readiness poll uses a fixed interval and a bounded attempt count; a stuck
//! file surfaces as a distinct processing-timeout error instead of hanging
//! the request.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{GenAiError, GenAiResult};

/// A file hosted in the model's file store.
#[derive(Debug, Clone)]
pub struct HostedFile {
    /// Store-assigned resource name (`files/...`)
    pub name: String,
    /// URI usable in a `fileData` prompt part
    pub uri: String,
    /// Last observed state (PROCESSING / ACTIVE / FAILED)
    pub state: String,
}

#[derive(Debug, Deserialize)]
struct FileResource {
    name: String,
    #[serde(default)]
    uri: String,
    #[serde(default)]
    state: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: FileResource,
}

/// Client for the model's file store.
#[derive(Debug, Clone)]
pub struct FileManager {
    http: Client,
    base_url: String,
    api_key: String,
    poll_interval: Duration,
    poll_max_attempts: u32,
}

impl FileManager {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        poll_interval: Duration,
        poll_max_attempts: u32,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            poll_interval,
            poll_max_attempts,
        }
    }

    /// Upload raw bytes and return the hosted file handle.
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        mime_type: &str,
        display_name: &str,
    ) -> GenAiResult<HostedFile> {
        let url = format!(
            "{}/upload/v1beta/files?key={}",
            self.base_url, self.api_key
        );

        let metadata = serde_json::json!({ "file": { "display_name": display_name } });
        let form = Form::new()
            .part(
                "metadata",
                Part::text(metadata.to_string()).mime_str("application/json")?,
            )
            .part(
                "file",
                Part::bytes(bytes)
                    .file_name(display_name.to_string())
                    .mime_str(mime_type)?,
            );

        let response = self.http.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenAiError::UploadFailed(format!(
                "file store returned {}: {}",
                status, body
            )));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| GenAiError::UploadFailed(format!("unreadable upload response: {e}")))?;

        info!(name = %uploaded.file.name, display_name, "Uploaded file");

        Ok(HostedFile {
            name: uploaded.file.name,
            uri: uploaded.file.uri,
            state: uploaded.file.state,
        })
    }

    /// Fetch the current state of a hosted file.
    async fn get(&self, name: &str) -> GenAiResult<HostedFile> {
        let url = format!("{}/v1beta/{}?key={}", self.base_url, name, self.api_key);
        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenAiError::RequestFailed(format!(
                "file store returned {}: {}",
                status, body
            )));
        }

        let file: FileResource = response
            .json()
            .await
            .map_err(|e| GenAiError::MalformedResponse(format!("file resource: {e}")))?;

        Ok(HostedFile {
            name: file.name,
            uri: file.uri,
            state: file.state,
        })
    }

    /// Poll until the file leaves PROCESSING, bounded by the configured
    /// attempt count.
    pub async fn wait_until_active(&self, file: &HostedFile) -> GenAiResult<HostedFile> {
        if file.state == "ACTIVE" {
            return Ok(file.clone());
        }

        for attempt in 0..self.poll_max_attempts {
            let current = self.get(&file.name).await?;
            match current.state.as_str() {
                "ACTIVE" => return Ok(current),
                "PROCESSING" => {
                    debug!(name = %current.name, attempt, "File still processing");
                    tokio::time::sleep(self.poll_interval).await;
                }
                other => {
                    return Err(GenAiError::FileFailed {
                        name: current.name,
                        state: other.to_string(),
                    })
                }
            }
        }

        Err(GenAiError::ProcessingTimeout {
            name: file.name.clone(),
            waited_secs: self.poll_interval.as_secs() * self.poll_max_attempts as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn manager(base_url: &str, attempts: u32) -> FileManager {
        FileManager::new(
            Client::new(),
            base_url,
            "test-key",
            Duration::from_millis(5),
            attempts,
        )
    }

    #[tokio::test]
    async fn test_upload_returns_handle() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload/v1beta/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "file": { "name": "files/abc", "uri": "https://files/abc", "state": "PROCESSING" }
            })))
            .mount(&server)
            .await;

        let file = manager(&server.uri(), 3)
            .upload(vec![1, 2, 3], "video/mp4", "clip.mp4")
            .await
            .unwrap();
        assert_eq!(file.name, "files/abc");
        assert_eq!(file.state, "PROCESSING");
    }

    #[tokio::test]
    async fn test_wait_until_active_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1beta/files/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "files/abc", "uri": "https://files/abc", "state": "ACTIVE"
            })))
            .mount(&server)
            .await;

        let pending = HostedFile {
            name: "files/abc".into(),
            uri: "https://files/abc".into(),
            state: "PROCESSING".into(),
        };
        let active = manager(&server.uri(), 3).wait_until_active(&pending).await.unwrap();
        assert_eq!(active.state, "ACTIVE");
    }

    #[tokio::test]
    async fn test_wait_until_active_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1beta/files/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "files/abc", "uri": "https://files/abc", "state": "PROCESSING"
            })))
            .mount(&server)
            .await;

        let pending = HostedFile {
            name: "files/abc".into(),
            uri: "https://files/abc".into(),
            state: "PROCESSING".into(),
        };
        let err = manager(&server.uri(), 2).wait_until_active(&pending).await.unwrap_err();
        assert!(matches!(err, GenAiError::ProcessingTimeout { .. }));
    }

    #[tokio::test]
    async fn test_failed_file_surfaces_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1beta/files/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "files/abc", "uri": "", "state": "FAILED"
            })))
            .mount(&server)
            .await;

        let pending = HostedFile {
            name: "files/abc".into(),
            uri: String::new(),
            state: "PROCESSING".into(),
        };
        let err = manager(&server.uri(), 3).wait_until_active(&pending).await.unwrap_err();
        assert!(matches!(err, GenAiError::FileFailed { .. }));
    }
}
