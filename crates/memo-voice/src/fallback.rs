//! Google Translate TTS fallback and the temporary public file host.
//!
//! The fallback provider returns raw MP3 bytes, which scene consumers cannot
//! use directly; the bytes are published through tmpfiles.org and the
//! returned page URL is rewritten to its direct-download form.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::{VoiceError, VoiceResult};

/// Google Translate TTS caps the query text length.
const MAX_TTS_CHARS: usize = 200;

/// Stateless TTS fallback client.
pub struct FallbackTts {
    http: Client,
    tts_base_url: String,
    host_base_url: String,
}

#[derive(Debug, Deserialize)]
struct HostUploadResponse {
    data: HostUploadData,
}

#[derive(Debug, Deserialize)]
struct HostUploadData {
    url: String,
}

impl FallbackTts {
    pub fn new(
        http: Client,
        tts_base_url: impl Into<String>,
        host_base_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            tts_base_url: tts_base_url.into(),
            host_base_url: host_base_url.into(),
        }
    }

    /// Synthesize narration and return a publicly fetchable audio URL.
    pub async fn synthesize(&self, text: &str) -> VoiceResult<String> {
        let audio = self.fetch_audio(text).await?;
        let hosted = self.publish(audio, "audio.mp3").await?;
        debug!(url = %hosted, "Published fallback narration");
        Ok(hosted)
    }

    /// Fetch raw MP3 bytes from the translate TTS endpoint.
    async fn fetch_audio(&self, text: &str) -> VoiceResult<Vec<u8>> {
        let mut text = text;
        if text.len() > MAX_TTS_CHARS {
            let mut end = MAX_TTS_CHARS;
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            text = &text[..end];
        }

        let url = format!("{}/translate_tts", self.tts_base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", "en"),
                ("q", text),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(VoiceError::RequestFailed(format!(
                "translate tts returned {}",
                status
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Upload bytes to the temporary file host and return the direct
    /// download URL.
    async fn publish(&self, bytes: Vec<u8>, filename: &str) -> VoiceResult<String> {
        let url = format!("{}/api/v1/upload", self.host_base_url);
        let form = Form::new().part("file", Part::bytes(bytes).file_name(filename.to_string()));

        let response = self.http.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::HostUploadFailed(format!(
                "file host returned {}: {}",
                status, body
            )));
        }

        let uploaded: HostUploadResponse = response
            .json()
            .await
            .map_err(|e| VoiceError::HostUploadFailed(format!("unreadable host response: {e}")))?;

        direct_download_url(&uploaded.data.url)
    }
}

/// Rewrite a tmpfiles page URL (`https://host/123/f.mp3`) into its direct
/// download form (`https://host/dl/123/f.mp3`).
pub fn direct_download_url(page_url: &str) -> VoiceResult<String> {
    let parsed = Url::parse(page_url)?;
    let host = parsed
        .host_str()
        .ok_or_else(|| VoiceError::HostUploadFailed(format!("URL without host: {page_url}")))?;
    Ok(format!(
        "{}://{}/dl{}",
        parsed.scheme(),
        host,
        parsed.path()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_direct_download_url() {
        assert_eq!(
            direct_download_url("https://tmpfiles.org/123456/audio.mp3").unwrap(),
            "https://tmpfiles.org/dl/123456/audio.mp3"
        );
    }

    #[test]
    fn test_direct_download_url_rejects_garbage() {
        assert!(direct_download_url("not a url").is_err());
    }

    #[tokio::test]
    async fn test_synthesize_publishes_audio() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .and(query_param("client", "tw-ob"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp3-bytes".to_vec()))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "url": format!("{}/987/audio.mp3", server.uri()) }
            })))
            .mount(&server)
            .await;

        let fallback = FallbackTts::new(Client::new(), server.uri(), server.uri());
        let url = fallback.synthesize("We watched the sunset.").await.unwrap();
        assert!(url.contains("/dl/987/audio.mp3"));
    }

    #[tokio::test]
    async fn test_long_text_is_truncated_not_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp3".to_vec()))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "url": format!("{}/1/audio.mp3", server.uri()) }
            })))
            .mount(&server)
            .await;

        let fallback = FallbackTts::new(Client::new(), server.uri(), server.uri());
        let long_text = "a".repeat(500);
        assert!(fallback.synthesize(&long_text).await.is_ok());
    }
}
