//! PlayHT voice-clone TTS client.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use memo_models::PlayHtCredentials;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{VoiceError, VoiceResult};

const VOICE_ENGINE: &str = "PlayHT2.0";

#[derive(Debug, Deserialize)]
struct ClonedVoice {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct TtsJob {
    #[serde(default)]
    id: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    output: Option<TtsOutput>,
}

#[derive(Debug, Deserialize)]
struct TtsOutput {
    url: String,
}

/// PlayHT REST client. Credentials are per-request, so the client itself
/// only carries connection settings and the voice naming convention.
pub struct PlayHtClient {
    http: Client,
    base_url: String,
    voice_name: String,
    poll_interval: Duration,
    poll_max_attempts: u32,
}

impl PlayHtClient {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        voice_name: impl Into<String>,
        poll_interval: Duration,
        poll_max_attempts: u32,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            voice_name: voice_name.into(),
            poll_interval,
            poll_max_attempts,
        }
    }

    /// Synthesize narration with the user's cloned voice, cloning it first
    /// if this is the user's first request.
    pub async fn synthesize(&self, text: &str, cred: &PlayHtCredentials) -> VoiceResult<String> {
        let voice_id = match self.find_cloned_voice(cred).await? {
            Some(id) => id,
            None => {
                info!(voice = %self.voice_name, "No cloned voice found, cloning");
                self.clone_voice(cred).await?
            }
        };

        self.generate(text, &voice_id, cred).await
    }

    /// Look up the user's cloned voice by the fixed voice name.
    async fn find_cloned_voice(&self, cred: &PlayHtCredentials) -> VoiceResult<Option<String>> {
        let url = format!("{}/api/v2/cloned-voices", self.base_url);
        let response = self
            .http
            .get(&url)
            .header("AUTHORIZATION", &cred.secret_key)
            .header("X-USER-ID", &cred.user_id)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::RequestFailed(format!(
                "cloned-voices list returned {}: {}",
                status, body
            )));
        }

        let voices: Vec<ClonedVoice> = response
            .json()
            .await
            .map_err(|e| VoiceError::RequestFailed(format!("unreadable voice list: {e}")))?;

        Ok(voices
            .into_iter()
            .find(|v| v.name == self.voice_name)
            .map(|v| v.id))
    }

    /// Create an instant voice clone from the request's sample audio.
    async fn clone_voice(&self, cred: &PlayHtCredentials) -> VoiceResult<String> {
        let sample = BASE64.decode(&cred.audio)?;

        let url = format!("{}/api/v2/cloned-voices/instant", self.base_url);
        let form = Form::new()
            .part("sample_file", Part::bytes(sample).file_name("sample.mp3"))
            .text("voice_name", self.voice_name.clone())
            .text("gender", cred.gender.to_lowercase());

        let response = self
            .http
            .post(&url)
            .header("AUTHORIZATION", &cred.secret_key)
            .header("X-USER-ID", &cred.user_id)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::CloneFailed(format!(
                "instant clone returned {}: {}",
                status, body
            )));
        }

        let voice: ClonedVoice = response
            .json()
            .await
            .map_err(|e| VoiceError::CloneFailed(format!("unreadable clone response: {e}")))?;

        info!(voice_id = %voice.id, "Cloned voice");

        Ok(voice.id)
    }

    /// Submit a synthesis job and wait for its audio URL.
    async fn generate(
        &self,
        text: &str,
        voice_id: &str,
        cred: &PlayHtCredentials,
    ) -> VoiceResult<String> {
        let url = format!("{}/api/v2/tts", self.base_url);
        let body = serde_json::json!({
            "text": text,
            "voice": voice_id,
            "voice_engine": VOICE_ENGINE,
            "output_format": "mp3",
        });

        let response = self
            .http
            .post(&url)
            .header("AUTHORIZATION", &cred.secret_key)
            .header("X-USER-ID", &cred.user_id)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::RequestFailed(format!(
                "tts submit returned {}: {}",
                status, body
            )));
        }

        let job: TtsJob = response
            .json()
            .await
            .map_err(|e| VoiceError::RequestFailed(format!("unreadable tts job: {e}")))?;

        if let Some(output) = job.output {
            return Ok(output.url);
        }

        self.poll_job(&job.id, cred).await
    }

    /// Poll a synthesis job until it completes, bounded.
    async fn poll_job(&self, job_id: &str, cred: &PlayHtCredentials) -> VoiceResult<String> {
        let url = format!("{}/api/v2/tts/{}", self.base_url, job_id);

        for attempt in 0..self.poll_max_attempts {
            let response = self
                .http
                .get(&url)
                .header("AUTHORIZATION", &cred.secret_key)
                .header("X-USER-ID", &cred.user_id)
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(VoiceError::RequestFailed(format!(
                    "tts poll returned {}: {}",
                    status, body
                )));
            }

            let job: TtsJob = response
                .json()
                .await
                .map_err(|e| VoiceError::RequestFailed(format!("unreadable tts job: {e}")))?;

            if let Some(output) = job.output {
                return Ok(output.url);
            }
            if job.status.as_deref() == Some("failed") {
                return Err(VoiceError::NoAudioUrl);
            }

            debug!(job_id, attempt, "TTS job still running");
            tokio::time::sleep(self.poll_interval).await;
        }

        Err(VoiceError::JobTimeout(self.poll_max_attempts))
    }
}
