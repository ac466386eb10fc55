//! TTS client facade with the primary-to-fallback switch.

use std::time::Duration;

use memo_models::PlayHtCredentials;
use reqwest::Client;
use tracing::warn;

use crate::error::VoiceResult;
use crate::fallback::FallbackTts;
use crate::playht::PlayHtClient;

/// TTS configuration.
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    pub playht_base_url: String,
    pub fallback_tts_base_url: String,
    pub file_host_base_url: String,
    /// Name under which the user's clone is created and looked up
    pub voice_name: String,
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub poll_max_attempts: u32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            playht_base_url: "https://api.play.ht".to_string(),
            fallback_tts_base_url: "https://translate.google.com".to_string(),
            file_host_base_url: "https://tmpfiles.org".to_string(),
            voice_name: "MemoMosaic".to_string(),
            timeout: Duration::from_secs(120),
            poll_interval: Duration::from_secs(2),
            poll_max_attempts: 30,
        }
    }
}

impl VoiceConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            playht_base_url: std::env::var("PLAYHT_BASE_URL").unwrap_or(defaults.playht_base_url),
            fallback_tts_base_url: std::env::var("FALLBACK_TTS_BASE_URL")
                .unwrap_or(defaults.fallback_tts_base_url),
            file_host_base_url: std::env::var("FILE_HOST_BASE_URL")
                .unwrap_or(defaults.file_host_base_url),
            voice_name: std::env::var("VOICE_NAME").unwrap_or(defaults.voice_name),
            timeout: defaults.timeout,
            poll_interval: defaults.poll_interval,
            poll_max_attempts: defaults.poll_max_attempts,
        }
    }
}

/// Narration synthesizer: PlayHT clone first, Google TTS on failure.
pub struct VoiceClient {
    playht: PlayHtClient,
    fallback: FallbackTts,
}

impl VoiceClient {
    /// Create a new voice client.
    pub fn new(config: VoiceConfig) -> VoiceResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            playht: PlayHtClient::new(
                http.clone(),
                config.playht_base_url,
                config.voice_name,
                config.poll_interval,
                config.poll_max_attempts,
            ),
            fallback: FallbackTts::new(
                http,
                config.fallback_tts_base_url,
                config.file_host_base_url,
            ),
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> VoiceResult<Self> {
        Self::new(VoiceConfig::from_env())
    }

    /// Synthesize narration audio and return its URL.
    pub async fn synthesize(&self, text: &str, cred: &PlayHtCredentials) -> VoiceResult<String> {
        match self.playht.synthesize(text, cred).await {
            Ok(url) => Ok(url),
            Err(primary) => {
                warn!(error = %primary, "PlayHT synthesis failed, trying fallback TTS");
                self.fallback.synthesize(text).await
            }
        }
    }
}
