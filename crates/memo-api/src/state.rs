//! Application state.

use std::sync::Arc;

use memo_genai::GenAiClient;
use memo_pipeline::ScriptPipeline;
use memo_search::SearchClient;
use memo_vision::VisionClient;
use memo_voice::VoiceClient;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub vision: Arc<VisionClient>,
    pub pipeline: Arc<ScriptPipeline>,
}

impl AppState {
    /// Create application state with clients configured from the environment.
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let genai = GenAiClient::from_env()?;
        let search = SearchClient::from_env()?;
        let voice = VoiceClient::from_env()?;
        let vision = VisionClient::from_env()?;
        Ok(Self::with_clients(config, genai, search, voice, vision))
    }

    /// Create application state from explicit clients.
    pub fn with_clients(
        config: ApiConfig,
        genai: GenAiClient,
        search: SearchClient,
        voice: VoiceClient,
        vision: VisionClient,
    ) -> Self {
        let max_concurrency = std::env::var("PIPELINE_MAX_CONCURRENCY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(memo_pipeline::DEFAULT_MAX_CONCURRENCY);

        let vision = Arc::new(vision);
        let pipeline = ScriptPipeline::new(
            Arc::new(genai),
            Arc::new(search),
            Arc::new(voice),
            Arc::clone(&vision) as _,
        )
        .with_max_concurrency(max_concurrency);

        Self {
            config,
            vision,
            pipeline: Arc::new(pipeline),
        }
    }

    /// State with dummy provider credentials, for router tests that never
    /// reach a live service.
    #[cfg(test)]
    pub fn for_tests(config: ApiConfig) -> Self {
        use memo_genai::GenAiConfig;
        use memo_search::SearchConfig;
        use memo_vision::VisionConfig;
        use memo_voice::VoiceConfig;

        let genai = GenAiClient::new(GenAiConfig {
            api_key: "test-key".to_string(),
            ..GenAiConfig::default()
        })
        .expect("genai client");
        let search = SearchClient::new(SearchConfig {
            access_key: "test-key".to_string(),
            ..SearchConfig::default()
        })
        .expect("search client");
        let voice = VoiceClient::new(VoiceConfig::default()).expect("voice client");
        let vision = VisionClient::new(VisionConfig::default()).expect("vision client");
        Self::with_clients(config, genai, search, voice, vision)
    }
}
