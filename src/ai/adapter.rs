//! Remote AI adapter.
//!
//! [`RemoteAi`] is the seam between the orchestrator and the network. The
//! Gemini implementation issues exactly one `generateContent` call per request
//! and maps every failure onto the three adapter error kinds.

use std::time::Duration;

use gemini_client::{
    models, Client, GenerateContentRequest, GenerationConfig, HarmBlockThreshold, DEFAULT_ENDPOINT,
};

use crate::error::{GuardianError, Result};
use crate::settings::schema::AiSettings;

/// One prompt in, one reply out.
#[async_trait::async_trait]
pub trait RemoteAi: Send + Sync {
    /// Generate a reply. A blank credential fails with `NoCredential`
    /// before any network activity.
    async fn generate(&self, credential: &str, prompt: &str) -> Result<String>;

    /// Get the backend name
    fn backend_name(&self) -> &'static str;
}

/// Connection and sampling settings for [`GeminiAdapter`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub model: String,
    pub endpoint: String,
    pub generation: GenerationConfig,
    pub safety_threshold: HarmBlockThreshold,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: models::GEMINI_1_5_FLASH.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            generation: GenerationConfig::default(),
            safety_threshold: HarmBlockThreshold::default(),
            timeout: Duration::from_secs(15),
        }
    }
}

impl GeminiConfig {
    pub fn from_settings(settings: &AiSettings) -> Result<Self> {
        let safety_threshold: HarmBlockThreshold = settings
            .safety_threshold
            .parse()
            .map_err(GuardianError::Settings)?;

        if safety_threshold == HarmBlockThreshold::BlockNone {
            tracing::warn!("ai.safety_threshold is BLOCK_NONE; remote replies are not content filtered");
        }

        Ok(Self {
            model: settings.model.clone(),
            endpoint: settings.endpoint.clone(),
            generation: GenerationConfig {
                temperature: settings.temperature,
                max_output_tokens: settings.max_output_tokens,
                top_k: settings.top_k,
                top_p: settings.top_p,
            },
            safety_threshold,
            timeout: Duration::from_secs(settings.timeout_secs),
        })
    }
}

/// Gemini `generateContent` backend.
#[derive(Debug)]
pub struct GeminiAdapter {
    client: Client,
    config: GeminiConfig,
}

impl GeminiAdapter {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .endpoint(config.endpoint.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| GuardianError::Settings(format!("Invalid AI endpoint: {}", e)))?;

        tracing::debug!(model = %config.model, endpoint = %client.base_url(), "Gemini adapter ready");
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait::async_trait]
impl RemoteAi for GeminiAdapter {
    async fn generate(&self, credential: &str, prompt: &str) -> Result<String> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(GuardianError::NoCredential);
        }

        let request = GenerateContentRequest::from_prompt(prompt, self.config.generation.clone())
            .with_safety(self.config.safety_threshold);

        let response = self
            .client
            .generate_content(&self.config.model, credential, &request)
            .await?;

        let text = response.first_text().ok_or_else(|| {
            GuardianError::MalformedResponse("response has no candidate text".to_string())
        })?;

        let cleaned = clean_reply(text);
        if cleaned.is_empty() {
            return Err(GuardianError::MalformedResponse(
                "candidate text is empty".to_string(),
            ));
        }
        Ok(cleaned)
    }

    fn backend_name(&self) -> &'static str {
        "gemini"
    }
}

/// Strip markdown emphasis markers (`*`, `__`) and surrounding whitespace.
pub fn clean_reply(text: &str) -> String {
    text.replace('*', "").replace("__", "").trim().to_string()
}
