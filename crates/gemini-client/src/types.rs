//! Request and response types for the `generateContent` API.

use serde::{Deserialize, Serialize};

/// A single text part of a content block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

/// Content block made of parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a user content block with one text part
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// Sampling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_k: u32,
    pub top_p: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 512,
            top_k: 40,
            top_p: 0.95,
        }
    }
}

/// Harm categories accepted by `safetySettings`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmCategory {
    HarmCategoryHarassment,
    HarmCategoryHateSpeech,
    HarmCategorySexuallyExplicit,
    HarmCategoryDangerousContent,
}

impl HarmCategory {
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::HarmCategoryHarassment,
        HarmCategory::HarmCategoryHateSpeech,
        HarmCategory::HarmCategorySexuallyExplicit,
        HarmCategory::HarmCategoryDangerousContent,
    ];
}

/// Blocking thresholds accepted by `safetySettings`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
    BlockOnlyHigh,
    #[default]
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

impl std::str::FromStr for HarmBlockThreshold {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BLOCK_NONE" | "NONE" => Ok(HarmBlockThreshold::BlockNone),
            "BLOCK_ONLY_HIGH" | "HIGH" => Ok(HarmBlockThreshold::BlockOnlyHigh),
            "BLOCK_MEDIUM_AND_ABOVE" | "MEDIUM" => Ok(HarmBlockThreshold::BlockMediumAndAbove),
            "BLOCK_LOW_AND_ABOVE" | "LOW" => Ok(HarmBlockThreshold::BlockLowAndAbove),
            other => Err(format!("Unknown safety threshold: {}", other)),
        }
    }
}

/// One safety setting entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

impl SafetySetting {
    /// Apply the same threshold to every harm category
    pub fn uniform(threshold: HarmBlockThreshold) -> Vec<SafetySetting> {
        HarmCategory::ALL
            .iter()
            .map(|category| SafetySetting {
                category: *category,
                threshold,
            })
            .collect()
    }
}

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
    pub safety_settings: Vec<SafetySetting>,
}

impl GenerateContentRequest {
    /// Single-prompt request with default safety settings
    pub fn from_prompt(prompt: impl Into<String>, generation_config: GenerationConfig) -> Self {
        Self {
            contents: vec![Content::user(prompt)],
            generation_config,
            safety_settings: SafetySetting::uniform(HarmBlockThreshold::default()),
        }
    }

    /// Replace the safety settings
    pub fn with_safety(mut self, threshold: HarmBlockThreshold) -> Self {
        self.safety_settings = SafetySetting::uniform(threshold);
        self
    }
}

/// A generated candidate
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Response from `generateContent`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub model_version: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if any
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()
            .map(|p| p.text.as_str())
    }
}

/// Error envelope returned on non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateContentRequest::from_prompt("hi", GenerationConfig::default())
            .with_safety(HarmBlockThreshold::BlockNone);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 512);
        assert_eq!(json["generationConfig"]["topK"], 40);
        assert_eq!(json["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(
            json["safetySettings"][0]["category"],
            "HARM_CATEGORY_HARASSMENT"
        );
        assert_eq!(json["safetySettings"][0]["threshold"], "BLOCK_NONE");
        assert!(json["contents"][0].get("role").is_none());
    }

    #[test]
    fn test_first_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"All clear."}],"role":"model"},"finishReason":"STOP"}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.first_text(), Some("All clear."));
    }

    #[test]
    fn test_first_text_missing_content() {
        let body = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.first_text(), None);

        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.first_text(), None);
    }

    #[test]
    fn test_threshold_from_str() {
        assert_eq!(
            "block_none".parse::<HarmBlockThreshold>().unwrap(),
            HarmBlockThreshold::BlockNone
        );
        assert_eq!(
            "BLOCK_MEDIUM_AND_ABOVE".parse::<HarmBlockThreshold>().unwrap(),
            HarmBlockThreshold::BlockMediumAndAbove
        );
        assert!("sometimes".parse::<HarmBlockThreshold>().is_err());
    }
}
