//! Settings schema definitions for Guardian configuration.
//!
//! All settings structs use `#[serde(default)]` to allow partial configuration files.
//! Missing fields are filled with sensible defaults.

use serde::{Deserialize, Serialize};

use crate::detection::DEFAULT_MAX_DETECTIONS;
use crate::engine::DEFAULT_HISTORY_LIMIT;

/// Root settings structure.
///
/// Loaded from `~/.guardian/settings.toml` with environment variable interpolation support.
/// Version field enables future migrations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardianSettings {
    /// Schema version for migrations
    pub version: u32,

    /// Remote AI configuration
    pub ai: AiSettings,

    /// Orchestrator behavior
    pub engine: EngineSettings,

    /// Detection snapshot normalization
    pub detection: DetectionSettings,

    /// Advanced/debug settings
    pub advanced: AdvancedSettings,
}

/// Remote AI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    /// Model id for `generateContent`
    pub model: String,

    /// API base URL
    pub endpoint: String,

    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_k: u32,
    pub top_p: f32,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Safety threshold applied to every harm category:
    /// "BLOCK_NONE" | "BLOCK_ONLY_HIGH" | "BLOCK_MEDIUM_AND_ABOVE" | "BLOCK_LOW_AND_ABOVE"
    pub safety_threshold: String,

    /// API key (supports $ENV_VAR syntax)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Orchestrator behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Mission mode at startup: "MEDICAL" | "DEFENSE" | "POLICING"
    pub default_mode: String,

    /// Conversation turns retained
    pub history_limit: usize,

    /// Recent turns included in remote prompts (0 = none)
    pub prompt_history_turns: usize,

    /// Seed for template phrasing; unset picks randomly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_seed: Option<u64>,
}

/// Detection snapshot normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    /// Cap on detections kept per snapshot
    pub max_detections: usize,

    /// Replaces the mode's detection sensitivity when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_override: Option<f32>,
}

/// Advanced/debug settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedSettings {
    /// Log level: "error" | "warn" | "info" | "debug" | "trace"
    pub log_level: String,
}

// =============================================================================
// Default implementations
// =============================================================================

impl Default for GuardianSettings {
    fn default() -> Self {
        Self {
            version: 1,
            ai: AiSettings::default(),
            engine: EngineSettings::default(),
            detection: DetectionSettings::default(),
            advanced: AdvancedSettings::default(),
        }
    }
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            model: gemini_client::models::GEMINI_1_5_FLASH.to_string(),
            endpoint: gemini_client::DEFAULT_ENDPOINT.to_string(),
            temperature: 0.7,
            max_output_tokens: 512,
            top_k: 40,
            top_p: 0.95,
            timeout_secs: 15,
            safety_threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
            api_key: None,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_mode: "POLICING".to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            prompt_history_turns: 0,
            template_seed: None,
        }
    }
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            max_detections: DEFAULT_MAX_DETECTIONS,
            threshold_override: None,
        }
    }
}

impl Default for AdvancedSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
