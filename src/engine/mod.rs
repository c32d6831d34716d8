//! Response orchestration.
//!
//! [`ResponseEngine`] is the single entry point callers use. Each query
//! captures the mission mode and credential at start, tries the remote model
//! when a credential is present, and falls back to deterministic synthesis on
//! any failure. The caller always gets a non-empty answer.

mod history;
mod integration_tests;

pub use history::{ConversationHistory, ConversationTurn, DEFAULT_HISTORY_LIMIT};

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::ai::{build_prompt, GeminiAdapter, GeminiConfig, RemoteAi, PROBE_PROMPT};
use crate::credentials::{validate_credential_format, Credential};
use crate::detection::{normalize_snapshot, Detection, RawDetection, DEFAULT_MAX_DETECTIONS};
use crate::error::{ErrorKind, Result};
use crate::intent::{classify, Intent};
use crate::mission::{profile_for, MissionMode, ModeRegistry};
use crate::settings::GuardianSettings;
use crate::synth::{synthesize, SynthesisContext};

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    Remote,
    Fallback,
}

/// A reply plus how it was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineReply {
    pub text: String,
    pub source: ResponseSource,
    pub intent: Intent,
    pub mode: MissionMode,
    /// Why the remote path was skipped or failed, for fallback replies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ErrorKind>,
}

/// Tunables for [`ResponseEngine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub initial_mode: MissionMode,
    pub history_limit: usize,
    pub prompt_history_turns: usize,
    pub max_detections: usize,
    pub threshold_override: Option<f32>,
    pub template_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_mode: MissionMode::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            prompt_history_turns: 0,
            max_detections: DEFAULT_MAX_DETECTIONS,
            threshold_override: None,
            template_seed: None,
        }
    }
}

impl EngineConfig {
    pub fn from_settings(settings: &GuardianSettings) -> Result<Self> {
        Ok(Self {
            initial_mode: settings.engine.default_mode.parse()?,
            history_limit: settings.engine.history_limit,
            prompt_history_turns: settings.engine.prompt_history_turns,
            max_detections: settings.detection.max_detections,
            threshold_override: settings.detection.threshold_override,
            template_seed: settings.engine.template_seed,
        })
    }
}

/// Mutable engine state. Credential presence is the only switch between the
/// remote path and the fallback path.
#[derive(Debug, Default)]
pub struct EngineState {
    pub credential: Option<Credential>,
    pub last_failure: Option<ErrorKind>,
    pub history: ConversationHistory,
}

pub struct ResponseEngine {
    ai: Arc<dyn RemoteAi>,
    modes: Arc<ModeRegistry>,
    state: RwLock<EngineState>,
    rng: Mutex<StdRng>,
    config: EngineConfig,
}

impl ResponseEngine {
    pub fn new(ai: Arc<dyn RemoteAi>, config: EngineConfig) -> Self {
        let rng = match config.template_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        tracing::info!(
            backend = ai.backend_name(),
            mode = %config.initial_mode,
            seeded = config.template_seed.is_some(),
            "Response engine initialized"
        );

        Self {
            ai,
            modes: Arc::new(ModeRegistry::new(config.initial_mode)),
            state: RwLock::new(EngineState {
                credential: None,
                last_failure: None,
                history: ConversationHistory::new(config.history_limit),
            }),
            rng: Mutex::new(rng),
            config,
        }
    }

    /// Build an engine backed by the Gemini adapter.
    pub fn from_settings(settings: &GuardianSettings) -> Result<Self> {
        let adapter = GeminiAdapter::new(GeminiConfig::from_settings(&settings.ai)?)?;
        Ok(Self::new(
            Arc::new(adapter),
            EngineConfig::from_settings(settings)?,
        ))
    }

    // =========================================================================
    // Responding
    // =========================================================================

    /// Reply to `user_text` under `mode`.
    pub async fn respond(&self, user_text: &str, detections: &[Detection], mode: MissionMode) -> String {
        self.respond_detailed(user_text, detections, mode).await.text
    }

    /// Reply under whichever mode is active when the call starts.
    pub async fn respond_active(&self, user_text: &str, detections: &[Detection]) -> String {
        let mode = self.modes.active_mode();
        self.respond(user_text, detections, mode).await
    }

    /// Reply plus its provenance.
    pub async fn respond_detailed(
        &self,
        user_text: &str,
        detections: &[Detection],
        mode: MissionMode,
    ) -> EngineReply {
        let profile = profile_for(mode);
        let intent = classify(user_text, detections);

        let (credential, recent) = {
            let state = self.state.read();
            (
                state.credential.clone(),
                state.history.recent(self.config.prompt_history_turns),
            )
        };

        let failure = match credential {
            Some(credential) => {
                let prompt = build_prompt(user_text, detections, profile, &recent);
                tracing::debug!(%mode, %intent, "Attempting remote reply");

                match self.ai.generate(credential.expose(), &prompt).await {
                    Ok(text) => {
                        let mut state = self.state.write();
                        state.history.push(ConversationTurn::new(user_text, text.clone()));
                        state.last_failure = None;
                        drop(state);

                        return EngineReply {
                            text,
                            source: ResponseSource::Remote,
                            intent,
                            mode,
                            failure: None,
                        };
                    }
                    Err(e) => {
                        let kind = e.kind().unwrap_or(ErrorKind::Transport);
                        tracing::warn!(%kind, error = %e, "Remote AI failed, using fallback reply");
                        kind
                    }
                }
            }
            None => {
                tracing::debug!(%mode, %intent, "No API key configured, using fallback reply");
                ErrorKind::NoCredential
            }
        };

        self.state.write().last_failure = Some(failure);

        let ctx = SynthesisContext::new(user_text, detections, profile);
        let text = {
            let mut rng = self.rng.lock();
            synthesize(intent, &ctx, &mut *rng)
        };

        EngineReply {
            text,
            source: ResponseSource::Fallback,
            intent,
            mode,
            failure: Some(failure),
        }
    }

    // =========================================================================
    // Credential
    // =========================================================================

    /// Set the API key used from the next call on. Blank keys clear it.
    pub fn set_credential(&self, key: &str) {
        let credential = Credential::new(key);
        let present = credential.is_some();
        self.state.write().credential = credential;
        tracing::info!(present, "API key updated");
    }

    pub fn clear_credential(&self) {
        self.state.write().credential = None;
        tracing::info!("API key cleared");
    }

    pub fn has_credential(&self) -> bool {
        self.state.read().credential.is_some()
    }

    /// Check the key's format, then make one round-trip with a fixed probe
    /// prompt. Errors surface to the caller. The engine's own key is untouched.
    pub async fn verify_credential(&self, key: &str) -> Result<String> {
        let credential = validate_credential_format(key)?;
        let reply = self.ai.generate(credential.expose(), PROBE_PROMPT).await?;
        tracing::info!("API key verified");
        Ok(reply)
    }

    // =========================================================================
    // State accessors
    // =========================================================================

    /// Completed remote exchanges, oldest first.
    pub fn history(&self) -> Vec<ConversationTurn> {
        self.state.read().history.to_vec()
    }

    pub fn clear_history(&self) {
        self.state.write().history.clear();
    }

    pub fn last_failure(&self) -> Option<ErrorKind> {
        self.state.read().last_failure
    }

    /// Switch the active mission mode by name.
    pub fn set_mode(&self, name: &str) -> Result<MissionMode> {
        self.modes.set_mode(name)
    }

    pub fn active_mode(&self) -> MissionMode {
        self.modes.active_mode()
    }

    pub fn modes(&self) -> &Arc<ModeRegistry> {
        &self.modes
    }

    /// Normalize raw detector output under the active mode's sensitivity.
    pub fn snapshot(&self, raw: &[RawDetection]) -> Vec<Detection> {
        let threshold = self
            .config
            .threshold_override
            .unwrap_or(self.modes.active().detection_sensitivity);
        normalize_snapshot(raw, threshold, self.config.max_detections)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl std::fmt::Debug for ResponseEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseEngine")
            .field("backend", &self.ai.backend_name())
            .field("mode", &self.modes.active_mode())
            .field("has_credential", &self.has_credential())
            .finish_non_exhaustive()
    }
}
