//! Guardian X decision and response engine.
//!
//! Takes a user utterance plus the latest object detections and produces a
//! short natural-language reply shaped by the active mission mode. A remote
//! generative model answers when an API key is configured; otherwise, or on
//! any remote failure, replies come from deterministic templates.
//!
//! ```rust,ignore
//! use guardian_lib::{ResponseEngine, GuardianSettings, Detection, MissionMode};
//!
//! let engine = ResponseEngine::from_settings(&GuardianSettings::default())?;
//! let scene = vec![Detection::new("person", 0.92), Detection::new("knife", 0.81)];
//! let reply = engine.respond("Is this area safe?", &scene, MissionMode::Defense).await;
//! ```

pub mod ai;
pub mod credentials;
pub mod detection;
pub mod engine;
pub mod error;
pub mod intent;
pub mod mission;
pub mod settings;
pub mod synth;
pub mod telemetry;

#[cfg(feature = "cli")]
pub mod cli;

pub use credentials::{Credential, CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use detection::{normalize_snapshot, Detection, PerceptionSource, RawDetection};
pub use engine::{EngineConfig, EngineReply, ResponseEngine, ResponseSource};
pub use error::{ErrorKind, GuardianError, Result};
pub use intent::{classify, Intent};
pub use mission::{profile_for, MissionMode, MissionProfile, ModeRegistry, RiskLevel};
pub use settings::{GuardianSettings, SettingsManager};
