//! CLI bootstrap - Initialize the Guardian stack for CLI usage.
//!
//! `CliContext` owns the engine, the settings manager, the credential store
//! and the scene the queries run against.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::credentials::{CredentialStore, FileCredentialStore};
use crate::detection::{PerceptionSource, StaticPerception};
use crate::engine::ResponseEngine;
use crate::settings::SettingsManager;
use crate::telemetry::init_tracing;

use super::args::Args;

/// Context for CLI execution containing all initialized services.
pub struct CliContext {
    /// Response engine shared by the runner and the REPL
    pub engine: Arc<ResponseEngine>,

    /// Settings manager
    pub settings_manager: Arc<SettingsManager>,

    /// Persisted API key
    pub credential_store: Arc<dyn CredentialStore>,

    /// Detections each query runs against
    pub perception: Arc<dyn PerceptionSource>,

    /// Command-line arguments
    pub args: Args,
}

impl CliContext {
    /// Whether replies may use the remote model
    pub fn remote_enabled(&self) -> bool {
        !self.args.offline && self.engine.has_credential()
    }

    pub async fn shutdown(self) -> Result<()> {
        tracing::debug!(
            turns = self.engine.history().len(),
            "CLI session finished"
        );
        Ok(())
    }
}

/// Initialize the CLI context with all services.
pub async fn initialize(args: &Args) -> Result<CliContext> {
    // Load .env file if present
    if let Err(e) = dotenvy::dotenv() {
        // Only warn on errors other than file not found
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("[cli] Failed to load .env file: {}", e);
        }
    }

    let settings_manager = Arc::new(match &args.settings {
        Some(path) => SettingsManager::with_path(path.clone())
            .await
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => SettingsManager::new()
            .await
            .context("Failed to initialize settings manager")?,
    });

    let mut settings = settings_manager.get().await;

    let log_level = if args.verbose {
        "debug"
    } else {
        settings.advanced.log_level.as_str()
    };
    init_tracing(log_level)?;

    // Ensure settings file exists (creates template on first run)
    if args.settings.is_none() {
        if let Err(e) = settings_manager.ensure_settings_file().await {
            tracing::warn!("Failed to create settings template: {}", e);
        }
    }

    if let Some(model) = &args.model {
        settings.ai.model = model.clone();
    }
    if let Some(mode) = &args.mode {
        settings.engine.default_mode = mode.clone();
    }

    if args.verbose {
        eprintln!(
            "[cli] Settings loaded from {}",
            settings_manager.path().display()
        );
        eprintln!("[cli] Model: {}", settings.ai.model);
        eprintln!("[cli] Mode: {}", settings.engine.default_mode);
    }

    let engine = Arc::new(
        ResponseEngine::from_settings(&settings).context("Failed to initialize response engine")?,
    );

    let credential_store: Arc<dyn CredentialStore> = Arc::new(FileCredentialStore::default());

    if args.offline {
        tracing::info!("Offline mode, remote model disabled");
    } else {
        let stored = match credential_store.load() {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("Failed to read stored API key: {}", e);
                None
            }
        };

        // Priority: --api-key / $GUARDIAN_API_KEY > settings and env > stored key
        let key = match args.api_key.clone() {
            Some(key) => Some(key),
            None => settings_manager.api_key().await,
        }
        .or_else(|| stored.map(|c| c.expose().to_string()));

        if let Some(key) = key {
            engine.set_credential(&key);
        }
    }

    let perception: Arc<dyn PerceptionSource> = match &args.scene {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read scene file: {}", path.display()))?;
            let scene = StaticPerception::from_json(&json)
                .with_context(|| format!("Invalid scene file: {}", path.display()))?;
            Arc::new(scene)
        }
        None => Arc::new(StaticPerception::default()),
    };

    if args.verbose {
        eprintln!(
            "[cli] Remote model: {}",
            if !args.offline && engine.has_credential() {
                "enabled"
            } else {
                "disabled"
            }
        );
        eprintln!("[cli] Scene detections: {}", perception.detect().len());
    }

    Ok(CliContext {
        engine,
        settings_manager,
        credential_store,
        perception,
        args: args.clone(),
    })
}
