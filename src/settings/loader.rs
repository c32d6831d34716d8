//! Settings file access.
//!
//! `~/.guardian/settings.toml` is read once at startup. String fields that hold
//! a `$VAR` or `${VAR}` reference are replaced by the variable's value when it
//! is set. Saves go through a temp file and rename.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use super::schema::GuardianSettings;

/// Written on first run so users have every key to edit.
const TEMPLATE: &str = include_str!("template.toml");

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["GUARDIAN_API_KEY", "GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Directory holding Guardian's settings and credential files.
pub fn guardian_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".guardian")
}

pub fn settings_path() -> PathBuf {
    guardian_dir().join("settings.toml")
}

/// Loaded settings plus the file they came from.
pub struct SettingsManager {
    path: PathBuf,
    current: RwLock<GuardianSettings>,
}

impl SettingsManager {
    /// Load from the default location.
    pub async fn new() -> Result<Self> {
        Self::with_path(settings_path()).await
    }

    /// Load from `path`. A missing file yields the defaults.
    pub async fn with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let current = read_settings(&path).await?;
        Ok(Self {
            path,
            current: RwLock::new(current),
        })
    }

    pub async fn get(&self) -> GuardianSettings {
        self.current.read().await.clone()
    }

    /// Replace the settings and persist them.
    pub async fn update(&self, settings: GuardianSettings) -> Result<()> {
        let text = toml::to_string_pretty(&settings).context("Failed to serialize settings")?;
        write_atomically(&self.path, &text).await?;
        *self.current.write().await = settings;
        tracing::info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Look up one value by dotted key, e.g. `engine.default_mode`.
    pub async fn get_value(&self, key: &str) -> Result<serde_json::Value> {
        let json = serde_json::to_value(&*self.current.read().await)?;
        let pointer = format!("/{}", key.trim().replace('.', "/"));
        json.pointer(&pointer)
            .cloned()
            .with_context(|| format!("Unknown setting '{}'", key))
    }

    /// API key from the settings file, then the environment.
    pub async fn api_key(&self) -> Option<String> {
        let current = self.current.read().await;
        get_with_env_fallback(current.ai.api_key.as_deref(), API_KEY_ENV_VARS)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the template unless a settings file already exists.
    /// Returns `true` when the template was written.
    pub async fn ensure_settings_file(&self) -> Result<bool> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let created = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await;
        let mut file = match created {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to create {}", self.path.display()))
            }
        };

        file.write_all(TEMPLATE.as_bytes()).await?;
        file.flush().await?;
        tracing::info!(path = %self.path.display(), "Wrote settings template");
        Ok(true)
    }
}

async fn read_settings(path: &Path) -> Result<GuardianSettings> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(GuardianSettings::default());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    let mut settings: GuardianSettings =
        toml::from_str(&text).with_context(|| format!("Invalid settings in {}", path.display()))?;
    apply_env_references(&mut settings);

    tracing::debug!(path = %path.display(), "Settings loaded");
    Ok(settings)
}

async fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let staging = path.with_extension("toml.tmp");
    tokio::fs::write(&staging, contents).await?;
    tokio::fs::rename(&staging, path)
        .await
        .with_context(|| format!("Failed to replace {}", path.display()))
}

/// Variable name in a `$VAR` or `${VAR}` value.
fn env_reference(value: &str) -> Option<&str> {
    let rest = value.trim().strip_prefix('$')?;
    let name = match rest.strip_prefix('{') {
        Some(braced) => braced.strip_suffix('}')?,
        None => rest,
    };
    (!name.is_empty()).then_some(name)
}

fn apply_env_references(settings: &mut GuardianSettings) {
    let ai = &mut settings.ai;
    let fields = [&mut ai.model, &mut ai.endpoint]
        .into_iter()
        .chain(ai.api_key.as_mut());

    for field in fields {
        if let Some(value) = env_reference(field.as_str()).and_then(|name| std::env::var(name).ok()) {
            *field = value;
        }
    }
}

/// First non-blank value: the setting, then each environment variable in order.
pub fn get_with_env_fallback(setting: Option<&str>, env_vars: &[&str]) -> Option<String> {
    setting
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| {
            env_vars
                .iter()
                .filter_map(|name| std::env::var(name).ok())
                .find(|v| !v.trim().is_empty())
        })
}
