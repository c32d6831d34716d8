//! TOML-based settings for Guardian.
//!
//! Settings are loaded from `~/.guardian/settings.toml` with environment variable
//! interpolation support. The API key can also come from the environment through
//! the `get_with_env_fallback` helper.
//!
//! # Usage
//!
//! ```rust,ignore
//! use guardian_lib::settings::{SettingsManager, get_with_env_fallback, API_KEY_ENV_VARS};
//!
//! // Load settings
//! let manager = SettingsManager::new().await?;
//! let settings = manager.get().await;
//!
//! // Get the API key with environment variable fallback
//! let api_key = get_with_env_fallback(settings.ai.api_key.as_deref(), API_KEY_ENV_VARS);
//! ```

pub mod loader;
pub mod schema;

pub use loader::{
    get_with_env_fallback, guardian_dir, settings_path, SettingsManager, API_KEY_ENV_VARS,
};
pub use schema::GuardianSettings;
