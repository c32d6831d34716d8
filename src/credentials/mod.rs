//! API key handling and persistence.
//!
//! The secret never appears in `Debug` output or logs. Stores are synchronous;
//! the file store writes through a temp file and rename.

use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::error::{GuardianError, Result};
use crate::settings::guardian_dir;

/// Prefix carried by Google API keys issued for the Generative Language API.
pub const CREDENTIAL_PREFIX: &str = "AIzaSy";

/// An API key. Construction trims surrounding whitespace.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a key. Blank input yields `None`.
    pub fn new(key: impl AsRef<str>) -> Option<Self> {
        let trimmed = key.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The raw secret, for the request header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Check the shape of a key before it is used or persisted.
pub fn validate_credential_format(key: &str) -> Result<Credential> {
    let credential = Credential::new(key)
        .ok_or_else(|| GuardianError::InvalidCredential("API key is empty".to_string()))?;

    if !credential.expose().starts_with(CREDENTIAL_PREFIX) {
        return Err(GuardianError::InvalidCredential(format!(
            "Google API keys start with \"{}\"",
            CREDENTIAL_PREFIX
        )));
    }
    Ok(credential)
}

/// Persistence for the API key.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<Credential>>;
    fn save(&self, credential: &Credential) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Stores the key in a single file, `~/.guardian/credential` by default.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        guardian_dir().join("credential")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileCredentialStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credential>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Credential::new(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, credential.expose())?;
        restrict_permissions(&temp_path)?;
        std::fs::rename(&temp_path, &self.path)?;

        tracing::info!("Saved API key to {:?}", self.path);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!("Removed stored API key at {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// In-process store, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credential: RwLock<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credential>> {
        Ok(self.credential.read().clone())
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        *self.credential.write() = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.credential.write() = None;
        Ok(())
    }
}
