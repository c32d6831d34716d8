use serde::Serialize;
use thiserror::Error;

/// Failure kinds of a remote AI attempt. All of them are absorbed by the
/// orchestrator and turned into a deterministic answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NoCredential,
    Transport,
    MalformedResponse,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NoCredential => write!(f, "no_credential"),
            ErrorKind::Transport => write!(f, "transport"),
            ErrorKind::MalformedResponse => write!(f, "malformed_response"),
        }
    }
}

#[derive(Debug, Error)]
pub enum GuardianError {
    #[error("Unknown mission mode: {0} (expected MEDICAL, DEFENSE or POLICING)")]
    InvalidMode(String),

    #[error("Invalid API key: {0}")]
    InvalidCredential(String),

    #[error("API key not configured")]
    NoCredential,

    #[error("Remote AI request failed: {0}")]
    Transport(String),

    #[error("Remote AI returned an unexpected response: {0}")]
    MalformedResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(String),
}

impl GuardianError {
    /// Adapter failure kind, if this error came from a remote AI attempt.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            GuardianError::NoCredential => Some(ErrorKind::NoCredential),
            GuardianError::Transport(_) => Some(ErrorKind::Transport),
            GuardianError::MalformedResponse(_) => Some(ErrorKind::MalformedResponse),
            _ => None,
        }
    }
}

impl From<gemini_client::GeminiError> for GuardianError {
    fn from(err: gemini_client::GeminiError) -> Self {
        if err.is_transport() {
            GuardianError::Transport(err.to_string())
        } else {
            GuardianError::MalformedResponse(err.to_string())
        }
    }
}

// Serialize as the display string (JSON output in the CLI)
impl Serialize for GuardianError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GuardianError>;
