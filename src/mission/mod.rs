//! Mission mode registry.
//!
//! Three fixed profiles change vocabulary, priority objects and risk framing.
//! Exactly one profile is active; switching replaces the active pointer in one
//! step so a query that already captured its profile is unaffected.

use std::str::FromStr;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{GuardianError, Result};

/// Named mission mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum MissionMode {
    Medical,
    Defense,
    #[default]
    Policing,
}

impl MissionMode {
    pub const ALL: [MissionMode; 3] = [
        MissionMode::Medical,
        MissionMode::Defense,
        MissionMode::Policing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MissionMode::Medical => "MEDICAL",
            MissionMode::Defense => "DEFENSE",
            MissionMode::Policing => "POLICING",
        }
    }
}

impl FromStr for MissionMode {
    type Err = GuardianError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "medical" => Ok(MissionMode::Medical),
            "defense" => Ok(MissionMode::Defense),
            "policing" => Ok(MissionMode::Policing),
            _ => Err(GuardianError::InvalidMode(s.trim().to_string())),
        }
    }
}

impl std::fmt::Display for MissionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Baseline risk posture of a mode, also used for assessed threat levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of one mission mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionProfile {
    pub mode: MissionMode,
    pub priority_labels: &'static [&'static str],
    pub detection_sensitivity: f32,
    pub risk: RiskLevel,
    /// Instruction fragment embedded in remote prompts
    pub prompt_fragment: &'static str,
    /// One-line description for status displays
    pub summary: &'static str,
}

impl MissionProfile {
    pub fn is_priority(&self, label: &str) -> bool {
        self.priority_labels.contains(&label)
    }
}

static MEDICAL: MissionProfile = MissionProfile {
    mode: MissionMode::Medical,
    priority_labels: &["person", "bottle", "cup", "syringe", "scissors"],
    detection_sensitivity: 0.3,
    risk: RiskLevel::Low,
    prompt_fragment: "Focus on health, safety, and medical equipment analysis. Provide clinical insights where appropriate.",
    summary: "Medical mode focuses on health assessment and patient care",
};

static DEFENSE: MissionProfile = MissionProfile {
    mode: MissionMode::Defense,
    priority_labels: &["person", "car", "truck", "backpack", "knife"],
    detection_sensitivity: 0.2,
    risk: RiskLevel::High,
    prompt_fragment: "Emphasize threat detection, tactical assessment, security protocols. Maintain heightened situational awareness.",
    summary: "Defense mode emphasizes threat detection and tactical analysis",
};

static POLICING: MissionProfile = MissionProfile {
    mode: MissionMode::Policing,
    priority_labels: &["person", "car", "handbag", "cell phone", "laptop"],
    detection_sensitivity: 0.3,
    risk: RiskLevel::Medium,
    prompt_fragment: "Highlight crowd monitoring, behavioral analysis, law enforcement perspective. Balance vigilance with community safety.",
    summary: "Policing mode monitors crowds and maintains public safety",
};

/// Profile for a mode. Profiles are immutable statics.
pub fn profile_for(mode: MissionMode) -> &'static MissionProfile {
    match mode {
        MissionMode::Medical => &MEDICAL,
        MissionMode::Defense => &DEFENSE,
        MissionMode::Policing => &POLICING,
    }
}

/// Holds the active mission mode. Last writer wins.
#[derive(Debug)]
pub struct ModeRegistry {
    active: RwLock<MissionMode>,
}

impl ModeRegistry {
    pub fn new(initial: MissionMode) -> Self {
        Self {
            active: RwLock::new(initial),
        }
    }

    /// Switch by name. Unknown names fail and leave the active mode unchanged.
    pub fn set_mode(&self, name: &str) -> Result<MissionMode> {
        let mode: MissionMode = name.parse()?;
        self.switch_to(mode);
        Ok(mode)
    }

    pub fn switch_to(&self, mode: MissionMode) {
        let previous = std::mem::replace(&mut *self.active.write(), mode);
        if previous != mode {
            tracing::info!(from = %previous, to = %mode, "Mission mode switched");
        }
    }

    pub fn active_mode(&self) -> MissionMode {
        *self.active.read()
    }

    pub fn active(&self) -> &'static MissionProfile {
        profile_for(self.active_mode())
    }

    pub fn profile_for(&self, mode: MissionMode) -> &'static MissionProfile {
        profile_for(mode)
    }
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self::new(MissionMode::default())
    }
}
