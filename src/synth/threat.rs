//! Threat assessment rules shared by the threat reply and the status panel.

use serde::Serialize;

use crate::detection::{people_count, Detection};
use crate::mission::{MissionProfile, RiskLevel};

use super::summary::{people_phrase, plural};

/// Labels treated as sharp or weapon-like
pub const THREAT_OBJECTS: &[&str] = &["knife", "scissors"];

/// Carried items that count as unattended when nobody is in view
pub const CARRIED_ITEMS: &[&str] = &["backpack", "handbag", "suitcase"];

/// Person count above which the scene is high density
pub const HIGH_DENSITY_PEOPLE: usize = 5;

/// Which rule fired. Ordered by precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ThreatFinding {
    /// Distinct threat labels in first-appearance order
    ThreatObjects { labels: Vec<String>, count: usize },
    UnattendedItems { count: usize },
    HighDensity { people: usize },
    Nominal { people: usize, objects: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreatAssessment {
    pub finding: ThreatFinding,
    pub level: RiskLevel,
}

/// Apply the threat rules: threat objects, then unattended items, then crowd
/// density, else nominal.
pub fn assess_threat(detections: &[Detection]) -> ThreatAssessment {
    let people = people_count(detections);

    let threats: Vec<&Detection> = detections
        .iter()
        .filter(|d| THREAT_OBJECTS.contains(&d.label.as_str()))
        .collect();
    if !threats.is_empty() {
        let mut labels: Vec<String> = Vec::new();
        for threat in &threats {
            if !labels.contains(&threat.label) {
                labels.push(threat.label.clone());
            }
        }
        return ThreatAssessment {
            finding: ThreatFinding::ThreatObjects {
                labels,
                count: threats.len(),
            },
            level: RiskLevel::High,
        };
    }

    if people == 0 {
        let unattended = detections
            .iter()
            .filter(|d| CARRIED_ITEMS.contains(&d.label.as_str()))
            .count();
        if unattended > 0 {
            return ThreatAssessment {
                finding: ThreatFinding::UnattendedItems { count: unattended },
                level: RiskLevel::Medium,
            };
        }
    }

    if people > HIGH_DENSITY_PEOPLE {
        return ThreatAssessment {
            finding: ThreatFinding::HighDensity { people },
            level: RiskLevel::Medium,
        };
    }

    ThreatAssessment {
        finding: ThreatFinding::Nominal {
            people,
            objects: detections.len() - people,
        },
        level: RiskLevel::Low,
    }
}

/// Spoken threat reply for the given snapshot and mode.
pub fn threat_response(detections: &[Detection], profile: &MissionProfile) -> String {
    let assessment = assess_threat(detections);
    let level = assessment.level.as_str().to_uppercase();

    match assessment.finding {
        ThreatFinding::ThreatObjects { labels, .. } => format!(
            "Alert: Potential threat objects detected - {}. Risk level: {}. Recommend immediate activation of heightened security protocol and area assessment.",
            labels.join(", "),
            level
        ),
        ThreatFinding::UnattendedItems { count } => format!(
            "Monitoring {}. Risk level: {}. No immediate threats detected but maintaining enhanced surveillance protocols.",
            plural(count, "unattended item"),
            level
        ),
        ThreatFinding::HighDensity { people } => format!(
            "High density environment: {} individuals present. Risk level: {}. Crowd dynamics appear normal. Maintaining behavioral analysis protocols.",
            people, level
        ),
        ThreatFinding::Nominal { people, objects } => format!(
            "Threat assessment complete. Environment shows low risk profile with {} and {} detected. Risk level: {} against a {} baseline for {} operations. Security status: nominal.",
            people_phrase(people),
            plural(objects, "object"),
            level,
            profile.risk,
            profile.mode
        ),
    }
}

/// Risk level plus one detail line, for status displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreatPanel {
    pub level: RiskLevel,
    pub detail: String,
}

pub fn threat_panel(detections: &[Detection]) -> ThreatPanel {
    let assessment = assess_threat(detections);
    let detail = match &assessment.finding {
        ThreatFinding::ThreatObjects { count, .. } => {
            format!("{} detected", plural(*count, "potential threat object"))
        }
        ThreatFinding::UnattendedItems { count } => {
            format!("{} detected", plural(*count, "unattended item"))
        }
        ThreatFinding::HighDensity { people } => format!("High density: {} people in area", people),
        ThreatFinding::Nominal { .. } => "Environment appears safe".to_string(),
    };

    ThreatPanel {
        level: assessment.level,
        detail,
    }
}
