//! Per-mode assessment phrases for object-specific replies.

use crate::mission::MissionMode;

/// Used when a mode has no entry for a label
pub const NEUTRAL_ASSESSMENT: &str = "appears to be a standard object requiring no special protocols";

const MEDICAL: &[(&str, &str)] = &[
    ("person", "appears to be a patient requiring assessment"),
    ("bottle", "could contain medical supplies or medication"),
    ("cup", "may be used for patient hydration or specimen collection"),
    ("scissors", "is standard medical equipment for procedures"),
];

const DEFENSE: &[(&str, &str)] = &[
    ("person", "is a potential threat requiring continuous monitoring"),
    ("backpack", "requires inspection for concealed items"),
    ("car", "should be screened for security concerns"),
    ("knife", "represents an immediate security threat"),
];

const POLICING: &[(&str, &str)] = &[
    ("person", "is under routine surveillance protocols"),
    ("cell phone", "could be used for communication monitoring"),
    ("car", "may require license plate verification"),
    ("backpack", "warrants standard security screening"),
];

pub fn object_assessment(mode: MissionMode, label: &str) -> &'static str {
    let table = match mode {
        MissionMode::Medical => MEDICAL,
        MissionMode::Defense => DEFENSE,
        MissionMode::Policing => POLICING,
    };

    table
        .iter()
        .find(|(key, _)| *key == label)
        .map(|(_, assessment)| *assessment)
        .unwrap_or(NEUTRAL_ASSESSMENT)
}
