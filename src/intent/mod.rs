//! Intent classification.
//!
//! Free text is mapped to exactly one [`Intent`] by an ordered rule table.
//! Matching is case-insensitive substring containment and the first matching
//! rule wins, so the table order is part of the behavior.

mod wake;

pub use wake::{strip_wake_words, WakeOutcome, WAKE_ACKNOWLEDGEMENT, WAKE_WORDS};

use serde::{Deserialize, Serialize};

use crate::detection::Detection;

/// Classified purpose of an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Vision,
    Threat,
    Medical,
    Capabilities,
    Personality,
    Technical,
    Environment,
    Greeting,
    ObjectSpecific,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Vision => "vision",
            Intent::Threat => "threat",
            Intent::Medical => "medical",
            Intent::Capabilities => "capabilities",
            Intent::Personality => "personality",
            Intent::Technical => "technical",
            Intent::Environment => "environment",
            Intent::Greeting => "greeting",
            Intent::ObjectSpecific => "object_specific",
            Intent::General => "general",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One keyword rule. Patterns are lowercase.
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub intent: Intent,
    pub patterns: &'static [&'static str],
}

impl IntentRule {
    fn matches(&self, lowered: &str) -> bool {
        self.patterns.iter().any(|p| lowered.contains(p))
    }
}

/// Keyword rules in evaluation order. Object-specific matching runs after
/// these and [`Intent::General`] is the default.
pub const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::Vision,
        patterns: &["what do you see", "describe", "analyze", "visual", "look"],
    },
    IntentRule {
        intent: Intent::Threat,
        patterns: &["threat", "danger", "security", "scan", "safe", "concerned about"],
    },
    IntentRule {
        intent: Intent::Medical,
        patterns: &["medical", "health", "patient", "assessment"],
    },
    IntentRule {
        intent: Intent::Capabilities,
        patterns: &[
            "help",
            "what can you do",
            "capabilities",
            "assist",
            "how can you help",
        ],
    },
    IntentRule {
        intent: Intent::Personality,
        patterns: &["who are you", "tell me about", "guardian", "robot", "yourself"],
    },
    IntentRule {
        intent: Intent::Technical,
        patterns: &["how do you work", "technology", "ai", "system"],
    },
    IntentRule {
        intent: Intent::Environment,
        patterns: &["where", "room", "space", "environment", "area"],
    },
    IntentRule {
        intent: Intent::Greeting,
        patterns: &["hello", "hi", "hey", "good morning", "good evening"],
    },
];

/// Classify `input` against the rule table, then against the labels in the
/// current snapshot. Never fails.
pub fn classify(input: &str, detections: &[Detection]) -> Intent {
    let lowered = input.to_lowercase();

    if let Some(rule) = INTENT_RULES.iter().find(|rule| rule.matches(&lowered)) {
        return rule.intent;
    }

    if mentioned_detection(&lowered, detections).is_some() {
        return Intent::ObjectSpecific;
    }

    Intent::General
}

/// First detection whose label occurs in the (already lowercased) input.
/// Labels are compared lowercased as well, since callers may pass detections
/// that never went through [`normalize_snapshot`](crate::detection::normalize_snapshot).
pub fn mentioned_detection<'a>(lowered: &str, detections: &'a [Detection]) -> Option<&'a Detection> {
    detections.iter().find(|d| {
        let label = d.label.trim().to_lowercase();
        !label.is_empty() && lowered.contains(label.as_str())
    })
}
