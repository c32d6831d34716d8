//! Deterministic response synthesis.
//!
//! Pure functions from (intent, detections, mission profile) to a short reply.
//! This is the fallback path: it needs no network and never fails. Templates
//! that vary their phrasing draw from an injected [`rand::Rng`] so tests and
//! seeded runs are reproducible.

pub mod assessments;
pub mod summary;
pub mod threat;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::detection::{people_count, Detection};
use crate::intent::{mentioned_detection, Intent};
use crate::mission::{MissionMode, MissionProfile};

pub use assessments::{object_assessment, NEUTRAL_ASSESSMENT};
pub use summary::{object_summary, vision_context, NO_OBJECTS_CONTEXT};
pub use threat::{assess_threat, threat_panel, ThreatAssessment, ThreatFinding, ThreatPanel};

use summary::{people_phrase, plural};

/// Everything a template may read.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisContext<'a> {
    pub detections: &'a [Detection],
    pub profile: &'a MissionProfile,
    pub input: &'a str,
}

impl<'a> SynthesisContext<'a> {
    pub fn new(input: &'a str, detections: &'a [Detection], profile: &'a MissionProfile) -> Self {
        Self {
            detections,
            profile,
            input,
        }
    }

    fn has_vision(&self) -> bool {
        !self.detections.is_empty()
    }

    fn mode(&self) -> MissionMode {
        self.profile.mode
    }
}

/// Render the reply for `intent`.
pub fn synthesize<R: Rng + ?Sized>(intent: Intent, ctx: &SynthesisContext<'_>, rng: &mut R) -> String {
    let text = match intent {
        Intent::Vision => vision_response(ctx),
        Intent::Threat => threat::threat_response(ctx.detections, ctx.profile),
        Intent::Medical => medical_response(ctx),
        Intent::Capabilities => capabilities_response(ctx),
        Intent::Personality => personality_response(ctx, rng),
        Intent::Technical => technical_response(ctx),
        Intent::Environment => environment_response(ctx),
        Intent::Greeting => greeting_response(ctx, rng),
        Intent::ObjectSpecific => object_specific_response(ctx),
        Intent::General => general_response(ctx),
    };

    tracing::debug!(%intent, mode = %ctx.mode(), chars = text.len(), "Synthesized fallback reply");
    text
}

// =============================================================================
// Vision
// =============================================================================

const VISION_EMPTY: &str = "My visual sensors are active but I'm not detecting any objects in the current field of view. Please ensure the camera is properly positioned and the environment is well-lit.";

fn vision_response(ctx: &SynthesisContext<'_>) -> String {
    if !ctx.has_vision() {
        return VISION_EMPTY.to_string();
    }

    format!(
        "I can see {} in my field of vision. {} All systems are operating within normal parameters.",
        object_summary(ctx.detections),
        mode_elaboration(ctx)
    )
}

fn mode_elaboration(ctx: &SynthesisContext<'_>) -> String {
    match ctx.mode() {
        MissionMode::Medical => format!(
            "Medical assessment protocols active. {} ready for health evaluation.",
            plural(people_count(ctx.detections), "individual")
        ),
        MissionMode::Defense => {
            "Tactical analysis engaged. Monitoring for potential threats and security anomalies."
                .to_string()
        }
        MissionMode::Policing => "Standard surveillance protocols active. Behavioral analysis systems monitoring all detected entities.".to_string(),
    }
}

// =============================================================================
// Medical
// =============================================================================

/// Labels treated as medical-related
pub const MEDICAL_ITEMS: &[&str] = &["bottle", "cup", "scissors", "syringe", "toothbrush"];

fn medical_response(ctx: &SynthesisContext<'_>) -> String {
    let people = people_count(ctx.detections);
    let medical: Vec<Detection> = ctx
        .detections
        .iter()
        .filter(|d| MEDICAL_ITEMS.contains(&d.label.as_str()))
        .cloned()
        .collect();

    if medical.is_empty() {
        return format!(
            "Medical mode initialized. Thermal and fluorescence imaging ready for patient assessment. {} detected. No immediate medical equipment visible in current field of view.",
            plural(people, "individual")
        );
    }

    format!(
        "Medical analysis active. Fluorescence imaging systems engaged. Detected {}: {}. {} in assessment zone.",
        plural(medical.len(), "medical-related item"),
        object_summary(&medical),
        plural(people, "patient")
    )
}

// =============================================================================
// Capabilities, personality and technical
// =============================================================================

fn capabilities_response(ctx: &SynthesisContext<'_>) -> String {
    let vision_status = if ctx.has_vision() {
        "with active visual monitoring"
    } else {
        "ready for visual activation"
    };

    format!(
        "Guardian X operational capabilities include: advanced object detection, threat analysis, medical assessment, crowd monitoring, and intelligent conversation. Currently in {} mode {}. I can analyze any environment and respond to complex questions about what I observe.",
        ctx.mode(),
        vision_status
    )
}

/// Personality phrasings, one picked per reply
pub const PERSONALITY_LINES: [&str; 3] = [
    "I'm Guardian X, first-generation life-saving robot from BIT Robotics. My core mission transcends simple automation - I exist to preserve human life through the convergence of AI, VR, and thermal vision.",
    "Guardian X reporting. I represent the next evolution in emergency response technology, designed to operate where human limitations become life-threatening obstacles.",
    "I am Guardian X - engineered by BIT Robotics with one unwavering purpose: saving lives. My tri-modal systems allow me to see, analyze, and respond beyond human capabilities.",
];

fn personality_response<R: Rng + ?Sized>(ctx: &SynthesisContext<'_>, rng: &mut R) -> String {
    let line = PERSONALITY_LINES
        .choose(rng)
        .copied()
        .unwrap_or(PERSONALITY_LINES[0]);
    format!("{} Currently operating in {} mode.", line, ctx.mode())
}

const TECHNICAL_BASE: &str = "My core architecture fuses three revolutionary technologies: immersive VR for enhanced spatial awareness, thermal imaging for environmental analysis beyond visible spectrum, and advanced AI for real-time decision making.";

fn technical_response(ctx: &SynthesisContext<'_>) -> String {
    let detail = match ctx.mode() {
        MissionMode::Medical => "My medical systems utilize fluorescence imaging to penetrate biological tissues, revealing internal structures invisible to standard optics. This allows rapid diagnosis and treatment guidance.",
        MissionMode::Defense => "Defense protocols integrate thermal imaging with predictive AI algorithms, enabling threat detection and tactical analysis in environments too dangerous for human reconnaissance.",
        MissionMode::Policing => "Policing mode combines facial recognition with behavioral analysis algorithms, monitoring crowd dynamics and identifying anomalous patterns in real-time.",
    };
    format!("{} {}", TECHNICAL_BASE, detail)
}

// =============================================================================
// Environment
// =============================================================================

pub const FURNITURE: &[&str] = &["chair", "sofa", "bed", "dining table", "tv"];
pub const PERSONAL_ITEMS: &[&str] = &["cell phone", "laptop", "book", "handbag", "backpack"];

const ENVIRONMENT_EMPTY: &str = "Environmental scan incomplete - visual sensors require activation for comprehensive area analysis. Current telemetry suggests standard indoor/controlled environment.";

fn environment_response(ctx: &SynthesisContext<'_>) -> String {
    if !ctx.has_vision() {
        return ENVIRONMENT_EMPTY.to_string();
    }

    let count_in = |set: &[&str]| {
        ctx.detections
            .iter()
            .filter(|d| set.contains(&d.label.as_str()))
            .count()
    };
    let furniture = count_in(FURNITURE);
    let personal = count_in(PERSONAL_ITEMS);

    if furniture > 2 {
        return format!(
            "Environment analysis: Residential or office space detected with {} furniture items and {} personal objects. Space appears organized and inhabited.",
            furniture, personal
        );
    }

    format!(
        "Current environment shows {} including standard items. Environmental parameters suggest controlled, secure location suitable for current mission protocols.",
        plural(ctx.detections.len(), "object")
    )
}

// =============================================================================
// Greeting
// =============================================================================

/// Greeting phrasings; `{mode}` is replaced with the mode name
pub const GREETING_LINES: [&str; 3] = [
    "Greetings! Guardian X systems online and operational in {mode} mode.",
    "Hello! Guardian X reporting for duty. All systems nominal in {mode} configuration.",
    "Guardian X at your service. {mode} protocols active and ready.",
];

fn greeting_response<R: Rng + ?Sized>(ctx: &SynthesisContext<'_>, rng: &mut R) -> String {
    let line = GREETING_LINES
        .choose(rng)
        .copied()
        .unwrap_or(GREETING_LINES[0])
        .replace("{mode}", ctx.mode().as_str());
    let vision = if ctx.has_vision() {
        " Visual monitoring active."
    } else {
        " Awaiting camera activation for full environmental analysis."
    };
    format!("{}{} How may I assist you today?", line, vision)
}

// =============================================================================
// Object-specific and general
// =============================================================================

const OBJECT_NOT_FOUND: &str = "I'm analyzing the objects in my field of view but don't see the specific item you mentioned. Please point it out or move it into my visual range.";

fn object_specific_response(ctx: &SynthesisContext<'_>) -> String {
    let lowered = ctx.input.to_lowercase();
    match mentioned_detection(&lowered, ctx.detections) {
        Some(detection) => {
            let label = detection.label.trim().to_lowercase();
            format!(
                "I can see the {} you're referring to with {}% confidence. From my {} perspective, this object {}.",
                label,
                detection.confidence_percent(),
                ctx.mode(),
                object_assessment(ctx.mode(), &label)
            )
        }
        None => OBJECT_NOT_FOUND.to_string(),
    }
}

const GENERAL_EMPTY: &str = "Guardian X ready to assist with any questions or analysis. Please activate the camera system for comprehensive environmental assessment, or ask me about my capabilities, mission modes, or technical specifications.";

fn general_response(ctx: &SynthesisContext<'_>) -> String {
    if !ctx.has_vision() {
        return GENERAL_EMPTY.to_string();
    }

    format!(
        "I'm currently monitoring {} including {} in {} mode. Could you be more specific about what analysis or information you need? I can discuss threats, medical concerns, or general observations.",
        plural(ctx.detections.len(), "object"),
        people_phrase(people_count(ctx.detections)),
        ctx.mode()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::classify;
    use crate::mission::profile_for;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn snapshot(labels: &[&str]) -> Vec<Detection> {
        labels.iter().map(|l| Detection::new(*l, 0.8)).collect()
    }

    fn render(intent: Intent, input: &str, detections: &[Detection], mode: MissionMode) -> String {
        let ctx = SynthesisContext::new(input, detections, profile_for(mode));
        synthesize(intent, &ctx, &mut StdRng::seed_from_u64(7))
    }

    // -------------------------------------------------------------------------
    // Vision
    // -------------------------------------------------------------------------

    #[test]
    fn test_vision_empty_is_sensor_status() {
        let text = render(Intent::Vision, "", &[], MissionMode::Policing);
        assert!(text.starts_with("My visual sensors are active"));
    }

    #[test]
    fn test_vision_summary_and_mode_elaboration() {
        let detections = snapshot(&["person", "person", "cup"]);
        let text = render(Intent::Vision, "", &detections, MissionMode::Medical);
        assert!(text.starts_with("I can see 2 persons and 1 cup in my field of vision."));
        assert!(text.contains("2 individuals ready for health evaluation"));

        let text = render(Intent::Vision, "", &detections, MissionMode::Defense);
        assert!(text.contains("Tactical analysis engaged"));

        let text = render(Intent::Vision, "", &detections, MissionMode::Policing);
        assert!(text.contains("Standard surveillance protocols active"));
    }

    // -------------------------------------------------------------------------
    // Medical and environment
    // -------------------------------------------------------------------------

    #[test]
    fn test_medical_names_items() {
        let detections = snapshot(&["person", "bottle", "bottle", "cup"]);
        let text = render(Intent::Medical, "", &detections, MissionMode::Medical);
        assert!(text.contains("Detected 3 medical-related items: 2 bottles and 1 cup."));
        assert!(text.contains("1 patient in assessment zone"));
    }

    #[test]
    fn test_medical_without_equipment() {
        let text = render(Intent::Medical, "", &snapshot(&["person", "person"]), MissionMode::Medical);
        assert!(text.contains("2 individuals detected"));
        assert!(text.contains("No immediate medical equipment visible"));
    }

    #[test]
    fn test_environment_branches() {
        let empty = render(Intent::Environment, "", &[], MissionMode::Policing);
        assert!(empty.starts_with("Environmental scan incomplete"));

        let room = snapshot(&["chair", "chair", "sofa", "laptop", "person"]);
        let text = render(Intent::Environment, "", &room, MissionMode::Policing);
        assert!(text.contains("3 furniture items and 1 personal objects"));

        let sparse = snapshot(&["chair", "cup"]);
        let text = render(Intent::Environment, "", &sparse, MissionMode::Policing);
        assert!(text.starts_with("Current environment shows 2 objects"));
    }

    // -------------------------------------------------------------------------
    // Randomized templates
    // -------------------------------------------------------------------------

    #[test]
    fn test_greeting_picks_from_set() {
        let profile = profile_for(MissionMode::Defense);
        let ctx = SynthesisContext::new("hello", &[], profile);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            let text = synthesize(Intent::Greeting, &ctx, &mut rng);
            let head = GREETING_LINES
                .iter()
                .map(|l| l.replace("{mode}", "DEFENSE"))
                .find(|l| text.starts_with(l.as_str()));
            assert!(head.is_some(), "unexpected greeting: {text}");
            assert!(text.contains("Awaiting camera activation"));
            assert!(text.ends_with("How may I assist you today?"));
        }
    }

    #[test]
    fn test_personality_picks_from_set() {
        let text = render(Intent::Personality, "who are you", &[], MissionMode::Medical);
        assert!(PERSONALITY_LINES.iter().any(|l| text.starts_with(l)));
        assert!(text.ends_with("Currently operating in MEDICAL mode."));
    }

    #[test]
    fn test_same_seed_same_output() {
        let a = render(Intent::Greeting, "hi", &[], MissionMode::Policing);
        let b = render(Intent::Greeting, "hi", &[], MissionMode::Policing);
        assert_eq!(a, b);
    }

    // -------------------------------------------------------------------------
    // Object-specific and general
    // -------------------------------------------------------------------------

    #[test]
    fn test_object_specific_uses_assessment_table() {
        let detections = vec![Detection::new("person", 0.91), Detection::new("knife", 0.77)];
        let text = render(Intent::ObjectSpecific, "the knife", &detections, MissionMode::Defense);
        assert_eq!(
            text,
            "I can see the knife you're referring to with 77% confidence. From my DEFENSE perspective, this object represents an immediate security threat."
        );
    }

    #[test]
    fn test_object_specific_mixed_case_label() {
        let detections = vec![Detection::new("Knife", 0.77)];
        let text = render(Intent::ObjectSpecific, "the knife", &detections, MissionMode::Defense);
        assert!(text.starts_with("I can see the knife you're referring to with 77% confidence."));
        assert!(text.ends_with("this object represents an immediate security threat."));
    }

    #[test]
    fn test_object_specific_missing_item() {
        let text = render(Intent::ObjectSpecific, "the umbrella", &snapshot(&["cup"]), MissionMode::Medical);
        assert!(text.contains("don't see the specific item"));
    }

    #[test]
    fn test_general_counts_and_empty() {
        let text = render(Intent::General, "", &snapshot(&["person", "cup", "car"]), MissionMode::Policing);
        assert!(text.starts_with("I'm currently monitoring 3 objects including 1 person in POLICING mode."));

        let text = render(Intent::General, "", &snapshot(&["cup"]), MissionMode::Policing);
        assert!(text.starts_with("I'm currently monitoring 1 object including 0 people in POLICING mode."));

        let text = render(Intent::General, "", &[], MissionMode::Policing);
        assert!(text.contains("activate the camera system"));
    }

    #[test]
    fn test_capabilities_and_technical_mention_mode() {
        let text = render(Intent::Capabilities, "", &[], MissionMode::Defense);
        assert!(text.contains("Currently in DEFENSE mode ready for visual activation"));
        let text = render(Intent::Technical, "", &[], MissionMode::Policing);
        assert!(text.contains("Policing mode combines facial recognition"));
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        const LABELS: &[&str] = &[
            "person", "knife", "cup", "bottle", "chair", "sofa", "tv", "backpack", "car",
        ];

        fn arb_detections() -> impl Strategy<Value = Vec<Detection>> {
            prop::collection::vec((0..LABELS.len(), 0.0f32..=1.0), 0..12).prop_map(|items| {
                items
                    .into_iter()
                    .map(|(i, c)| Detection::new(LABELS[i], c))
                    .collect()
            })
        }

        fn arb_mode() -> impl Strategy<Value = MissionMode> {
            prop::sample::select(MissionMode::ALL.to_vec())
        }

        proptest! {
            #[test]
            fn synthesized_reply_is_never_empty(
                input in ".{0,48}",
                detections in arb_detections(),
                mode in arb_mode(),
                seed in any::<u64>(),
            ) {
                let intent = classify(&input, &detections);
                let ctx = SynthesisContext::new(&input, &detections, profile_for(mode));
                let text = synthesize(intent, &ctx, &mut StdRng::seed_from_u64(seed));
                prop_assert!(!text.trim().is_empty());
            }
        }
    }
}
