//! Prompt construction for the remote model.

use crate::detection::{label_counts, Detection};
use crate::engine::ConversationTurn;
use crate::mission::MissionProfile;
use crate::synth::summary::{count_phrase, join_conjunction};
use crate::synth::vision_context;

/// Fixed persona placed at the top of every prompt.
pub const PERSONA: &str = "You are Guardian X, a first-generation life-saving robot developed by BIT Robotics. You combine AI, VR and thermal vision to help people understand and stay safe in their surroundings. Answer from what you can currently observe, be direct and professional, and recommend qualified human help when a situation calls for it.";

/// Closing instruction that bounds reply length.
pub const RESPONSE_INSTRUCTION: &str = "Respond as Guardian X - professional, helpful, security-focused. Keep response concise (1-3 sentences):";

/// Prompt sent to verify that a credential works.
pub const PROBE_PROMPT: &str = "Hello, respond with \"API key working\"";

/// Priority labels present in the snapshot, with counts, or "none".
pub fn priority_context(detections: &[Detection], profile: &MissionProfile) -> String {
    let phrases: Vec<String> = label_counts(detections)
        .iter()
        .filter(|(label, _)| profile.is_priority(label))
        .map(|(label, count)| count_phrase(label, *count))
        .collect();

    if phrases.is_empty() {
        "none".to_string()
    } else {
        join_conjunction(&phrases)
    }
}

/// Build the full prompt text for one query.
pub fn build_prompt(
    user_text: &str,
    detections: &[Detection],
    profile: &MissionProfile,
    recent_turns: &[ConversationTurn],
) -> String {
    let mut prompt = format!(
        "System: {}\nYou are operating in {} mode. {}\n",
        PERSONA, profile.mode, profile.prompt_fragment
    );
    prompt.push_str(&format!(
        "Current visual context: {}\n",
        vision_context(detections)
    ));
    prompt.push_str(&format!(
        "Priority objects in view: {}\n",
        priority_context(detections, profile)
    ));

    if !recent_turns.is_empty() {
        prompt.push_str("Recent conversation:\n");
        for turn in recent_turns {
            prompt.push_str(&format!(
                "User: {}\nGuardian X: {}\n",
                turn.user_text, turn.assistant_text
            ));
        }
    }

    prompt.push_str(&format!("User question: {}\n", user_text));
    prompt.push_str(RESPONSE_INSTRUCTION);
    prompt
}
