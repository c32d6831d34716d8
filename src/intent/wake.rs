//! Wake-word handling for voice transcripts.

/// Wake words in removal order. Longer phrases come first so "hey guardian"
/// is removed whole before "guardian" or "guard" are considered.
pub const WAKE_WORDS: &[&str] = &["hey guardian", "guardian", "guard", "robot"];

/// Reply spoken when the transcript is only a wake word.
pub const WAKE_ACKNOWLEDGEMENT: &str = "Yes? How can I assist?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WakeOutcome {
    /// No wake word; the transcript was not addressed to the assistant
    Ignored,
    /// Wake word alone
    Acknowledge,
    /// Command text with the wake words removed
    Command(String),
}

/// Check a transcript for a wake word and strip it.
///
/// The transcript is lowercased. The first occurrence of each wake word is
/// removed in table order and the remainder trimmed.
pub fn strip_wake_words(transcript: &str) -> WakeOutcome {
    let lowered = transcript.to_lowercase();
    if lowered.trim().is_empty() || !WAKE_WORDS.iter().any(|w| lowered.contains(w)) {
        return WakeOutcome::Ignored;
    }

    let mut command = lowered;
    for word in WAKE_WORDS {
        if let Some(pos) = command.find(word) {
            command.replace_range(pos..pos + word.len(), "");
        }
    }

    let command = command
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | '!'))
        .trim_end();

    if command.is_empty() {
        WakeOutcome::Acknowledge
    } else {
        WakeOutcome::Command(command.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_wake_word_is_ignored() {
        assert_eq!(strip_wake_words("what do you see"), WakeOutcome::Ignored);
        assert_eq!(strip_wake_words("   "), WakeOutcome::Ignored);
    }

    #[test]
    fn test_bare_wake_word_acknowledged() {
        assert_eq!(strip_wake_words("Hey Guardian"), WakeOutcome::Acknowledge);
        assert_eq!(strip_wake_words("robot"), WakeOutcome::Acknowledge);
        assert_eq!(strip_wake_words(" guardian, "), WakeOutcome::Acknowledge);
    }

    #[test]
    fn test_command_extracted() {
        assert_eq!(
            strip_wake_words("Hey Guardian, what do you see"),
            WakeOutcome::Command("what do you see".into())
        );
        assert_eq!(
            strip_wake_words("scan the room robot"),
            WakeOutcome::Command("scan the room".into())
        );
    }
}
