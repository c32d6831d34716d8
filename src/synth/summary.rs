//! Count-conjunction rendering of a detection snapshot.

use crate::detection::{label_counts, Detection};

/// Vision context used in prompts when nothing is in view
pub const NO_OBJECTS_CONTEXT: &str = "No objects currently detected";

/// "1 cup" / "2 cups"
pub fn count_phrase(label: &str, count: usize) -> String {
    plural(count, label)
}

/// Join phrases as "A", "A and B" or "A, B, and C".
pub fn join_conjunction(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} and {}", first, second),
        [head @ .., last] => format!("{}, and {}", head.join(", "), last),
    }
}

/// Per-label counts in first-appearance order, joined with a conjunction.
/// Returns "no objects" for an empty snapshot.
pub fn object_summary(detections: &[Detection]) -> String {
    let phrases: Vec<String> = label_counts(detections)
        .iter()
        .map(|(label, count)| count_phrase(label, *count))
        .collect();

    if phrases.is_empty() {
        "no objects".to_string()
    } else {
        join_conjunction(&phrases)
    }
}

/// Summary for remote prompts, with the empty snapshot spelled out.
pub fn vision_context(detections: &[Detection]) -> String {
    if detections.is_empty() {
        NO_OBJECTS_CONTEXT.to_string()
    } else {
        object_summary(detections)
    }
}

/// "1 patient" / "0 patients"
pub(crate) fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// "1 person" / "3 people"
pub(crate) fn people_phrase(count: usize) -> String {
    if count == 1 {
        "1 person".to_string()
    } else {
        format!("{} people", count)
    }
}
