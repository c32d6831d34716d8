//! Detection snapshot adapter.
//!
//! Turns raw detector output into the canonical [`Detection`] list the rest of
//! the engine reads. The transform is pure: it filters by confidence, cleans
//! labels, drops exact duplicate records and caps the list length.

use serde::{Deserialize, Serialize};

/// Default cap on detections kept per snapshot
pub const DEFAULT_MAX_DETECTIONS: usize = 20;

/// Axis-aligned box in frame pixels: top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<[f32; 4]> for BoundingBox {
    fn from([x, y, width, height]: [f32; 4]) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Detector output as it arrives on the wire (`{class, score, bbox}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    pub class: String,
    pub score: f32,
    #[serde(default)]
    pub bbox: [f32; 4],
}

impl RawDetection {
    pub fn new(class: impl Into<String>, score: f32) -> Self {
        Self {
            class: class.into(),
            score,
            bbox: [0.0; 4],
        }
    }

    pub fn with_bbox(mut self, bbox: [f32; 4]) -> Self {
        self.bbox = bbox;
        self
    }
}

/// One labeled object instance from a perception cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    pub bounding_box: BoundingBox,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
            bounding_box: BoundingBox::default(),
        }
    }

    /// Confidence as a whole percentage, rounded to nearest
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }
}

/// Normalize raw detector output into a canonical snapshot.
///
/// Records below `threshold` are dropped, as are records with an empty label or
/// a non-finite score. Two records are the same instance only when label, score
/// and box are identical; overlapping boxes are never merged.
pub fn normalize_snapshot(
    raw: &[RawDetection],
    threshold: f32,
    max_detections: usize,
) -> Vec<Detection> {
    let mut snapshot: Vec<Detection> = Vec::with_capacity(raw.len().min(max_detections));

    for record in raw {
        if snapshot.len() >= max_detections {
            break;
        }
        if !record.score.is_finite() || record.score < threshold {
            continue;
        }

        let label = record.class.trim().to_lowercase();
        if label.is_empty() {
            continue;
        }

        let detection = Detection {
            label,
            confidence: record.score.clamp(0.0, 1.0),
            bounding_box: BoundingBox::from(record.bbox),
        };

        if snapshot.contains(&detection) {
            continue;
        }
        snapshot.push(detection);
    }

    tracing::trace!(
        raw = raw.len(),
        kept = snapshot.len(),
        threshold,
        "Normalized detection snapshot"
    );
    snapshot
}

/// Number of detections carrying `label`
pub fn count_label(detections: &[Detection], label: &str) -> usize {
    detections.iter().filter(|d| d.label == label).count()
}

/// Number of `person` detections
pub fn people_count(detections: &[Detection]) -> usize {
    count_label(detections, "person")
}

/// Per-label counts in first-appearance order.
pub fn label_counts(detections: &[Detection]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for detection in detections {
        match counts.iter_mut().find(|(label, _)| *label == detection.label) {
            Some((_, count)) => *count += 1,
            None => counts.push((detection.label.clone(), 1)),
        }
    }
    counts
}

/// Supplies raw detections on demand. The engine only consumes the output and
/// never drives the detector's schedule.
pub trait PerceptionSource: Send + Sync {
    fn detect(&self) -> Vec<RawDetection>;
}

/// A fixed scene, e.g. loaded from a JSON file for headless runs.
#[derive(Debug, Clone, Default)]
pub struct StaticPerception {
    detections: Vec<RawDetection>,
}

impl StaticPerception {
    pub fn new(detections: Vec<RawDetection>) -> Self {
        Self { detections }
    }

    /// Parse a JSON array of `{class, score, bbox}` records.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }
}

impl PerceptionSource for StaticPerception {
    fn detect(&self) -> Vec<RawDetection> {
        self.detections.clone()
    }
}
