//! Clip specifications and processed clip artifacts.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A clip boundary suggested by an external analysis step.
///
/// Immutable once created; consumed exactly once per batch iteration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClipSpec {
    /// Start time in the source video, seconds
    pub start_time: f64,
    /// End time in the source video, seconds
    pub end_time: f64,
    /// 1-based clip index within the batch
    pub clip_number: u32,
    /// Suggested title
    pub title: String,
    /// Suggested description
    #[serde(default)]
    pub description: String,
    /// Why the analyzer picked this window
    #[serde(default)]
    pub selection_reason: String,
}

impl ClipSpec {
    /// Create a new clip spec.
    pub fn new(start_time: f64, end_time: f64, clip_number: u32, title: impl Into<String>) -> Self {
        Self {
            start_time,
            end_time,
            clip_number,
            title: title.into(),
            description: String::new(),
            selection_reason: String::new(),
        }
    }

    /// Clip duration in seconds.
    pub fn duration(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }

    /// Check boundary sanity: start before end, both non-negative.
    pub fn is_valid(&self) -> bool {
        self.start_time >= 0.0 && self.end_time > self.start_time
    }
}

/// The terminal artifact of one clip's pipeline run.
///
/// Owned by the batch orchestrator until handed to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProcessedClip {
    /// The spec this clip was produced from
    pub spec: ClipSpec,
    /// Path of the encoded output file
    pub path: PathBuf,
    /// Output size in bytes
    pub size_bytes: u64,
    /// Whether the artifact is complete and usable
    pub ready: bool,
    /// Whether captions were burned in (false when the encoder fell back)
    pub captions_applied: bool,
    /// When the clip finished encoding
    pub created_at: DateTime<Utc>,
}

impl ProcessedClip {
    /// Read the encoded bytes from disk.
    ///
    /// Callers that stream or upload the file directly should prefer
    /// `path` to avoid buffering the whole clip.
    pub fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_spec_duration() {
        let spec = ClipSpec::new(100.0, 130.0, 1, "Test clip");
        assert_eq!(spec.duration(), 30.0);
        assert!(spec.is_valid());
    }

    #[test]
    fn test_clip_spec_invalid_bounds() {
        let spec = ClipSpec::new(130.0, 100.0, 1, "Backwards");
        assert_eq!(spec.duration(), 0.0);
        assert!(!spec.is_valid());

        let negative = ClipSpec::new(-5.0, 10.0, 1, "Negative");
        assert!(!negative.is_valid());
    }

    #[test]
    fn test_clip_spec_serde_defaults() {
        let json = r#"{"start_time":0.0,"end_time":30.0,"clip_number":1,"title":"T"}"#;
        let spec: ClipSpec = serde_json::from_str(json).unwrap();
        assert!(spec.description.is_empty());
        assert!(spec.selection_reason.is_empty());
    }
}
