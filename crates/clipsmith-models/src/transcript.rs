//! Transcript segments.
//!
//! Segments arrive either as many short caption-style entries or as a single
//! aggregate block whose duration spans the whole source video. Both shapes
//! use the same type; the caption synthesizer distinguishes them by duration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::timestamp::parse_timestamp;

/// One transcript segment with absolute source-video timing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptSegment {
    /// Start time in the source video, seconds
    pub start: f64,
    /// End time in the source video, seconds
    pub end: f64,
    /// Segment text
    pub text: String,
}

impl TranscriptSegment {
    /// Create a new segment.
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Segment duration in seconds.
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Whether the segment overlaps the half-open window `[start, end)`.
    pub fn overlaps(&self, window_start: f64, window_end: f64) -> bool {
        self.start < window_end && self.end > window_start
    }
}

/// Parse a timestamped transcript in `[HH:MM:SS] text` line format.
///
/// Each segment ends where the next one starts; the final segment ends at
/// `total_duration`. Lines without a timestamp prefix are ignored.
pub fn parse_timestamped_transcript(raw: &str, total_duration: f64) -> Vec<TranscriptSegment> {
    let mut entries: Vec<(f64, String)> = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('[') else {
            continue;
        };
        let Some((ts, text)) = rest.split_once("] ") else {
            continue;
        };
        let Ok(start) = parse_timestamp(ts) else {
            continue;
        };
        let text = text.trim();
        if !text.is_empty() {
            entries.push((start, text.to_string()));
        }
    }

    let mut segments = Vec::with_capacity(entries.len());
    for i in 0..entries.len() {
        let (start, ref text) = entries[i];
        let end = entries
            .get(i + 1)
            .map(|(next_start, _)| *next_start)
            .unwrap_or(total_duration)
            .max(start);
        segments.push(TranscriptSegment::new(start, end, text.clone()));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_overlap() {
        let seg = TranscriptSegment::new(10.0, 15.0, "hello");
        assert!(seg.overlaps(12.0, 20.0));
        assert!(seg.overlaps(0.0, 11.0));
        assert!(!seg.overlaps(15.0, 20.0));
        assert!(!seg.overlaps(0.0, 10.0));
    }

    #[test]
    fn test_parse_timestamped_transcript() {
        let raw = "[00:00:00] first line\n[00:00:05] second line\nnoise\n[00:00:12] third line\n";
        let segments = parse_timestamped_transcript(raw, 20.0);

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].start, 0.0);
        assert_eq!(segments[0].end, 5.0);
        assert_eq!(segments[1].text, "second line");
        assert_eq!(segments[2].start, 12.0);
        assert_eq!(segments[2].end, 20.0);
    }

    #[test]
    fn test_parse_transcript_skips_malformed_lines() {
        let raw = "[bad] nope\n[00:00:01] ok\n[00:00:02]\n";
        let segments = parse_timestamped_transcript(raw, 10.0);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "ok");
    }
}
