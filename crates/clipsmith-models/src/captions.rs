//! Word-level caption events.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One timed caption word, relative to clip-local time zero.
///
/// Invariant: `0 <= start < end <= clip duration` and events within a track
/// are laid out sequentially without overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WordEvent {
    /// Start offset in seconds
    pub start: f64,
    /// End offset in seconds
    pub end: f64,
    /// Display duration (`end - start`)
    pub duration: f64,
    /// The word as displayed
    pub text: String,
    /// Whether this word gets hook styling (attention word)
    pub is_hook: bool,
}

impl WordEvent {
    /// Create a new word event.
    pub fn new(start: f64, end: f64, text: impl Into<String>, is_hook: bool) -> Self {
        Self {
            start,
            end,
            duration: (end - start).max(0.0),
            text: text.into(),
            is_hook,
        }
    }
}

/// The full ordered caption sequence for one clip.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CaptionTrack {
    /// Word events in non-decreasing start order
    pub events: Vec<WordEvent>,
}

impl CaptionTrack {
    /// An empty track (clip proceeds without captions).
    pub fn empty() -> Self {
        Self { events: Vec::new() }
    }

    /// Whether the track has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of word events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Sum of all event durations.
    pub fn total_duration(&self) -> f64 {
        self.events.iter().map(|e| e.duration).sum()
    }

    /// End offset of the last event, or zero for an empty track.
    pub fn end(&self) -> f64 {
        self.events.last().map(|e| e.end).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_event_duration() {
        let event = WordEvent::new(1.0, 1.5, "hello", false);
        assert!((event.duration - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_track_accessors() {
        let track = CaptionTrack {
            events: vec![
                WordEvent::new(0.0, 0.4, "one", true),
                WordEvent::new(0.4, 1.0, "two", false),
            ],
        };
        assert_eq!(track.len(), 2);
        assert!((track.total_duration() - 1.0).abs() < 1e-9);
        assert!((track.end() - 1.0).abs() < 1e-9);
        assert!(CaptionTrack::empty().is_empty());
    }
}
