//! Caption timing synthesis.
//!
//! Converts transcript segments overlapping a clip window into word-level
//! caption events on clip-local time. Two regimes share the same layout:
//!
//! - *Normal*: many short segments; each is tokenized and laid out at its
//!   own offset within the clip.
//! - *Aggregate*: one segment spans (nearly) the whole source video, so its
//!   own timestamps are meaningless at word granularity. The clip's share
//!   of the text is sliced proportionally by character offset and laid out
//!   from clip-local zero.

pub mod ass;
pub mod weights;

use tracing::debug;

use clipsmith_models::{CaptionTrack, TranscriptSegment, WordEvent};

use self::weights::{is_hook_word, word_weight};

/// Tunable parameters of the synthesizer.
///
/// The large-segment threshold and boundary-trim length are heuristics, so
/// they are configuration rather than constants.
#[derive(Debug, Clone)]
pub struct CaptionConfig {
    /// Segments at least this long (seconds) are treated as aggregate text
    pub large_segment_threshold: f64,
    /// Lower bound for a word's display duration, seconds
    pub min_word_duration: f64,
    /// Upper bound for a word's display duration, seconds
    pub max_word_duration: f64,
    /// Sliced boundary tokens shorter than this are assumed cut mid-word
    pub min_boundary_word_len: usize,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            large_segment_threshold: 120.0,
            min_word_duration: 0.15,
            max_word_duration: 2.0,
            min_boundary_word_len: 3,
        }
    }
}

/// Synthesize the caption track for a clip window.
///
/// A window with no extractable words yields an empty track, never an
/// error; the clip proceeds without captions.
pub fn synthesize(
    segments: &[TranscriptSegment],
    clip_start: f64,
    clip_end: f64,
    config: &CaptionConfig,
) -> CaptionTrack {
    let clip_len = clip_end - clip_start;
    if clip_len <= 0.0 {
        return CaptionTrack::empty();
    }

    let mut events = Vec::new();

    for segment in segments {
        if !segment.overlaps(clip_start, clip_end) {
            continue;
        }

        if segment.duration() >= config.large_segment_threshold {
            events.extend(synthesize_aggregate(segment, clip_start, clip_end, config));
        } else {
            events.extend(synthesize_normal(segment, clip_start, clip_end, config));
        }
    }

    events.sort_by(|a, b| a.start.total_cmp(&b.start));

    debug!(
        clip_start,
        clip_end,
        words = events.len(),
        "Synthesized caption track"
    );

    CaptionTrack { events }
}

/// Normal regime: lay the segment's words out at its clip-relative offset.
fn synthesize_normal(
    segment: &TranscriptSegment,
    clip_start: f64,
    clip_end: f64,
    config: &CaptionConfig,
) -> Vec<WordEvent> {
    let relative_start = segment.start - clip_start;
    // Segments that began before the clip window have no usable anchor.
    if relative_start < 0.0 {
        return Vec::new();
    }

    let words: Vec<&str> = segment.text.split_whitespace().collect();
    layout_words(&words, relative_start, segment.duration(), clip_end - clip_start, config)
}

/// Aggregate regime: slice the clip's share of the text by character
/// offset, then lay it out from clip-local zero.
fn synthesize_aggregate(
    segment: &TranscriptSegment,
    clip_start: f64,
    clip_end: f64,
    config: &CaptionConfig,
) -> Vec<WordEvent> {
    let segment_duration = segment.duration();
    if segment_duration <= 0.0 {
        return Vec::new();
    }

    let relative_start = ((clip_start - segment.start) / segment_duration).clamp(0.0, 1.0);
    let relative_end = ((clip_end - segment.start) / segment_duration).clamp(0.0, 1.0);

    let chars: Vec<char> = segment.text.chars().collect();
    let start_char = (chars.len() as f64 * relative_start).floor() as usize;
    let end_char = (chars.len() as f64 * relative_end).floor() as usize;
    if start_char >= end_char {
        return Vec::new();
    }

    let slice: String = chars[start_char..end_char].iter().collect();
    let mut words: Vec<&str> = slice.split_whitespace().collect();

    // Character slicing usually cuts the boundary words in half.
    if words
        .first()
        .is_some_and(|w| w.chars().count() < config.min_boundary_word_len)
    {
        words.remove(0);
    }
    if words
        .last()
        .is_some_and(|w| w.chars().count() < config.min_boundary_word_len)
    {
        words.pop();
    }

    let clip_len = clip_end - clip_start;
    layout_words(&words, 0.0, clip_len, clip_len, config)
}

/// Sequentially lay out words from `offset`, spreading `target_duration`
/// across them by weight. Event ends are capped at `clip_len`.
fn layout_words(
    words: &[&str],
    offset: f64,
    target_duration: f64,
    clip_len: f64,
    config: &CaptionConfig,
) -> Vec<WordEvent> {
    if words.is_empty() || target_duration <= 0.0 {
        return Vec::new();
    }

    let weights: Vec<f64> = words.iter().map(|w| word_weight(w)).collect();
    let durations = allocate_durations(&weights, target_duration, config);

    let hook_by_position = words.len() > 3;
    let last = words.len() - 1;

    let mut events = Vec::with_capacity(words.len());
    let mut cursor = offset;

    for (i, (word, duration)) in words.iter().zip(durations).enumerate() {
        if cursor >= clip_len {
            break;
        }
        let end = (cursor + duration).min(clip_len);
        let is_hook = (hook_by_position && (i == 0 || i == last)) || is_hook_word(word);
        events.push(WordEvent::new(cursor, end, *word, is_hook));
        cursor += duration;
    }

    events
}

/// Split `total` seconds across words proportionally to weight, clamped to
/// the configured per-word bounds.
///
/// Clamping breaks the proportional sum, so the residual is redistributed
/// over unclamped words for a few passes. The sum equals `total` whenever
/// `n * min <= total <= n * max`; outside that range the bounds win.
fn allocate_durations(weights: &[f64], total: f64, config: &CaptionConfig) -> Vec<f64> {
    let weight_sum: f64 = weights.iter().sum();
    if weight_sum <= 0.0 {
        return vec![config.min_word_duration; weights.len()];
    }

    let mut durations: Vec<f64> = weights
        .iter()
        .map(|w| (w / weight_sum * total).clamp(config.min_word_duration, config.max_word_duration))
        .collect();

    for _ in 0..4 {
        let allocated: f64 = durations.iter().sum();
        let residual = total - allocated;
        if residual.abs() < 1e-9 {
            break;
        }

        let adjustable: Vec<usize> = durations
            .iter()
            .enumerate()
            .filter(|(_, d)| {
                if residual > 0.0 {
                    **d < config.max_word_duration
                } else {
                    **d > config.min_word_duration
                }
            })
            .map(|(i, _)| i)
            .collect();
        if adjustable.is_empty() {
            break;
        }

        let adjustable_weight: f64 = adjustable.iter().map(|&i| weights[i]).sum();
        for &i in &adjustable {
            let share = if adjustable_weight > 0.0 {
                weights[i] / adjustable_weight
            } else {
                1.0 / adjustable.len() as f64
            };
            durations[i] = (durations[i] + residual * share)
                .clamp(config.min_word_duration, config.max_word_duration);
        }
    }

    durations
}
