//! Shared data models for the clipsmith pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Clip specifications and processed clip artifacts
//! - Transcript segments
//! - Subject positions and crop windows
//! - Word-level caption events
//! - Encoding configuration and the fallback tier list

pub mod captions;
pub mod clip;
pub mod encoding;
pub mod geometry;
pub mod timestamp;
pub mod transcript;

// Re-export common types
pub use captions::{CaptionTrack, WordEvent};
pub use clip::{ClipSpec, ProcessedClip};
pub use encoding::{EncodeTier, EncodingAttempt, EncodingConfig};
pub use geometry::{CropWindow, SubjectPosition};
pub use timestamp::{format_seconds, parse_timestamp, TimestampError};
pub use transcript::TranscriptSegment;
