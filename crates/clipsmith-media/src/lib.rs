#![deny(unreachable_patterns)]
//! Media computation for clipsmith.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building and running
//! - Progress parsing from `-progress pipe:2`
//! - Video probing and stream-copy segment extraction
//! - Pure crop geometry planning
//! - Subject position estimation behind a face-detector trait
//! - Caption timing synthesis and ASS rendering
//! - The tiered fallback encoder

pub mod captions;
pub mod command;
pub mod crop;
pub mod encode;
pub mod error;
pub mod filters;
pub mod probe;
pub mod progress;
pub mod segment;
pub mod subject;

pub use captions::{synthesize, CaptionConfig};
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use crop::plan_crop;
pub use encode::{
    encode_with_fallback, EncodeOutcome, EncodeRequest, FfmpegEngine, TranscodeEngine,
};
pub use error::{MediaError, MediaResult};
pub use probe::{get_duration, probe_video, VideoInfo};
pub use progress::FfmpegProgress;
pub use segment::extract_segment;
pub use subject::{estimate_subject, BoundingBox, FaceDetector, SubjectConfig};
