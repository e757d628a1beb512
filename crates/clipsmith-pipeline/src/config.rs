//! Pipeline configuration.

use std::path::PathBuf;

use clipsmith_media::{CaptionConfig, SubjectConfig};
use clipsmith_models::EncodingConfig;

/// Batch generator configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Output width in pixels
    pub target_width: u32,
    /// Output height in pixels
    pub target_height: u32,
    /// Sources shorter than this (seconds) get exactly one clip
    pub short_video_threshold: f64,
    /// Maximum clips per batch for longer sources
    pub max_clips: usize,
    /// Per-invocation transcoder timeout in seconds
    pub encode_timeout_secs: u64,
    /// Directory encoded clips are written to
    pub output_dir: PathBuf,
    /// Caption synthesis parameters
    pub captions: CaptionConfig,
    /// Subject estimation parameters
    pub subject: SubjectConfig,
    /// Encoder settings
    pub encoding: EncodingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_width: 720,
            target_height: 1280,
            short_video_threshold: 60.0,
            max_clips: 5,
            encode_timeout_secs: 600,
            output_dir: PathBuf::from("/tmp/clipsmith"),
            captions: CaptionConfig::default(),
            subject: SubjectConfig::default(),
            encoding: EncodingConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            target_width: env_parse("CLIPSMITH_TARGET_WIDTH", defaults.target_width),
            target_height: env_parse("CLIPSMITH_TARGET_HEIGHT", defaults.target_height),
            short_video_threshold: env_parse(
                "CLIPSMITH_SHORT_VIDEO_SECS",
                defaults.short_video_threshold,
            ),
            max_clips: env_parse("CLIPSMITH_MAX_CLIPS", defaults.max_clips),
            encode_timeout_secs: env_parse(
                "CLIPSMITH_ENCODE_TIMEOUT_SECS",
                defaults.encode_timeout_secs,
            ),
            output_dir: std::env::var("CLIPSMITH_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            captions: CaptionConfig {
                large_segment_threshold: env_parse(
                    "CLIPSMITH_LARGE_SEGMENT_SECS",
                    defaults.captions.large_segment_threshold,
                ),
                ..defaults.captions
            },
            subject: SubjectConfig {
                sample_count: env_parse("CLIPSMITH_SAMPLE_COUNT", defaults.subject.sample_count),
                downscale_size: env_parse(
                    "CLIPSMITH_DOWNSCALE_SIZE",
                    defaults.subject.downscale_size,
                ),
                ..defaults.subject
            },
            encoding: EncodingConfig {
                crf: env_parse("CLIPSMITH_CRF", defaults.encoding.crf),
                ..defaults.encoding
            },
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.target_width, 720);
        assert_eq!(config.target_height, 1280);
        assert_eq!(config.max_clips, 5);
        assert_eq!(config.short_video_threshold, 60.0);
        assert_eq!(config.captions.large_segment_threshold, 120.0);
        assert_eq!(config.subject.sample_count, 3);
    }
}
