//! Video encoding configuration and the fallback tier list.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default video codec (H.264)
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";
/// Default audio codec
pub const DEFAULT_AUDIO_CODEC: &str = "aac";
/// Default encoding preset
pub const DEFAULT_PRESET: &str = "fast";
/// Default CRF (Constant Rate Factor)
pub const DEFAULT_CRF: u8 = 21;
/// Default audio bitrate
pub const DEFAULT_AUDIO_BITRATE: &str = "128k";
/// Smallest output considered a real clip; anything below is garbage.
pub const DEFAULT_MIN_OUTPUT_BYTES: u64 = 1024;

/// Video encoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EncodingConfig {
    /// Video codec (e.g., "libx264")
    #[serde(default = "default_video_codec")]
    pub codec: String,

    /// Encoding preset (e.g., "fast", "medium", "slow")
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Constant Rate Factor (quality, 0-51, lower is better)
    #[serde(default = "default_crf")]
    pub crf: u8,

    /// Audio codec
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Audio bitrate
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,

    /// Outputs smaller than this are treated as encode failures
    #[serde(default = "default_min_output_bytes")]
    pub min_output_bytes: u64,
}

fn default_video_codec() -> String {
    DEFAULT_VIDEO_CODEC.to_string()
}
fn default_preset() -> String {
    DEFAULT_PRESET.to_string()
}
fn default_crf() -> u8 {
    DEFAULT_CRF
}
fn default_audio_codec() -> String {
    DEFAULT_AUDIO_CODEC.to_string()
}
fn default_audio_bitrate() -> String {
    DEFAULT_AUDIO_BITRATE.to_string()
}
fn default_min_output_bytes() -> u64 {
    DEFAULT_MIN_OUTPUT_BYTES
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            codec: DEFAULT_VIDEO_CODEC.to_string(),
            preset: DEFAULT_PRESET.to_string(),
            crf: DEFAULT_CRF,
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            audio_bitrate: DEFAULT_AUDIO_BITRATE.to_string(),
            min_output_bytes: DEFAULT_MIN_OUTPUT_BYTES,
        }
    }
}

impl EncodingConfig {
    /// Create a new encoding configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new config with updated CRF.
    pub fn with_crf(mut self, crf: u8) -> Self {
        self.crf = crf;
        self
    }
}

/// One tier of the encode fallback chain.
///
/// Tiers are walked strictly front-to-back; there is no retry of an earlier
/// tier and no backward transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EncodeTier {
    /// Crop + scale + caption burn-in, explicit video+audio stream mapping
    Full,
    /// Same filters, but let the engine auto-detect streams
    NoExplicitMap,
    /// Crop + scale only, auto streams, no captions
    NoCaptions,
}

impl EncodeTier {
    /// Human-readable tier name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::NoExplicitMap => "no_explicit_map",
            Self::NoCaptions => "no_captions",
        }
    }
}

impl std::fmt::Display for EncodeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A concrete encode attempt derived from a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EncodingAttempt {
    /// The tier this attempt belongs to
    pub tier: EncodeTier,
    /// Pass explicit `-map` arguments for video and audio streams
    pub explicit_mapping: bool,
    /// Burn the caption track into the video filter chain
    pub burn_captions: bool,
}

impl EncodingAttempt {
    /// The ordered fallback chain, most ambitious first.
    pub fn fallback_chain() -> [EncodingAttempt; 3] {
        [
            EncodingAttempt {
                tier: EncodeTier::Full,
                explicit_mapping: true,
                burn_captions: true,
            },
            EncodingAttempt {
                tier: EncodeTier::NoExplicitMap,
                explicit_mapping: false,
                burn_captions: true,
            },
            EncodingAttempt {
                tier: EncodeTier::NoCaptions,
                explicit_mapping: false,
                burn_captions: false,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EncodingConfig::default();
        assert_eq!(config.codec, "libx264");
        assert_eq!(config.crf, DEFAULT_CRF);
        assert_eq!(config.min_output_bytes, DEFAULT_MIN_OUTPUT_BYTES);
    }

    #[test]
    fn test_fallback_chain_order() {
        let chain = EncodingAttempt::fallback_chain();
        assert_eq!(chain[0].tier, EncodeTier::Full);
        assert!(chain[0].explicit_mapping && chain[0].burn_captions);
        assert_eq!(chain[1].tier, EncodeTier::NoExplicitMap);
        assert!(!chain[1].explicit_mapping && chain[1].burn_captions);
        assert_eq!(chain[2].tier, EncodeTier::NoCaptions);
        assert!(!chain[2].explicit_mapping && !chain[2].burn_captions);
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: EncodingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.preset, DEFAULT_PRESET);
        assert_eq!(config.audio_bitrate, DEFAULT_AUDIO_BITRATE);
    }
}
