//! Tiered fallback encoding.
//!
//! The transcoding engine is driven through an ordered list of
//! decreasingly ambitious attempts (explicit stream mapping + captions →
//! auto streams + captions → crop/scale only) so that a clip is always
//! produced when the engine can produce anything at all. The walk is
//! strictly forward: a failed tier is never retried.

use std::path::PathBuf;

use async_trait::async_trait;
use metrics::counter;
use tokio::sync::watch;
use tracing::{info, warn};

use clipsmith_models::{
    CaptionTrack, CropWindow, EncodeTier, EncodingAttempt, EncodingConfig,
};

use crate::captions::ass;
use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::filters::{crop_scale_filter, with_subtitles};

/// Everything one clip encode needs.
#[derive(Debug, Clone)]
pub struct EncodeRequest {
    /// Clip-local input segment
    pub input: PathBuf,
    /// Final output path
    pub output: PathBuf,
    /// Planned crop window in input-frame space
    pub crop: CropWindow,
    /// Output width in pixels
    pub target_width: u32,
    /// Output height in pixels
    pub target_height: u32,
    /// Caption track; an empty track encodes without captions at every tier
    pub captions: CaptionTrack,
    /// Clip duration in seconds
    pub duration: f64,
    /// Encoder settings
    pub encoding: EncodingConfig,
}

/// Result of a successful tiered encode.
#[derive(Debug, Clone)]
pub struct EncodeOutcome {
    /// The tier that produced the output
    pub tier: EncodeTier,
    /// Whether captions were burned in
    pub captions_applied: bool,
    /// Output size in bytes
    pub size_bytes: u64,
}

/// External transcoding engine.
///
/// The engine writes `request.output` (or fails). Implementations must be
/// deterministic per attempt so the fallback walk stays testable with
/// injected stubs.
#[async_trait]
pub trait TranscodeEngine: Send + Sync {
    /// Run one encode attempt.
    async fn transcode(&self, request: &EncodeRequest, attempt: &EncodingAttempt)
        -> MediaResult<()>;

    /// Engine name for logging.
    fn name(&self) -> &'static str;
}

/// Walk the fallback chain until a tier produces a valid output.
///
/// A tier fails when the engine errors *or* when it "succeeds" but the
/// output is missing or implausibly small; both advance to the next tier
/// after discarding the partial output. Exhausting the chain is a per-clip
/// fatal error, never a batch-level one.
pub async fn encode_with_fallback(
    engine: &dyn TranscodeEngine,
    request: &EncodeRequest,
) -> MediaResult<EncodeOutcome> {
    let chain = EncodingAttempt::fallback_chain();

    for attempt in &chain {
        counter!("clipsmith_encode_attempts_total", "tier" => attempt.tier.name()).increment(1);

        let result = engine.transcode(request, attempt).await;

        match result {
            Ok(()) => match validate_output(request).await {
                Ok(size_bytes) => {
                    let captions_applied = attempt.burn_captions && !request.captions.is_empty();
                    info!(
                        engine = engine.name(),
                        tier = %attempt.tier,
                        size_bytes,
                        captions_applied,
                        "Encode succeeded"
                    );
                    return Ok(EncodeOutcome {
                        tier: attempt.tier,
                        captions_applied,
                        size_bytes,
                    });
                }
                Err(e) => {
                    warn!(tier = %attempt.tier, error = %e, "Encode output rejected, falling back");
                    discard_partial_output(request).await;
                }
            },
            Err(e) => {
                warn!(tier = %attempt.tier, error = %e, "Encode attempt failed, falling back");
                discard_partial_output(request).await;
            }
        }

        counter!("clipsmith_encode_fallbacks_total", "tier" => attempt.tier.name()).increment(1);
    }

    counter!("clipsmith_encode_exhausted_total").increment(1);
    Err(MediaError::EncodeExhausted {
        attempts: chain.len(),
    })
}

/// Validate the artifact a tier claims to have produced.
///
/// A successful return with a missing or undersized file is treated
/// identically to a thrown error.
async fn validate_output(request: &EncodeRequest) -> MediaResult<u64> {
    let meta = tokio::fs::metadata(&request.output)
        .await
        .map_err(|_| MediaError::internal("output missing"))?;

    let size = meta.len();
    if size < request.encoding.min_output_bytes {
        return Err(MediaError::internal(format!(
            "output undersized: {} bytes (minimum {})",
            size, request.encoding.min_output_bytes
        )));
    }

    Ok(size)
}

async fn discard_partial_output(request: &EncodeRequest) {
    if tokio::fs::remove_file(&request.output).await.is_ok() {
        warn!(path = %request.output.display(), "Discarded partial encode output");
    }
}

/// FFmpeg-backed transcoding engine.
pub struct FfmpegEngine {
    /// Cancellation signal receiver passed through to each run
    cancel_rx: Option<watch::Receiver<bool>>,
    /// Per-invocation timeout in seconds
    timeout_secs: Option<u64>,
}

impl Default for FfmpegEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegEngine {
    /// Create a new engine.
    pub fn new() -> Self {
        Self {
            cancel_rx: None,
            timeout_secs: None,
        }
    }

    /// Set the cancellation signal.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    /// Set a per-invocation timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    fn runner(&self) -> FfmpegRunner {
        let mut runner = FfmpegRunner::new();
        if let Some(rx) = &self.cancel_rx {
            runner = runner.with_cancel(rx.clone());
        }
        if let Some(secs) = self.timeout_secs {
            runner = runner.with_timeout(secs);
        }
        runner
    }
}

#[async_trait]
impl TranscodeEngine for FfmpegEngine {
    async fn transcode(
        &self,
        request: &EncodeRequest,
        attempt: &EncodingAttempt,
    ) -> MediaResult<()> {
        let mut filter = crop_scale_filter(&request.crop, request.target_width, request.target_height);

        if attempt.burn_captions && !request.captions.is_empty() {
            let ass_path = request.output.with_extension("ass");
            ass::write_track(
                &request.captions,
                &ass_path,
                request.target_width,
                request.target_height,
            )
            .await?;
            filter = with_subtitles(&filter, &ass_path);
        }

        let mut cmd = FfmpegCommand::new(&request.input, &request.output)
            .duration(request.duration)
            .video_filter(filter)
            .video_codec(&request.encoding.codec)
            .preset(&request.encoding.preset)
            .crf(request.encoding.crf)
            .audio_codec(&request.encoding.audio_codec)
            .audio_bitrate(&request.encoding.audio_bitrate);

        if attempt.explicit_mapping {
            cmd = cmd.map_stream("0:v:0").map_stream("0:a:0");
        }

        self.runner().run(&cmd).await
    }

    fn name(&self) -> &'static str {
        "ffmpeg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use clipsmith_models::WordEvent;

    /// Stub engine that fails a fixed number of leading attempts, then
    /// writes `payload` bytes to the output.
    struct TieredStub {
        fail_first: usize,
        payload: usize,
        calls: AtomicUsize,
        seen: std::sync::Mutex<Vec<EncodingAttempt>>,
    }

    impl TieredStub {
        fn new(fail_first: usize, payload: usize) -> Self {
            Self {
                fail_first,
                payload,
                calls: AtomicUsize::new(0),
                seen: std::sync::Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TranscodeEngine for TieredStub {
        async fn transcode(
            &self,
            request: &EncodeRequest,
            attempt: &EncodingAttempt,
        ) -> MediaResult<()> {
            self.seen.lock().unwrap().push(*attempt);
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first {
                return Err(MediaError::ffmpeg_failed("stub failure", None, Some(1)));
            }
            tokio::fs::write(&request.output, vec![0u8; self.payload]).await?;
            Ok(())
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    fn request_in(dir: &tempfile::TempDir) -> EncodeRequest {
        EncodeRequest {
            input: dir.path().join("segment.mp4"),
            output: dir.path().join("clip.mp4"),
            crop: CropWindow::new(656, 0, 608, 1080),
            target_width: 720,
            target_height: 1280,
            captions: CaptionTrack {
                events: vec![WordEvent::new(0.0, 0.5, "hello", false)],
            },
            duration: 30.0,
            encoding: EncodingConfig::default(),
        }
    }

    #[tokio::test]
    async fn test_first_tier_success() {
        let dir = tempfile::tempdir().unwrap();
        let request = request_in(&dir);
        let engine = TieredStub::new(0, 4096);

        let outcome = encode_with_fallback(&engine, &request).await.unwrap();

        assert_eq!(outcome.tier, EncodeTier::Full);
        assert!(outcome.captions_applied);
        assert_eq!(outcome.size_bytes, 4096);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fallback_determinism() {
        // Tiers 1-2 fail, tier 3 succeeds: output is tier 3's, captions off
        let dir = tempfile::tempdir().unwrap();
        let request = request_in(&dir);
        let engine = TieredStub::new(2, 4096);

        let outcome = encode_with_fallback(&engine, &request).await.unwrap();

        assert_eq!(outcome.tier, EncodeTier::NoCaptions);
        assert!(!outcome.captions_applied);

        let seen = engine.seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen[0].explicit_mapping && seen[0].burn_captions);
        assert!(!seen[1].explicit_mapping && seen[1].burn_captions);
        assert!(!seen[2].explicit_mapping && !seen[2].burn_captions);
    }

    #[tokio::test]
    async fn test_undersized_output_triggers_fallback() {
        // The stub "succeeds" every time but writes garbage-sized output
        // on the first call only; validation must not trust it.
        struct GarbageThenGood {
            calls: AtomicUsize,
        }

        #[async_trait]
        impl TranscodeEngine for GarbageThenGood {
            async fn transcode(
                &self,
                request: &EncodeRequest,
                _attempt: &EncodingAttempt,
            ) -> MediaResult<()> {
                let call = self.calls.fetch_add(1, Ordering::SeqCst);
                let size = if call == 0 { 16 } else { 8192 };
                tokio::fs::write(&request.output, vec![0u8; size]).await?;
                Ok(())
            }

            fn name(&self) -> &'static str {
                "garbage-then-good"
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let request = request_in(&dir);
        let engine = GarbageThenGood {
            calls: AtomicUsize::new(0),
        };

        let outcome = encode_with_fallback(&engine, &request).await.unwrap();

        assert_eq!(outcome.tier, EncodeTier::NoExplicitMap);
        assert_eq!(outcome.size_bytes, 8192);
    }

    #[tokio::test]
    async fn test_exhaustion_is_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let request = request_in(&dir);
        let engine = TieredStub::new(usize::MAX, 0);

        let err = encode_with_fallback(&engine, &request).await.unwrap_err();

        assert!(matches!(
            err,
            MediaError::EncodeExhausted { attempts: 3 }
        ));
        // Forward-only: exactly one invocation per tier
        assert_eq!(engine.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_empty_captions_never_marked_applied() {
        let dir = tempfile::tempdir().unwrap();
        let mut request = request_in(&dir);
        request.captions = CaptionTrack::empty();
        let engine = TieredStub::new(0, 4096);

        let outcome = encode_with_fallback(&engine, &request).await.unwrap();

        assert_eq!(outcome.tier, EncodeTier::Full);
        assert!(!outcome.captions_applied);
    }
}
