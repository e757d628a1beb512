//! Batch clip generation.
//!
//! Runs Face Estimator → Crop Planner → Caption Synthesizer → tiered
//! encoder for each clip spec, strictly sequentially. Per-clip failures
//! are isolated: the clip is skipped, reported, and the batch continues.

use std::sync::Arc;

use metrics::counter;
use tracing::{error, info, warn};
use uuid::Uuid;

use clipsmith_media::{
    estimate_subject, plan_crop, synthesize, EncodeRequest, FaceDetector,
};
use clipsmith_models::{ClipSpec, ProcessedClip, TranscriptSegment};

use crate::cancel::CancelHandle;
use crate::config::PipelineConfig;
use crate::engine::EngineHandle;
use crate::error::{PipelineError, PipelineResult};
use crate::progress::{
    BatchProgress, STAGE_CAPTIONS, STAGE_DONE, STAGE_ENCODE, STAGE_EXTRACT, STAGE_SUBJECT,
};
use crate::source::SourceProvider;

/// Batch clip generator.
///
/// Owns the engine handle and the detector for the lifetime of the batch;
/// both are passed down explicitly, never reached through globals.
pub struct ClipGenerator {
    config: PipelineConfig,
    engine: EngineHandle,
    detector: Option<Arc<dyn FaceDetector>>,
    cancel: CancelHandle,
}

impl ClipGenerator {
    /// Create a generator with the production FFmpeg engine.
    ///
    /// Fails with an engine-init error when the external binaries are
    /// missing; nothing in the batch can proceed without them.
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        let cancel = CancelHandle::new();
        let engine = EngineHandle::initialize(&cancel, config.encode_timeout_secs)?;
        Ok(Self {
            config,
            engine,
            detector: None,
            cancel,
        })
    }

    /// Create a generator from pre-built parts (tests inject stubs here).
    pub fn with_parts(
        config: PipelineConfig,
        engine: EngineHandle,
        detector: Option<Arc<dyn FaceDetector>>,
    ) -> Self {
        Self {
            config,
            engine,
            detector,
            cancel: CancelHandle::new(),
        }
    }

    /// Attach a face detector.
    pub fn with_detector(mut self, detector: Arc<dyn FaceDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Handle callers use to cancel the batch.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// How many clips to produce for a source of `duration` seconds.
    ///
    /// Short sources get exactly one clip from the first suggestion;
    /// longer sources get up to `max_clips`, capped by what the analyzer
    /// supplied.
    fn clip_count(&self, duration: f64, available: usize) -> usize {
        if available == 0 {
            return 0;
        }
        if duration < self.config.short_video_threshold {
            1
        } else {
            available.min(self.config.max_clips)
        }
    }

    /// Generate clips for every selected spec.
    ///
    /// Returns however many clips succeeded; a partial batch is success,
    /// not an error. `progress` receives `(percentage, message)` updates
    /// and `clip_ready` fires once per finished clip, immediately.
    pub async fn generate<F, G>(
        &self,
        source: &dyn SourceProvider,
        specs: &[ClipSpec],
        segments: &[TranscriptSegment],
        progress: F,
        clip_ready: G,
    ) -> PipelineResult<Vec<ProcessedClip>>
    where
        F: Fn(f64, &str),
        G: Fn(&ProcessedClip, usize, usize),
    {
        let batch_id = Uuid::new_v4();
        let meta = source.metadata().await?;
        let total = self.clip_count(meta.duration, specs.len());

        info!(
            %batch_id,
            source_duration = meta.duration,
            requested = specs.len(),
            producing = total,
            "Starting clip batch"
        );

        tokio::fs::create_dir_all(&self.config.output_dir).await?;

        let batch = BatchProgress::new(total);
        let mut clips = Vec::new();

        for (index, spec) in specs[..total].iter().enumerate() {
            if self.cancel.is_cancelled() {
                info!(%batch_id, completed = clips.len(), "Batch cancelled before next clip");
                break;
            }

            progress(
                batch.percentage(index, 0.0),
                &format!("Processing clip {} of {}: {}", index + 1, total, spec.title),
            );

            let report = |stage: f64, message: &str| {
                progress(batch.percentage(index, stage), message);
            };

            match self.process_clip(source, spec, segments, &meta, &report).await {
                Ok(clip) => {
                    counter!("clipsmith_clips_completed_total").increment(1);
                    report(STAGE_DONE, &format!("Clip {} ready", spec.clip_number));
                    clip_ready(&clip, index, total);
                    clips.push(clip);
                }
                Err(e) if e.is_batch_fatal() => return Err(e),
                Err(e) => {
                    counter!("clipsmith_clips_failed_total").increment(1);
                    error!(%batch_id, clip = spec.clip_number, error = %e, "Clip failed, continuing batch");
                    report(
                        STAGE_DONE,
                        &format!("Clip {} failed: {}", spec.clip_number, e),
                    );
                }
            }
        }

        progress(
            100.0,
            &format!("Generated {} of {} clips", clips.len(), total),
        );
        info!(%batch_id, succeeded = clips.len(), requested = total, "Batch complete");

        Ok(clips)
    }

    /// Run the full pipeline for one clip.
    async fn process_clip(
        &self,
        source: &dyn SourceProvider,
        spec: &ClipSpec,
        segments: &[TranscriptSegment],
        meta: &crate::source::SourceMetadata,
        report: &dyn Fn(f64, &str),
    ) -> PipelineResult<ProcessedClip> {
        if !spec.is_valid() {
            return Err(PipelineError::source_load(format!(
                "invalid clip window {:.2}..{:.2}",
                spec.start_time, spec.end_time
            )));
        }

        // Scratch files live exactly as long as this clip's run.
        let scratch = tempfile::tempdir()?;
        let segment_path = scratch.path().join(format!("segment_{:02}.mp4", spec.clip_number));

        report(STAGE_EXTRACT, "Extracting segment");
        source
            .fetch_segment(spec.start_time, spec.end_time, &segment_path)
            .await?;

        report(STAGE_SUBJECT, "Estimating subject position");
        let subject = match &self.detector {
            Some(detector) => {
                estimate_subject(
                    &segment_path,
                    spec.duration(),
                    &self.config.subject,
                    detector.as_ref(),
                )
                .await
            }
            None => None,
        };

        let crop = plan_crop(
            meta.width,
            meta.height,
            self.config.target_width,
            self.config.target_height,
            subject,
        );

        report(STAGE_CAPTIONS, "Synthesizing captions");
        let captions = synthesize(
            segments,
            spec.start_time,
            spec.end_time,
            &self.config.captions,
        );
        if captions.is_empty() {
            warn!(clip = spec.clip_number, "No usable transcript text, encoding without captions");
        }

        report(STAGE_ENCODE, "Encoding");
        let output = self
            .config
            .output_dir
            .join(format!("clip_{:02}.mp4", spec.clip_number));
        let request = EncodeRequest {
            input: segment_path,
            output: output.clone(),
            crop,
            target_width: self.config.target_width,
            target_height: self.config.target_height,
            captions,
            duration: spec.duration(),
            encoding: self.config.encoding.clone(),
        };

        let outcome = self.engine.encode(&request).await?;

        Ok(ProcessedClip {
            spec: spec.clone(),
            path: output,
            size_bytes: outcome.size_bytes,
            ready: true,
            captions_applied: outcome.captions_applied,
            created_at: chrono::Utc::now(),
        })
    }
}
