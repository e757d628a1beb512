//! The shared transcoding engine handle.
//!
//! The underlying engine is non-reentrant: concurrent invocation is
//! undefined behavior. The handle owns the engine and serializes every
//! call behind an async mutex, so there is exactly one acquisition point
//! and no module-level global.

use tokio::sync::Mutex;
use tracing::info;

use clipsmith_media::{
    check_ffmpeg, check_ffprobe, encode_with_fallback, EncodeOutcome, EncodeRequest, FfmpegEngine,
    MediaResult, TranscodeEngine,
};

use crate::cancel::CancelHandle;
use crate::error::{PipelineError, PipelineResult};

/// Owned handle to the batch's transcoding engine.
pub struct EngineHandle {
    engine: Mutex<Box<dyn TranscodeEngine>>,
}

impl EngineHandle {
    /// Initialize the production FFmpeg engine.
    ///
    /// Verifies the external binaries exist before any clip starts; a
    /// failure here is batch-fatal.
    pub fn initialize(cancel: &CancelHandle, encode_timeout_secs: u64) -> PipelineResult<Self> {
        let ffmpeg =
            check_ffmpeg().map_err(|e| PipelineError::engine_init(e.to_string()))?;
        check_ffprobe().map_err(|e| PipelineError::engine_init(e.to_string()))?;
        info!(ffmpeg = %ffmpeg.display(), "Transcoding engine initialized");

        let engine = FfmpegEngine::new()
            .with_cancel(cancel.subscribe())
            .with_timeout(encode_timeout_secs);

        Ok(Self::with_engine(Box::new(engine)))
    }

    /// Wrap an already-constructed engine (tests inject stubs here).
    pub fn with_engine(engine: Box<dyn TranscodeEngine>) -> Self {
        Self {
            engine: Mutex::new(engine),
        }
    }

    /// Run one tiered encode.
    ///
    /// The mutex is held across the whole fallback walk, so the engine
    /// never sees overlapping invocations.
    pub async fn encode(&self, request: &EncodeRequest) -> MediaResult<EncodeOutcome> {
        let engine = self.engine.lock().await;
        encode_with_fallback(engine.as_ref(), request).await
    }
}
