//! Source video access.
//!
//! The stream source is an external collaborator: given a clip window it
//! materializes a seekable local segment plus source metadata. The local
//! file implementation wraps FFprobe and stream-copy extraction; tests
//! substitute stubs.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use clipsmith_media::{extract_segment, probe_video};

use crate::error::{PipelineError, PipelineResult};

/// Source dimensions and duration.
#[derive(Debug, Clone, Copy)]
pub struct SourceMetadata {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Total duration in seconds
    pub duration: f64,
}

/// Provider of source video data.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Source metadata (drives the clip count policy and crop planning).
    async fn metadata(&self) -> PipelineResult<SourceMetadata>;

    /// Materialize the `[start, end)` range of the source as a clip-local
    /// file at `dest`.
    async fn fetch_segment(&self, start: f64, end: f64, dest: &Path) -> PipelineResult<()>;
}

/// Source provider backed by a local video file.
pub struct LocalFileSource {
    path: PathBuf,
}

impl LocalFileSource {
    /// Create a provider for a local file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SourceProvider for LocalFileSource {
    async fn metadata(&self) -> PipelineResult<SourceMetadata> {
        let info = probe_video(&self.path)
            .await
            .map_err(|e| PipelineError::source_load(e.to_string()))?;
        Ok(SourceMetadata {
            width: info.width,
            height: info.height,
            duration: info.duration,
        })
    }

    async fn fetch_segment(&self, start: f64, end: f64, dest: &Path) -> PipelineResult<()> {
        extract_segment(self.path.as_path(), dest, start, (end - start).max(0.0))
            .await
            .map_err(|e| PipelineError::source_load(e.to_string()))
    }
}
