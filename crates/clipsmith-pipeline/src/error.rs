//! Pipeline error types.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Engine initialization failed: {0}")]
    EngineInit(String),

    #[error("Source load failed: {0}")]
    SourceLoad(String),

    #[error("Batch cancelled")]
    Cancelled,

    #[error("Media error: {0}")]
    Media(#[from] clipsmith_media::MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn engine_init(msg: impl Into<String>) -> Self {
        Self::EngineInit(msg.into())
    }

    pub fn source_load(msg: impl Into<String>) -> Self {
        Self::SourceLoad(msg.into())
    }

    /// Whether this error aborts the whole batch.
    ///
    /// Everything below batch granularity is converted into a
    /// skip-and-continue outcome; only initialization-time failures and
    /// cancellation stop the run.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, Self::EngineInit(_) | Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_fatality() {
        assert!(PipelineError::engine_init("ffmpeg missing").is_batch_fatal());
        assert!(PipelineError::Cancelled.is_batch_fatal());
        assert!(!PipelineError::source_load("segment").is_batch_fatal());
        assert!(!PipelineError::Media(clipsmith_media::MediaError::EncodeExhausted {
            attempts: 3
        })
        .is_batch_fatal());
    }
}
