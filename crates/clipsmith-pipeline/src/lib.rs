//! Batch clip generation orchestrator.
//!
//! Sequences subject estimation, crop planning, caption synthesis, and
//! tiered encoding across a batch of clip specs with per-clip failure
//! isolation, progress reporting, and batch-granular cancellation.

pub mod cancel;
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod progress;
pub mod source;

pub use cancel::CancelHandle;
pub use config::PipelineConfig;
pub use engine::EngineHandle;
pub use error::{PipelineError, PipelineResult};
pub use generator::ClipGenerator;
pub use progress::BatchProgress;
pub use source::{LocalFileSource, SourceMetadata, SourceProvider};
