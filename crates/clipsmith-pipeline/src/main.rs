//! Batch clip generation binary.
//!
//! Usage: `clipsmith <video> <specs.json> [transcript]`
//!
//! The specs file holds a JSON array of clip specs. The transcript is
//! either a JSON array of segments or a `[HH:MM:SS] text` plain-text
//! file.

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use clipsmith_models::{transcript::parse_timestamped_transcript, ClipSpec, TranscriptSegment};
use clipsmith_pipeline::{ClipGenerator, LocalFileSource, PipelineConfig, SourceProvider};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("clipsmith=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(true))
            .with(env_filter)
            .init();
    }

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        bail!("usage: clipsmith <video> <specs.json> [transcript]");
    }

    let video_path = &args[1];
    let specs_raw = std::fs::read_to_string(&args[2])
        .with_context(|| format!("reading clip specs from {}", args[2]))?;
    let specs: Vec<ClipSpec> =
        serde_json::from_str(&specs_raw).context("parsing clip specs JSON")?;

    let config = PipelineConfig::from_env();
    info!(?config, "Starting clipsmith");

    let source = LocalFileSource::new(video_path.as_str());
    let meta = source.metadata().await.context("probing source video")?;

    let segments = match args.get(3) {
        Some(path) => load_transcript(path, meta.duration)?,
        None => Vec::new(),
    };

    let generator = ClipGenerator::new(config).context("initializing engines")?;

    let clips = generator
        .generate(
            &source,
            &specs,
            &segments,
            |percentage, message| println!("[{:5.1}%] {}", percentage, message),
            |clip, index, total| {
                println!(
                    "clip {}/{} ready: {} ({} bytes{})",
                    index + 1,
                    total,
                    clip.path.display(),
                    clip.size_bytes,
                    if clip.captions_applied {
                        ", captioned"
                    } else {
                        ""
                    }
                );
            },
        )
        .await?;

    if clips.is_empty() {
        bail!("no clips were produced");
    }

    info!(produced = clips.len(), "Done");
    Ok(())
}

/// Load a transcript from JSON segments or timestamped plain text.
fn load_transcript(path: &str, total_duration: f64) -> Result<Vec<TranscriptSegment>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading transcript from {}", path))?;

    if raw.trim_start().starts_with('[') && serde_json::from_str::<serde_json::Value>(&raw).is_ok()
    {
        return serde_json::from_str(&raw).context("parsing transcript JSON");
    }

    Ok(parse_timestamped_transcript(&raw, total_duration))
}
