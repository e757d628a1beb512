//! Source segment extraction.

use std::path::Path;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Extract a time range from a video file without re-encoding.
///
/// The per-clip pipeline cuts the clip window out of the source first so
/// that subject estimation and encoding work on a short, clip-local file.
pub async fn extract_segment<P: AsRef<Path>>(
    input: P,
    output: P,
    start_secs: f64,
    duration: f64,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    info!(
        "Extracting segment: {} -> {} (start: {:.2}s, duration: {:.2}s)",
        input.display(),
        output.display(),
        start_secs,
        duration
    );

    let cmd = FfmpegCommand::new(input, output)
        .seek(start_secs)
        .duration(duration)
        .codec_copy();

    FfmpegRunner::new().run(&cmd).await?;

    // Stream copy can succeed while writing nothing if the seek landed
    // past the end of the source.
    let meta = tokio::fs::metadata(output)
        .await
        .map_err(|_| MediaError::InvalidVideo(format!("segment missing: {}", output.display())))?;
    if meta.len() == 0 {
        return Err(MediaError::InvalidVideo(format!(
            "segment empty: {}",
            output.display()
        )));
    }

    Ok(())
}
