//! Subject position estimation.
//!
//! Samples a handful of frames from an extracted clip segment, hands each
//! to the external face-detection model, and fuses the detections into a
//! single normalized subject coordinate. Detection is an enhancement, not
//! a requirement: every failure path degrades to `None`, which crop
//! planning treats as a center anchor.

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, warn};

use clipsmith_models::SubjectPosition;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;
use crate::filters::frame_sample_filter;

/// A face bounding box in normalized frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Left edge (0.0 = frame left, 1.0 = frame right)
    pub x: f64,
    /// Top edge (0.0 = frame top, 1.0 = frame bottom)
    pub y: f64,
    /// Width, normalized
    pub width: f64,
    /// Height, normalized
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box area, normalized.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Box center point.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// External face-detection model.
///
/// Implementations receive a downscaled square frame and return zero or
/// more normalized bounding boxes.
#[async_trait]
pub trait FaceDetector: Send + Sync {
    /// Detect faces in one sampled frame.
    async fn detect(&self, frame: &image::DynamicImage) -> MediaResult<Vec<BoundingBox>>;

    /// Detector name for logging.
    fn name(&self) -> &'static str;
}

/// Frame sampling and fusion parameters.
#[derive(Debug, Clone)]
pub struct SubjectConfig {
    /// Number of frames sampled evenly across the clip
    pub sample_count: u32,
    /// Square edge length frames are downscaled to before detection
    pub downscale_size: u32,
    /// Sampling start offset within the clip file. Always zero for an
    /// already-extracted segment; callers must not pass the source
    /// video's absolute offset.
    pub start_offset: f64,
}

impl Default for SubjectConfig {
    fn default() -> Self {
        Self {
            sample_count: 3,
            downscale_size: 224,
            start_offset: 0.0,
        }
    }
}

/// Estimate the subject position for a clip segment.
///
/// Returns `None` when no frame produced a detection or when the detector
/// itself is unavailable; the video file is never modified.
pub async fn estimate_subject(
    video: &Path,
    clip_duration: f64,
    config: &SubjectConfig,
    detector: &dyn FaceDetector,
) -> Option<SubjectPosition> {
    if config.sample_count == 0 || clip_duration <= 0.0 {
        return None;
    }

    let scratch = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(e) => {
            warn!(error = %e, "Could not create frame scratch dir, skipping detection");
            return None;
        }
    };

    let step = clip_duration / config.sample_count as f64;
    let mut frame_detections: Vec<Vec<BoundingBox>> = Vec::new();

    for i in 0..config.sample_count {
        let at = config.start_offset + step * i as f64;
        let frame_path = scratch.path().join(format!("frame_{:02}.png", i));

        let frame = match sample_frame(video, &frame_path, at, config.downscale_size).await {
            Ok(frame) => frame,
            Err(e) => {
                debug!(at, error = %e, "Frame sample failed, skipping");
                continue;
            }
        };

        match detector.detect(&frame).await {
            Ok(boxes) => frame_detections.push(boxes),
            Err(e) => {
                // Detector trouble is non-fatal; center crop still works.
                warn!(detector = detector.name(), error = %e, "Face detection failed for frame");
            }
        }
    }

    let position = fuse_detections(&frame_detections);
    debug!(
        detector = detector.name(),
        frames = frame_detections.len(),
        position = ?position,
        "Subject estimation complete"
    );
    position
}

/// Extract one downscaled frame at `at` seconds into the clip file.
async fn sample_frame(
    video: &Path,
    frame_path: &Path,
    at: f64,
    downscale_size: u32,
) -> MediaResult<image::DynamicImage> {
    let cmd = FfmpegCommand::new(video, frame_path)
        .seek(at)
        .single_frame()
        .video_filter(frame_sample_filter(downscale_size));

    FfmpegRunner::new().run(&cmd).await?;

    image::open(frame_path)
        .map_err(|e| crate::error::MediaError::detection_failed(format!("frame decode: {}", e)))
}

/// Fuse per-frame detections into one subject position.
///
/// Per frame, the largest box wins (the main subject is assumed to be the
/// largest visible face). The result is the arithmetic mean of the
/// surviving centers, or `None` when no frame had a detection.
pub fn fuse_detections(frames: &[Vec<BoundingBox>]) -> Option<SubjectPosition> {
    let centers: Vec<(f64, f64)> = frames
        .iter()
        .filter_map(|boxes| largest_box(boxes).map(|b| b.center()))
        .collect();

    if centers.is_empty() {
        return None;
    }

    let n = centers.len() as f64;
    let x = centers.iter().map(|(x, _)| x).sum::<f64>() / n;
    let y = centers.iter().map(|(_, y)| y).sum::<f64>() / n;

    Some(SubjectPosition::new(x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)))
}

/// The largest-area box in one frame's detections.
fn largest_box(boxes: &[BoundingBox]) -> Option<&BoundingBox> {
    boxes
        .iter()
        .max_by(|a, b| a.area().total_cmp(&b.area()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_largest_box_selection() {
        let boxes = vec![
            BoundingBox::new(0.1, 0.1, 0.1, 0.1),
            BoundingBox::new(0.5, 0.5, 0.3, 0.3),
            BoundingBox::new(0.0, 0.0, 0.2, 0.1),
        ];

        let (cx, cy) = largest_box(&boxes).unwrap().center();
        assert!((cx - 0.65).abs() < 1e-9);
        assert!((cy - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_fuse_averages_largest_centers() {
        let frames = vec![
            // Largest box centered at (0.3, 0.4)
            vec![
                BoundingBox::new(0.2, 0.3, 0.2, 0.2),
                BoundingBox::new(0.8, 0.8, 0.05, 0.05),
            ],
            // No detection this frame: skipped, not zeroed
            vec![],
            // Single box centered at (0.5, 0.6)
            vec![BoundingBox::new(0.4, 0.5, 0.2, 0.2)],
        ];

        let position = fuse_detections(&frames).unwrap();
        assert!((position.x - 0.4).abs() < 1e-9);
        assert!((position.y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_fuse_with_no_detections() {
        assert!(fuse_detections(&[]).is_none());
        assert!(fuse_detections(&[vec![], vec![]]).is_none());
    }

    #[test]
    fn test_fused_position_is_clamped() {
        // A box hanging past the frame edge still yields a valid position
        let frames = vec![vec![BoundingBox::new(0.9, 0.9, 0.4, 0.4)]];
        let position = fuse_detections(&frames).unwrap();
        assert!(position.is_valid());
    }
}
