//! Crop geometry planning.
//!
//! Pure math: given source dimensions, a target aspect ratio, and an
//! optional subject position, compute the largest source-space rectangle
//! with the target aspect ratio, anchored on the subject and clamped to
//! the frame.

use clipsmith_models::{CropWindow, SubjectPosition};

/// Compute the crop window for a target output size.
///
/// The window has the target aspect ratio (within even-dimension rounding),
/// is centered on `subject` when one was detected and on the frame center
/// otherwise, and always lies fully inside the source frame.
pub fn plan_crop(
    source_width: u32,
    source_height: u32,
    target_width: u32,
    target_height: u32,
    subject: Option<SubjectPosition>,
) -> CropWindow {
    let source_w = source_width as f64;
    let source_h = source_height as f64;

    // Largest target-shaped rectangle that fits the source.
    let scale = (source_w / target_width as f64).min(source_h / target_height as f64);
    let crop_w = target_width as f64 * scale;
    let crop_h = target_height as f64 * scale;

    let center = subject.unwrap_or_else(SubjectPosition::center);

    // Rounding can leave the slack epsilon-negative when the crop spans
    // the full frame; clamp bounds must stay ordered.
    let slack_x = (source_w - crop_w).max(0.0);
    let slack_y = (source_h - crop_h).max(0.0);
    let sx = (center.x * source_w - crop_w / 2.0).clamp(0.0, slack_x);
    let sy = (center.y * source_h - crop_h / 2.0).clamp(0.0, slack_y);

    // Even dimensions are required by most encoders.
    let sw = round_even(crop_w).min(source_width & !1).max(2);
    let sh = round_even(crop_h).min(source_height & !1).max(2);

    let sx = (sx.floor() as u32).min(source_width - sw);
    let sy = (sy.floor() as u32).min(source_height - sh);

    CropWindow::new(sx, sy, sw, sh)
}

/// Round to the nearest even integer.
fn round_even(value: f64) -> u32 {
    ((value / 2.0).round() as u32) * 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_crop_landscape_to_portrait() {
        let crop = plan_crop(1920, 1080, 720, 1280, None);

        assert_eq!(crop.sy, 0);
        assert_eq!(crop.sh, 1080);
        assert_eq!(crop.sw, 608);
        assert_eq!(crop.sx, 656);
        assert!(crop.fits_within(1920, 1080));

        // 9:16 within rounding
        let ratio = crop.sw as f64 / crop.sh as f64;
        assert!((ratio - 720.0 / 1280.0).abs() < 0.01);
    }

    #[test]
    fn test_subject_shifts_crop() {
        let left = plan_crop(1920, 1080, 720, 1280, Some(SubjectPosition::new(0.2, 0.5)));
        let right = plan_crop(1920, 1080, 720, 1280, Some(SubjectPosition::new(0.8, 0.5)));

        assert!(left.sx < right.sx);
        assert!(left.fits_within(1920, 1080));
        assert!(right.fits_within(1920, 1080));
    }

    #[test]
    fn test_extreme_subjects_stay_contained() {
        let corners = [
            (0.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
            (1.0, 1.0),
            (0.5, 0.5),
        ];

        for (x, y) in corners {
            let crop = plan_crop(1920, 1080, 720, 1280, Some(SubjectPosition::new(x, y)));
            assert!(
                crop.fits_within(1920, 1080),
                "subject ({}, {}) produced out-of-frame crop {:?}",
                x,
                y,
                crop
            );
        }
    }

    #[test]
    fn test_subject_at_left_edge_clamps_to_zero() {
        let crop = plan_crop(1920, 1080, 720, 1280, Some(SubjectPosition::new(0.0, 0.5)));
        assert_eq!(crop.sx, 0);
    }

    #[test]
    fn test_wide_target_from_portrait_source() {
        let crop = plan_crop(1080, 1920, 1280, 720, None);

        assert_eq!(crop.sx, 0);
        assert_eq!(crop.sw, 1080);
        assert!(crop.fits_within(1080, 1920));

        let ratio = crop.sw as f64 / crop.sh as f64;
        assert!((ratio - 1280.0 / 720.0).abs() < 0.01);
    }

    #[test]
    fn test_same_aspect_uses_full_frame() {
        let crop = plan_crop(1920, 1080, 1920, 1080, None);
        assert_eq!(crop, CropWindow::new(0, 0, 1920, 1080));
    }

    #[test]
    fn test_odd_source_dimensions() {
        let crop = plan_crop(1919, 1079, 720, 1280, None);
        assert!(crop.fits_within(1919, 1079));
        assert_eq!(crop.sw % 2, 0);
        assert_eq!(crop.sh % 2, 0);
    }
}
