//! FFmpeg video filter construction.

use std::path::Path;

use clipsmith_models::CropWindow;

/// Build the crop + scale chain for a planned crop window.
pub fn crop_scale_filter(crop: &CropWindow, target_width: u32, target_height: u32) -> String {
    format!(
        "crop={}:{}:{}:{},scale={}:{}",
        crop.sw, crop.sh, crop.sx, crop.sy, target_width, target_height
    )
}

/// Append a subtitle burn-in stage to a filter chain.
pub fn with_subtitles(base: &str, ass_path: &Path) -> String {
    format!(
        "{},subtitles='{}'",
        base,
        escape_filter_path(&ass_path.to_string_lossy())
    )
}

/// Downscale-to-square filter for detection frame sampling.
pub fn frame_sample_filter(size: u32) -> String {
    format!("scale={}:{}", size, size)
}

/// Escape a path for use inside an FFmpeg filter argument.
///
/// Colons separate filter options and quotes delimit the value, so both
/// must be escaped.
fn escape_filter_path(path: &str) -> String {
    path.replace('\\', "/").replace(':', "\\:").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_crop_scale_filter() {
        let crop = CropWindow::new(656, 0, 608, 1080);
        assert_eq!(
            crop_scale_filter(&crop, 720, 1280),
            "crop=608:1080:656:0,scale=720:1280"
        );
    }

    #[test]
    fn test_subtitles_appended() {
        let base = "crop=608:1080:656:0,scale=720:1280";
        let filter = with_subtitles(base, &PathBuf::from("/tmp/clip.ass"));
        assert_eq!(
            filter,
            "crop=608:1080:656:0,scale=720:1280,subtitles='/tmp/clip.ass'"
        );
    }

    #[test]
    fn test_filter_path_escaping() {
        assert_eq!(escape_filter_path("C:/a'b.ass"), "C\\:/a\\'b.ass");
    }

    #[test]
    fn test_frame_sample_filter() {
        assert_eq!(frame_sample_filter(224), "scale=224:224");
    }
}
