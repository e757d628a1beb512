//! Subject positions and crop windows.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A normalized subject coordinate in frame space.
///
/// Both components are in `[0, 1]`; `(0.5, 0.5)` is the frame center.
/// "No subject detected" is modeled as `Option::None` at the call sites,
/// which crop planning treats as a center anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SubjectPosition {
    /// Horizontal position (0.0 = left, 1.0 = right)
    pub x: f64,
    /// Vertical position (0.0 = top, 1.0 = bottom)
    pub y: f64,
}

impl SubjectPosition {
    /// Create a new subject position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Frame center.
    pub fn center() -> Self {
        Self { x: 0.5, y: 0.5 }
    }

    /// Check the coordinate lies within the normalized frame.
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

/// An axis-aligned crop rectangle in source-frame pixel space.
///
/// Invariant: `sx + sw <= source_width` and `sy + sh <= source_height` for
/// the frame it was planned against, with `sw/sh` matching the target
/// aspect ratio within rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CropWindow {
    /// Left edge in pixels
    pub sx: u32,
    /// Top edge in pixels
    pub sy: u32,
    /// Width in pixels
    pub sw: u32,
    /// Height in pixels
    pub sh: u32,
}

impl CropWindow {
    /// Create a new crop window.
    pub fn new(sx: u32, sy: u32, sw: u32, sh: u32) -> Self {
        Self { sx, sy, sw, sh }
    }

    /// Check containment within a source frame.
    pub fn fits_within(&self, source_width: u32, source_height: u32) -> bool {
        self.sw > 0
            && self.sh > 0
            && self.sx + self.sw <= source_width
            && self.sy + self.sh <= source_height
    }

    /// Aspect ratio of the window.
    pub fn aspect_ratio(&self) -> f64 {
        if self.sh == 0 {
            return 0.0;
        }
        self.sw as f64 / self.sh as f64
    }
}
