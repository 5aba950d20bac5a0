use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::style::color::Color;
use crate::style::ratio::FrameRatioSpec;

/// Largest accepted shadow blur radius in pixels.
pub const MAX_SHADOW_BLUR: u32 = 1000;

/// Drop shadow cast by the media rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShadowStyle {
    /// Horizontal offset in pixels (positive moves right).
    pub offset_x: i32,
    /// Vertical offset in pixels (positive moves down).
    pub offset_y: i32,
    /// Blur radius in pixels, at most [`MAX_SHADOW_BLUR`]; the gaussian sigma is half of it.
    pub blur_radius: u32,
    /// Shadow opacity in `0.0..=1.0` applied to black.
    pub opacity: f64,
}

impl ShadowStyle {
    /// Build from the UI's 0..=100 integer percent slider.
    pub fn with_opacity_percent(mut self, percent: u8) -> Self {
        self.opacity = f64::from(percent.min(100)) / 100.0;
        self
    }

    /// Whether the shadow can produce any visible pixel.
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

impl Default for ShadowStyle {
    fn default() -> Self {
        Self {
            offset_x: 0,
            offset_y: 15,
            blur_radius: 60,
            opacity: 1.0,
        }
    }
}

/// All user-tunable scene parameters.
///
/// Read fresh on every render tick; edits take effect on the next tick without invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneStyle {
    /// Opaque canvas fill.
    pub background: Color,
    /// Media corner radius in pixels; `0` keeps square corners.
    pub corner_radius: u32,
    /// Output canvas aspect ratio.
    pub frame_ratio: FrameRatioSpec,
    /// Drop shadow parameters.
    pub shadow: ShadowStyle,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            background: Color::default(),
            corner_radius: 46,
            frame_ratio: FrameRatioSpec::Auto,
            shadow: ShadowStyle::default(),
        }
    }
}

impl SceneStyle {
    /// Load and validate a style from a JSON file.
    pub fn from_path(path: &Path) -> ShotframeResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read style file '{}'", path.display()))?;
        Self::from_json_slice(&bytes)
    }

    /// Parse and validate a style from JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> ShotframeResult<Self> {
        let style: Self = serde_json::from_slice(bytes)
            .map_err(|e| ShotframeError::configuration(format!("invalid style json: {e}")))?;
        style.validate()?;
        Ok(style)
    }

    /// Reject values outside the ranges the compositor supports.
    pub fn validate(&self) -> ShotframeResult<()> {
        let o = self.shadow.opacity;
        if !o.is_finite() || !(0.0..=1.0).contains(&o) {
            return Err(ShotframeError::configuration(format!(
                "shadow opacity must be within 0.0..=1.0, got {o}"
            )));
        }
        if self.shadow.blur_radius > MAX_SHADOW_BLUR {
            return Err(ShotframeError::configuration(format!(
                "shadow blur radius must be at most {MAX_SHADOW_BLUR}, got {}",
                self.shadow.blur_radius
            )));
        }
        Ok(())
    }

    /// Reset the scene group (background, corners, ratio) to defaults.
    pub fn reset_scene(&mut self) {
        let d = Self::default();
        self.background = d.background;
        self.corner_radius = d.corner_radius;
        self.frame_ratio = d.frame_ratio;
    }

    /// Reset the shadow group to defaults.
    pub fn reset_shadow(&mut self) {
        self.shadow = ShadowStyle::default();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/scene.rs"]
mod tests;
