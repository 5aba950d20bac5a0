use crate::foundation::core::Rect;
use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::style::ratio::FrameRatioSpec;

/// Total padding added around the media on the fitted axis, split evenly by centering.
pub const PADDING: u32 = 200;

/// Largest canvas edge the raster surface can allocate.
pub const MAX_CANVAS_DIM: u32 = u16::MAX as u32;

/// Canvas dimensions and media placement for one media size and frame ratio.
///
/// Derived on demand; never persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasGeometry {
    /// Backing canvas width in pixels.
    pub canvas_width: u32,
    /// Backing canvas height in pixels.
    pub canvas_height: u32,
    /// Media intrinsic width.
    pub media_width: u32,
    /// Media intrinsic height.
    pub media_height: u32,
    /// Left edge of the media, `(canvas_width - media_width) / 2`.
    pub media_x: f64,
    /// Top edge of the media, `(canvas_height - media_height) / 2`.
    pub media_y: f64,
}

/// On-screen space available to the preview canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Window height; the preview uses at most 70% of it.
    pub height: f64,
    /// Width of the element containing the preview.
    pub container_width: f64,
}

impl CanvasGeometry {
    /// Media bounding rectangle in canvas coordinates.
    pub fn media_rect(&self) -> Rect {
        Rect::new(
            self.media_x,
            self.media_y,
            self.media_x + f64::from(self.media_width),
            self.media_y + f64::from(self.media_height),
        )
    }

    /// Whether this geometry was derived from the given media size.
    pub fn fits_media(&self, width: u32, height: u32) -> bool {
        self.media_width == width && self.media_height == height
    }

    /// Preview scale factor (`<= 1.0`); never affects the backing resolution.
    pub fn display_scale(&self, viewport: Viewport) -> f64 {
        let w = f64::from(self.canvas_width);
        let h = f64::from(self.canvas_height);
        let max_h = viewport.height * 0.7;

        let mut scale = 1.0;
        if h > max_h && h > 0.0 {
            scale = max_h / h;
        }
        let scaled_w = w * scale;
        if scaled_w > viewport.container_width && scaled_w > 0.0 {
            scale *= viewport.container_width / scaled_w;
        }
        scale.max(0.0)
    }

    /// On-screen `(width, height)` of the preview canvas.
    pub fn display_size(&self, viewport: Viewport) -> (f64, f64) {
        let s = self.display_scale(viewport);
        (
            f64::from(self.canvas_width) * s,
            f64::from(self.canvas_height) * s,
        )
    }
}

/// Compute canvas size and centered media placement.
///
/// `Auto` pads both axes by [`PADDING`]. An explicit ratio pads the axis the media fills and
/// grows the other one until the canvas matches the ratio; the media itself is never scaled.
pub fn compute_geometry(
    media_width: u32,
    media_height: u32,
    ratio: FrameRatioSpec,
) -> ShotframeResult<CanvasGeometry> {
    if media_width == 0 || media_height == 0 {
        return Err(ShotframeError::validation(format!(
            "media dimensions must be non-zero, got {media_width}x{media_height}"
        )));
    }

    let (canvas_width, canvas_height) = match ratio.target() {
        None => (
            u64::from(media_width) + u64::from(PADDING),
            u64::from(media_height) + u64::from(PADDING),
        ),
        Some(target) => {
            let media_ratio = f64::from(media_width) / f64::from(media_height);
            if media_ratio > target {
                let w = f64::from(media_width) + f64::from(PADDING);
                (w as u64, round_dim(w / target))
            } else {
                let h = f64::from(media_height) + f64::from(PADDING);
                (round_dim(h * target), h as u64)
            }
        }
    };

    if canvas_width > u64::from(MAX_CANVAS_DIM) || canvas_height > u64::from(MAX_CANVAS_DIM) {
        return Err(ShotframeError::configuration(format!(
            "frame ratio {ratio} yields a {canvas_width}x{canvas_height} canvas, \
             larger than {MAX_CANVAS_DIM} px per side"
        )));
    }
    let canvas_width = canvas_width as u32;
    let canvas_height = canvas_height as u32;

    Ok(CanvasGeometry {
        canvas_width,
        canvas_height,
        media_width,
        media_height,
        media_x: (f64::from(canvas_width) - f64::from(media_width)) / 2.0,
        media_y: (f64::from(canvas_height) - f64::from(media_height)) / 2.0,
    })
}

fn round_dim(v: f64) -> u64 {
    if v.is_finite() { v.round().max(1.0) as u64 } else { u64::MAX }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/calculator.rs"]
mod tests;
