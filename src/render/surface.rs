use crate::foundation::core::{Point, Rect};
use crate::foundation::error::ShotframeResult;
use crate::media::frame::MediaFrame;
use crate::style::color::Color;
use crate::style::scene::ShadowStyle;

/// Canvas-like drawing target for the scene compositor.
///
/// Shadow and clip state are scoped: each `push_*` must be matched by its `pop_*` before the
/// next `push_*` of the same kind.
pub trait DrawSurface {
    /// Backing size in pixels.
    fn size(&self) -> (u32, u32);

    /// Reallocate the backing store; a no-op when the size is unchanged.
    fn resize(&mut self, width: u32, height: u32) -> ShotframeResult<()>;

    /// Overwrite every pixel with an opaque colour. Ignores shadow and clip state.
    fn fill_background(&mut self, color: Color) -> ShotframeResult<()>;

    /// Make subsequent draws cast `shadow`.
    fn push_shadow(&mut self, shadow: ShadowStyle) -> ShotframeResult<()>;

    /// Stop casting shadows.
    fn pop_shadow(&mut self) -> ShotframeResult<()>;

    /// Fill a rounded rectangle (`radius == 0` fills a plain rectangle).
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Color) -> ShotframeResult<()>;

    /// Draw a media frame at its intrinsic size with its top-left corner at `origin`.
    fn draw_media(&mut self, frame: &MediaFrame, origin: Point) -> ShotframeResult<()>;

    /// Restrict subsequent draws to a rounded rectangle.
    fn push_clip_rounded_rect(&mut self, rect: Rect, radius: f64) -> ShotframeResult<()>;

    /// Release the active clip.
    fn pop_clip(&mut self) -> ShotframeResult<()>;
}
