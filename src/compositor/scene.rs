use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::layout::calculator::CanvasGeometry;
use crate::media::frame::MediaFrame;
use crate::render::surface::DrawSurface;
use crate::style::scene::SceneStyle;

/// Paint one fully composited frame onto `surface`.
///
/// Draw order:
/// 1. background fill over the whole surface;
/// 2. shadow pass: an unclipped shape at the media rectangle casts the shadow (a rounded
///    rectangle in the background colour when `corner_radius > 0`, the media itself otherwise);
/// 3. media pass: the media, clipped to the rounded rectangle when `corner_radius > 0`.
///
/// The shadow scope is always closed before the media pass, even when the shadow draw fails.
pub fn compose_scene<S: DrawSurface + ?Sized>(
    surface: &mut S,
    geometry: &CanvasGeometry,
    frame: &MediaFrame,
    style: &SceneStyle,
) -> ShotframeResult<()> {
    if surface.size() != (geometry.canvas_width, geometry.canvas_height) {
        let (w, h) = surface.size();
        return Err(ShotframeError::validation(format!(
            "surface is {w}x{h} but the scene needs {}x{}",
            geometry.canvas_width, geometry.canvas_height
        )));
    }
    if !geometry.fits_media(frame.width, frame.height) {
        return Err(ShotframeError::validation(format!(
            "media frame is {}x{} but the layout was computed for {}x{}",
            frame.width, frame.height, geometry.media_width, geometry.media_height
        )));
    }

    let rect = geometry.media_rect();
    let origin = rect.origin();
    let radius = f64::from(style.corner_radius);

    surface.fill_background(style.background)?;

    surface.push_shadow(style.shadow)?;
    let shadow_shape = if style.corner_radius > 0 {
        surface.fill_rounded_rect(rect, radius, style.background)
    } else {
        surface.draw_media(frame, origin)
    };
    surface.pop_shadow()?;
    shadow_shape?;

    if style.corner_radius > 0 {
        surface.push_clip_rounded_rect(rect, radius)?;
        let drawn = surface.draw_media(frame, origin);
        surface.pop_clip()?;
        drawn
    } else {
        surface.draw_media(frame, origin)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/scene.rs"]
mod tests;
