use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::cpu::CpuSurface;
use crate::render::surface::DrawSurface;
use crate::style::color::Color;

/// One sample of the capture stream: opaque straight RGBA8.
#[derive(Clone, Copy, Debug)]
pub struct CapturedFrame<'a> {
    /// Sequential index within the export.
    pub index: FrameIndex,
    /// Presentation time at the capture rate.
    pub timestamp_secs: f64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes, alpha always 255.
    pub rgba: &'a [u8],
}

/// Fixed-rate frame stream read from a private export surface.
///
/// Each call to [`CaptureStream::capture`] emits the surface's current content as the next
/// frame; the caller composites frame `n` before asking for sample `n`, which keeps the stream
/// in playback order.
#[derive(Debug)]
pub struct CaptureStream {
    width: u32,
    height: u32,
    fps: Fps,
    background: Color,
    next: u64,
    scratch: Vec<u8>,
}

impl CaptureStream {
    /// Open a stream matching the surface's current size.
    pub fn open(surface: &CpuSurface, fps: Fps, background: Color) -> ShotframeResult<Self> {
        let (width, height) = surface.size();
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                ShotframeError::capture_unavailable(format!(
                    "cannot capture a {width}x{height} surface"
                ))
            })?;
        Ok(Self {
            width,
            height,
            fps,
            background,
            next: 0,
            scratch: vec![0; len],
        })
    }

    /// Capture rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Frames emitted so far.
    pub fn frames_emitted(&self) -> u64 {
        self.next
    }

    /// Emit the surface's current pixels as the next frame.
    pub fn capture(&mut self, surface: &CpuSurface) -> ShotframeResult<CapturedFrame<'_>> {
        if surface.size() != (self.width, self.height) {
            let (w, h) = surface.size();
            return Err(ShotframeError::capture_unavailable(format!(
                "surface resized to {w}x{h} while capturing at {}x{}",
                self.width, self.height
            )));
        }
        flatten_premul_over(&mut self.scratch, surface.pixels(), self.background)?;

        let index = FrameIndex(self.next);
        self.next += 1;
        Ok(CapturedFrame {
            index,
            timestamp_secs: self.fps.frames_to_secs(index.0),
            width: self.width,
            height: self.height,
            rgba: &self.scratch,
        })
    }
}

/// Composite premultiplied RGBA8 over an opaque colour.
fn flatten_premul_over(dst: &mut [u8], src: &[u8], bg: Color) -> ShotframeResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ShotframeError::validation(
            "capture expects equal-length rgba8 buffers",
        ));
    }
    let bg = [u16::from(bg.r), u16::from(bg.g), u16::from(bg.b)];
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let inv = 255 - u16::from(s[3]);
        for c in 0..3 {
            d[c] = (u16::from(s[c]) + mul_div255_u16(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}
