use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::error::{ShotframeError, ShotframeResult};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// One decoded visual sample: a video frame or an image's pixels.
///
/// `generation` changes whenever the pixels change, so surfaces can cache derived paints.
#[derive(Clone, Debug)]
pub struct MediaFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major, `width * height * 4` bytes.
    pub rgba8_premul: Arc<Vec<u8>>,
    generation: u64,
}

impl MediaFrame {
    /// Wrap premultiplied RGBA8 pixels.
    pub fn new(width: u32, height: u32, rgba8_premul: Vec<u8>) -> ShotframeResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| ShotframeError::validation("media frame size overflow"))?;
        if width == 0 || height == 0 || rgba8_premul.len() != expected {
            return Err(ShotframeError::validation(format!(
                "media frame {width}x{height} expects {expected} bytes, got {}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
            generation: next_generation(),
        })
    }

    /// Solid-colour frame, mostly useful for tests and placeholders.
    pub fn solid(width: u32, height: u32, premul: [u8; 4]) -> ShotframeResult<Self> {
        Self::new(width, height, premul.repeat(width as usize * height as usize))
    }

    /// Identity of the current pixel contents.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Mutable pixel access for in-place refills; bumps the generation.
    ///
    /// Returns `None` while another owner still shares the buffer.
    pub(crate) fn pixels_mut(&mut self) -> Option<&mut Vec<u8>> {
        let buf = Arc::get_mut(&mut self.rgba8_premul)?;
        self.generation = next_generation();
        Some(buf)
    }

    /// Replace the pixel buffer (same dimensions) and bump the generation.
    pub(crate) fn replace_pixels(&mut self, rgba8_premul: Vec<u8>) {
        self.rgba8_premul = Arc::new(rgba8_premul);
        self.generation = next_generation();
    }
}

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Convert straight-alpha RGBA8 into premultiplied RGBA8 in place.
pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = crate::foundation::math::mul_div255_u8(u16::from(*c), a);
        }
    }
}
