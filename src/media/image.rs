use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::media::frame::{MediaFrame, premultiply_rgba8_in_place};

/// Decode an encoded still (PNG, JPEG, ...) into a premultiplied frame.
pub fn decode_image(bytes: &[u8]) -> ShotframeResult<MediaFrame> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ShotframeError::media_load(format!("decode image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    MediaFrame::new(width, height, rgba8_premul)
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> ShotframeResult<MediaFrame> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read image '{}'", path.display()))
        .map_err(|e| ShotframeError::media_load(format!("{e:#}")))?;
    decode_image(&bytes)
}
