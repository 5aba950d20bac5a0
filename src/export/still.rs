use std::path::PathBuf;

use image::{ExtendedColorType, ImageEncoder as _};

use crate::compositor::scene::compose_scene;
use crate::export::download::{Artifact, Download};
use crate::export::naming::output_file_name;
use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::layout::calculator::compute_geometry;
use crate::media::frame::MediaFrame;
use crate::render::cpu::CpuSurface;
use crate::render::frame::FrameRGBA;
use crate::style::scene::SceneStyle;

/// Still-image encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StillFormat {
    /// Lossless PNG.
    Png,
    /// Lossy JPEG at `quality` (`1..=100`).
    Jpeg {
        /// Encoder quality.
        quality: u8,
    },
}

impl StillFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpeg",
        }
    }

    /// MIME type of the encoded bytes.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
        }
    }
}

/// Summary of a finished still export.
#[derive(Clone, Debug, PartialEq)]
pub struct StillReport {
    /// Name the artifact was delivered under.
    pub file_name: String,
    /// MIME type of the artifact.
    pub mime_type: String,
    /// Artifact size.
    pub bytes: usize,
    /// Where the download collaborator stored it, if anywhere.
    pub location: Option<PathBuf>,
    /// Image width.
    pub width: u32,
    /// Image height.
    pub height: u32,
}

/// Composite `frame` once onto a private surface.
pub fn render_still(frame: &MediaFrame, style: &SceneStyle) -> ShotframeResult<FrameRGBA> {
    let geometry = compute_geometry(frame.width, frame.height, style.frame_ratio)?;
    let mut surface = CpuSurface::new(geometry.canvas_width, geometry.canvas_height)?;
    compose_scene(&mut surface, &geometry, frame, style)?;
    Ok(surface.snapshot())
}

/// Encode a rendered frame.
pub fn encode_still(frame: FrameRGBA, format: StillFormat) -> ShotframeResult<Vec<u8>> {
    let (w, h) = (frame.width, frame.height);
    let rgba = frame.into_rgba_image()?;
    let mut out = Vec::new();
    let encoded = match format {
        StillFormat::Png => image::codecs::png::PngEncoder::new(&mut out).write_image(
            rgba.as_raw(),
            w,
            h,
            ExtendedColorType::Rgba8,
        ),
        StillFormat::Jpeg { quality } => {
            if !(1..=100).contains(&quality) {
                return Err(ShotframeError::configuration(format!(
                    "jpeg quality must be within 1..=100, got {quality}"
                )));
            }
            let rgb = image::DynamicImage::ImageRgba8(rgba).into_rgb8();
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality).write_image(
                rgb.as_raw(),
                w,
                h,
                ExtendedColorType::Rgb8,
            )
        }
    };
    encoded.map_err(|e| ShotframeError::encoding(format!("failed to encode still: {e}")))?;
    Ok(out)
}

/// Render, encode and deliver a still: no state machine, no progress.
#[tracing::instrument(level = "info", skip(frame, style, download))]
pub fn export_still(
    frame: &MediaFrame,
    style: &SceneStyle,
    format: StillFormat,
    label: &str,
    source_file_name: &str,
    download: &mut dyn Download,
) -> ShotframeResult<StillReport> {
    let rendered = render_still(frame, style)?;
    let (width, height) = (rendered.width, rendered.height);
    let bytes = encode_still(rendered, format)?;
    let file_name = output_file_name(label, source_file_name, format.extension());
    let size = bytes.len();
    tracing::info!(bytes = size, file_name = %file_name, "still finalized");

    let location = download.deliver(Artifact {
        file_name: file_name.clone(),
        mime_type: format.mime_type().to_owned(),
        bytes,
    })?;
    Ok(StillReport {
        file_name,
        mime_type: format.mime_type().to_owned(),
        bytes: size,
        location,
        width,
        height,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/export/still.rs"]
mod tests;
