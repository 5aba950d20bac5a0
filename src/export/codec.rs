use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::ShotframeError;

/// Output container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Container {
    /// ISO base media (`.mp4`).
    Mp4,
    /// Matroska subset (`.webm`).
    Webm,
}

/// Video codec inside the container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VideoCodec {
    /// H.264 / AVC.
    H264,
    /// VP9.
    Vp9,
    /// VP8.
    Vp8,
    /// MPEG-4 Part 2, built into every ffmpeg.
    Mpeg4,
}

/// A container/codec pair the encoder can be asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VideoFormat {
    /// Output container.
    pub container: Container,
    /// Video codec.
    pub codec: VideoCodec,
}

impl VideoFormat {
    /// MP4 with H.264.
    pub const MP4_H264: VideoFormat = VideoFormat::new(Container::Mp4, VideoCodec::H264);
    /// WebM with VP9.
    pub const WEBM_VP9: VideoFormat = VideoFormat::new(Container::Webm, VideoCodec::Vp9);
    /// WebM with VP8.
    pub const WEBM_VP8: VideoFormat = VideoFormat::new(Container::Webm, VideoCodec::Vp8);
    /// Format used when no preference is supported.
    pub const BASELINE: VideoFormat = VideoFormat::new(Container::Mp4, VideoCodec::Mpeg4);

    /// Default preference order, best first.
    pub const PREFERENCES: [VideoFormat; 3] =
        [Self::MP4_H264, Self::WEBM_VP9, Self::WEBM_VP8];

    /// Pair a container with a codec.
    pub const fn new(container: Container, codec: VideoCodec) -> Self {
        Self { container, codec }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self.container {
            Container::Mp4 => "mp4",
            Container::Webm => "webm",
        }
    }

    /// MIME type handed to the download collaborator.
    pub fn mime_type(self) -> &'static str {
        match self.container {
            Container::Mp4 => "video/mp4",
            Container::Webm => "video/webm",
        }
    }

    /// ffmpeg encoder name (`-c:v`).
    pub fn ffmpeg_encoder(self) -> &'static str {
        match self.codec {
            VideoCodec::H264 => "libx264",
            VideoCodec::Vp9 => "libvpx-vp9",
            VideoCodec::Vp8 => "libvpx",
            VideoCodec::Mpeg4 => "mpeg4",
        }
    }

    /// ffmpeg muxer name (`-f`).
    pub fn ffmpeg_muxer(self) -> &'static str {
        self.extension()
    }

    fn codec_name(self) -> &'static str {
        match self.codec {
            VideoCodec::H264 => "h264",
            VideoCodec::Vp9 => "vp9",
            VideoCodec::Vp8 => "vp8",
            VideoCodec::Mpeg4 => "mpeg4",
        }
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.extension(), self.codec_name())
    }
}

impl FromStr for VideoFormat {
    type Err = ShotframeError;

    /// Parse `"mp4/h264"`, `"webm/vp9"`, `"webm/vp8"` or `"mp4/mpeg4"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let known = [
            Self::MP4_H264,
            Self::WEBM_VP9,
            Self::WEBM_VP8,
            Self::BASELINE,
        ];
        let wanted = s.trim().to_ascii_lowercase();
        known
            .into_iter()
            .find(|f| f.to_string() == wanted)
            .ok_or_else(|| {
                ShotframeError::configuration(format!(
                    "unknown video format '{s}' (expected mp4/h264, webm/vp9, webm/vp8 or mp4/mpeg4)"
                ))
            })
    }
}

impl Serialize for VideoFormat {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VideoFormat {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Outcome of codec negotiation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NegotiatedFormat {
    /// Format the encoder will produce.
    pub format: VideoFormat,
    /// Whether none of the preferences were supported.
    pub fallback: bool,
}

/// Pick the first supported preference, else [`VideoFormat::BASELINE`].
pub fn negotiate_format(
    preferences: &[VideoFormat],
    mut supports: impl FnMut(VideoFormat) -> bool,
) -> NegotiatedFormat {
    let chosen = preferences.iter().copied().find(|f| supports(*f));
    let negotiated = match chosen {
        Some(format) => NegotiatedFormat {
            format,
            fallback: false,
        },
        None => NegotiatedFormat {
            format: VideoFormat::BASELINE,
            fallback: true,
        },
    };
    tracing::info!(
        codec = negotiated.format.codec_name(),
        container = negotiated.format.extension(),
        fallback = negotiated.fallback,
        "negotiated export format"
    );
    negotiated
}

#[cfg(test)]
#[path = "../../tests/unit/export/codec.rs"]
mod tests;
