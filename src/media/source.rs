use std::path::{Path, PathBuf};

use crate::foundation::core::Fps;
use crate::foundation::error::ShotframeResult;
use crate::media::ffmpeg_playback::FfmpegPlayback;
use crate::media::frame::MediaFrame;
use crate::media::image::load_image;
use crate::media::kind::MediaKind;
use crate::media::playback::{Playback, StillPlayback};
use crate::media::tools::FfmpegTools;
use crate::media::video::{VideoInfo, probe_video};

/// A loaded media file: either a probed video or a decoded image.
#[derive(Clone, Debug)]
pub enum MediaSource {
    /// Probed video; frames are decoded by playback handles.
    Video {
        /// Probe result.
        info: VideoInfo,
        /// Tools used to open playback handles.
        tools: FfmpegTools,
    },
    /// Fully decoded still image.
    Image {
        /// Original file, used to derive export names.
        path: PathBuf,
        /// Decoded pixels.
        frame: MediaFrame,
    },
}

impl MediaSource {
    /// Load a file whose class is already known.
    #[tracing::instrument(level = "debug", skip(tools))]
    pub fn load(path: &Path, kind: MediaKind, tools: &FfmpegTools) -> ShotframeResult<Self> {
        let source = match kind {
            MediaKind::Video => Self::Video {
                info: probe_video(tools, path)?,
                tools: tools.clone(),
            },
            MediaKind::Image => Self::Image {
                path: path.to_path_buf(),
                frame: load_image(path)?,
            },
        };
        tracing::info!(
            kind = ?source.kind(),
            width = source.width(),
            height = source.height(),
            duration_secs = source.duration_secs(),
            "media loaded"
        );
        Ok(source)
    }

    /// Video or image.
    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Video { .. } => MediaKind::Video,
            Self::Image { .. } => MediaKind::Image,
        }
    }

    /// Intrinsic width.
    pub fn width(&self) -> u32 {
        match self {
            Self::Video { info, .. } => info.width,
            Self::Image { frame, .. } => frame.width,
        }
    }

    /// Intrinsic height.
    pub fn height(&self) -> u32 {
        match self {
            Self::Video { info, .. } => info.height,
            Self::Image { frame, .. } => frame.height,
        }
    }

    /// Duration in seconds; `0.0` for images.
    pub fn duration_secs(&self) -> f64 {
        match self {
            Self::Video { info, .. } => info.duration_secs,
            Self::Image { .. } => 0.0,
        }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        match self {
            Self::Video { info, .. } => &info.source_path,
            Self::Image { path, .. } => path,
        }
    }

    /// File name used when deriving export names (`"clip.mov"`).
    pub fn file_name(&self) -> String {
        self.path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Open an independent, muted playback handle (the export "clone").
    pub fn open_playback(&self, fps: Fps) -> Box<dyn Playback> {
        match self {
            Self::Video { info, tools } => {
                Box::new(FfmpegPlayback::new(tools.clone(), info.clone(), fps))
            }
            Self::Image { frame, .. } => Box::new(StillPlayback::new(frame.clone())),
        }
    }
}
