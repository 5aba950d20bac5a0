//! Shotframe frames a photo or video on a padded canvas with a background colour, a drop
//! shadow and rounded corners, then exports the result as a still image or a video file.
//!
//! The pieces, bottom-up:
//!
//! - [`compute_geometry`] sizes the canvas for a media size and [`FrameRatioSpec`]
//! - [`compose_scene`] paints one frame onto any [`DrawSurface`] ([`CpuSurface`] in production)
//! - [`LiveRenderLoop`] drives the preview, one compositor pass per display refresh
//! - [`ExportPipeline`] replays the media through a private surface into an encoder
//! - [`export_still`] renders an image source once and encodes it
//! - [`Studio`] ties the shared [`SceneStyle`] to the currently loaded [`MediaSource`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod compositor;
pub(crate) mod export;
pub(crate) mod layout;
pub(crate) mod live;
pub(crate) mod media;
pub(crate) mod render;
pub(crate) mod session;
pub(crate) mod style;

pub use crate::foundation::core::{Fps, FrameIndex, Point, Rect, Rgba8Premul};
pub use crate::foundation::error::{ShotframeError, ShotframeResult};

pub use crate::style::color::Color;
pub use crate::style::handle::StyleHandle;
pub use crate::style::ratio::FrameRatioSpec;
pub use crate::style::scene::{MAX_SHADOW_BLUR, SceneStyle, ShadowStyle};

pub use crate::layout::calculator::{
    CanvasGeometry, MAX_CANVAS_DIM, PADDING, Viewport, compute_geometry,
};

pub use crate::media::ffmpeg_playback::FfmpegPlayback;
pub use crate::media::frame::MediaFrame;
pub use crate::media::image::{decode_image, load_image};
pub use crate::media::kind::MediaKind;
pub use crate::media::playback::{FramePlayback, Playback, StillPlayback};
pub use crate::media::source::MediaSource;
pub use crate::media::tools::{FFMPEG_ENV, FFPROBE_ENV, FfmpegTools};
pub use crate::media::video::{VideoInfo, probe_video};

pub use crate::render::cpu::CpuSurface;
pub use crate::render::frame::FrameRGBA;
pub use crate::render::recording::{DrawOp, RecordingSurface};
pub use crate::render::surface::DrawSurface;

pub use crate::compositor::scene::compose_scene;

pub use crate::live::render_loop::{LiveRenderLoop, TickHandle};

pub use crate::export::capture::{CaptureStream, CapturedFrame};
pub use crate::export::codec::{
    Container, NegotiatedFormat, VideoCodec, VideoFormat, negotiate_format,
};
pub use crate::export::download::{Artifact, DirectoryDownload, Download, InMemoryDownload};
pub use crate::export::encoder::{
    EncoderBackend, EncoderConfig, InMemoryBackend, InMemoryEncoder, InjectedFailure,
    VideoEncoder,
};
pub use crate::export::ffmpeg::{FfmpegBackend, FfmpegEncoder};
pub use crate::export::job::{ExportJob, ExportState};
pub use crate::export::naming::{DEFAULT_LABEL, output_file_name};
pub use crate::export::pipeline::{ExportObserver, ExportPipeline, ExportReport, NoopObserver};
pub use crate::export::progress::{
    ExportProgress, ProgressTracker, estimate_remaining, format_remaining, progress_percent,
    progress_ratio,
};
pub use crate::export::settings::{DEFAULT_BITRATE_BPS, DEFAULT_JPEG_QUALITY, ExportSettings};
pub use crate::export::still::{
    StillFormat, StillReport, encode_still, export_still, render_still,
};

pub use crate::session::context::RenderContext;
pub use crate::session::studio::Studio;
