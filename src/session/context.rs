use crate::foundation::core::Fps;
use crate::foundation::error::ShotframeResult;
use crate::live::render_loop::LiveRenderLoop;
use crate::media::source::MediaSource;
use crate::render::cpu::CpuSurface;
use crate::style::handle::StyleHandle;

/// Everything tied to one loaded file: the source and the preview loop drawing it.
///
/// Replaced wholesale when another file is loaded.
pub struct RenderContext {
    source: MediaSource,
    live: LiveRenderLoop<CpuSurface>,
}

impl RenderContext {
    /// Open a preview playback on `source` and start its live loop.
    pub fn start(source: MediaSource, style: StyleHandle, fps: Fps) -> ShotframeResult<Self> {
        let playback = source.open_playback(fps);
        let mut live = LiveRenderLoop::new(style, playback, CpuSurface::new(1, 1)?);
        live.start()?;
        Ok(Self { source, live })
    }

    /// Loaded media.
    pub fn source(&self) -> &MediaSource {
        &self.source
    }

    /// Preview loop.
    pub fn live(&self) -> &LiveRenderLoop<CpuSurface> {
        &self.live
    }

    /// Preview loop, mutably.
    pub fn live_mut(&mut self) -> &mut LiveRenderLoop<CpuSurface> {
        &mut self.live
    }
}
