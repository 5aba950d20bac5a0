use crate::compositor::scene::compose_scene;
use crate::foundation::error::ShotframeResult;
use crate::layout::calculator::{CanvasGeometry, Viewport, compute_geometry};
use crate::media::playback::Playback;
use crate::render::cpu::CpuSurface;
use crate::render::surface::DrawSurface;
use crate::style::handle::StyleHandle;
use crate::style::ratio::FrameRatioSpec;

/// Identifier of one scheduled refresh tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

/// Cooperative preview loop: one compositor pass per display refresh.
///
/// The host calls [`LiveRenderLoop::on_refresh`] from its refresh signal. At most one tick is
/// pending at any time; [`LiveRenderLoop::restart`] cancels it before scheduling a replacement.
pub struct LiveRenderLoop<S: DrawSurface = CpuSurface> {
    style: StyleHandle,
    playback: Box<dyn Playback>,
    surface: S,
    geometry: Option<CanvasGeometry>,
    layout_key: Option<(u32, u32, FrameRatioSpec)>,
    pending: Option<TickHandle>,
    next_id: u64,
    ticks: u64,
    loop_playback: bool,
}

impl<S: DrawSurface> LiveRenderLoop<S> {
    /// Bind a playback handle to the visible surface; nothing is scheduled yet.
    pub fn new(style: StyleHandle, playback: Box<dyn Playback>, surface: S) -> Self {
        Self {
            style,
            playback,
            surface,
            geometry: None,
            layout_key: None,
            pending: None,
            next_id: 0,
            ticks: 0,
            loop_playback: true,
        }
    }

    /// Whether the preview rewinds when the media ends (default `true`).
    pub fn set_loop_playback(&mut self, enabled: bool) {
        self.loop_playback = enabled;
    }

    /// Wait for decodable data, start playback and schedule the first tick.
    pub fn start(&mut self) -> ShotframeResult<TickHandle> {
        self.playback.wait_for_data()?;
        self.playback.play_from_start()?;
        Ok(self.restart())
    }

    /// Cancel the pending tick (if any) and schedule a fresh one.
    pub fn restart(&mut self) -> TickHandle {
        self.cancel();
        let handle = TickHandle(self.next_id);
        self.next_id += 1;
        self.pending = Some(handle);
        handle
    }

    /// Cancel the pending tick; the loop stays idle until restarted.
    pub fn stop(&mut self) {
        if self.cancel() {
            tracing::debug!(ticks = self.ticks, "live render loop stopped");
        }
    }

    fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Tick that the next refresh will run.
    pub fn pending_tick(&self) -> Option<TickHandle> {
        self.pending
    }

    /// Number of completed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run the pending tick, then schedule the next one.
    ///
    /// Returns `false` when nothing was scheduled. A failing tick leaves the loop idle.
    pub fn on_refresh(&mut self) -> ShotframeResult<bool> {
        if self.pending.take().is_none() {
            return Ok(false);
        }
        self.tick()?;
        self.ticks += 1;
        self.restart();
        Ok(true)
    }

    fn tick(&mut self) -> ShotframeResult<()> {
        let style = self.style.snapshot();
        let Some(frame) = self.playback.current_frame() else {
            return Ok(());
        };

        let key = (frame.width, frame.height, style.frame_ratio);
        let geometry = match self.geometry {
            Some(g) if self.layout_key == Some(key) => g,
            _ => {
                let g = compute_geometry(frame.width, frame.height, style.frame_ratio)?;
                self.surface.resize(g.canvas_width, g.canvas_height)?;
                tracing::debug!(
                    canvas_width = g.canvas_width,
                    canvas_height = g.canvas_height,
                    ratio = %style.frame_ratio,
                    "preview layout updated"
                );
                self.geometry = Some(g);
                self.layout_key = Some(key);
                g
            }
        };

        compose_scene(&mut self.surface, &geometry, frame, &style)?;

        self.playback.advance()?;
        if self.loop_playback && self.playback.ended() {
            self.playback.play_from_start()?;
        }
        Ok(())
    }

    /// Visible surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Layout used by the most recent tick.
    pub fn geometry(&self) -> Option<&CanvasGeometry> {
        self.geometry.as_ref()
    }

    /// On-screen size of the preview for a viewport.
    pub fn display_size(&self, viewport: Viewport) -> Option<(f64, f64)> {
        self.geometry.map(|g| g.display_size(viewport))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/live/render_loop.rs"]
mod tests;
