use crate::foundation::core::Fps;
use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::media::frame::MediaFrame;

/// A handle that yields the "current visual frame" of a media source over time.
///
/// Time advances in whole ticks of the capture rate. Handles are independent: opening a second
/// handle on the same source never disturbs the first.
pub trait Playback {
    /// Block until the first frame is decodable.
    fn wait_for_data(&mut self) -> ShotframeResult<()>;

    /// Rewind to time zero and start producing frames.
    fn play_from_start(&mut self) -> ShotframeResult<()>;

    /// Move one tick forward. Sets [`Playback::ended`] once no further frame exists; the last
    /// frame stays current.
    fn advance(&mut self) -> ShotframeResult<()>;

    /// Frame to composite at the current time, `None` before any data arrived.
    fn current_frame(&self) -> Option<&MediaFrame>;

    /// Playback position in seconds.
    fn current_time_secs(&self) -> f64;

    /// Total duration in seconds; `0.0` for stills.
    fn duration_secs(&self) -> f64;

    /// Whether playback reached end-of-media.
    fn ended(&self) -> bool;
}

/// A still image presented as a zero-duration playback that never advances.
#[derive(Clone, Debug)]
pub struct StillPlayback {
    frame: MediaFrame,
}

impl StillPlayback {
    /// Wrap an already decoded image.
    pub fn new(frame: MediaFrame) -> Self {
        Self { frame }
    }
}

impl Playback for StillPlayback {
    fn wait_for_data(&mut self) -> ShotframeResult<()> {
        Ok(())
    }

    fn play_from_start(&mut self) -> ShotframeResult<()> {
        Ok(())
    }

    fn advance(&mut self) -> ShotframeResult<()> {
        Ok(())
    }

    fn current_frame(&self) -> Option<&MediaFrame> {
        Some(&self.frame)
    }

    fn current_time_secs(&self) -> f64 {
        0.0
    }

    fn duration_secs(&self) -> f64 {
        0.0
    }

    fn ended(&self) -> bool {
        false
    }
}

/// Pre-decoded frame sequence played back at a fixed rate.
///
/// Used wherever a deterministic, process-free video stand-in is needed.
#[derive(Clone, Debug)]
pub struct FramePlayback {
    frames: Vec<MediaFrame>,
    fps: Fps,
    pos: usize,
    ended: bool,
}

impl FramePlayback {
    /// Build from a non-empty list of equally sized frames.
    pub fn new(frames: Vec<MediaFrame>, fps: Fps) -> ShotframeResult<Self> {
        let Some(first) = frames.first() else {
            return Err(ShotframeError::media_load("frame playback needs at least one frame"));
        };
        let (w, h) = (first.width, first.height);
        if frames.iter().any(|f| f.width != w || f.height != h) {
            return Err(ShotframeError::validation(
                "frame playback frames must share one size",
            ));
        }
        Ok(Self {
            frames,
            fps,
            pos: 0,
            ended: false,
        })
    }

    /// Number of frames in the sequence.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; construction rejects empty sequences.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl Playback for FramePlayback {
    fn wait_for_data(&mut self) -> ShotframeResult<()> {
        Ok(())
    }

    fn play_from_start(&mut self) -> ShotframeResult<()> {
        self.pos = 0;
        self.ended = false;
        Ok(())
    }

    fn advance(&mut self) -> ShotframeResult<()> {
        if self.ended {
            return Ok(());
        }
        if self.pos + 1 < self.frames.len() {
            self.pos += 1;
        } else {
            self.ended = true;
        }
        Ok(())
    }

    fn current_frame(&self) -> Option<&MediaFrame> {
        self.frames.get(self.pos)
    }

    fn current_time_secs(&self) -> f64 {
        if self.ended {
            return self.duration_secs();
        }
        self.fps.frames_to_secs(self.pos as u64)
    }

    fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.frames.len() as u64)
    }

    fn ended(&self) -> bool {
        self.ended
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/playback.rs"]
mod tests;
