use crate::export::capture::CapturedFrame;
use crate::export::codec::VideoFormat;
use crate::foundation::core::Fps;
use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::style::color::Color;

/// Parameters for one encoder instance.
#[derive(Clone, Debug, PartialEq)]
pub struct EncoderConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Capture rate.
    pub fps: Fps,
    /// Target video bitrate in bits per second.
    pub bitrate_bps: u64,
    /// Negotiated output format.
    pub format: VideoFormat,
    /// Colour used to pad odd dimensions.
    pub background: Color,
}

impl EncoderConfig {
    /// Reject configurations no encoder can honour.
    pub fn validate(&self) -> ShotframeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ShotframeError::validation(
                "encode width/height must be non-zero",
            ));
        }
        if self.bitrate_bps == 0 {
            return Err(ShotframeError::configuration(
                "video bitrate must be non-zero",
            ));
        }
        Ok(())
    }

    /// Bytes in one captured frame.
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Factory for encoders plus the codec support query used by negotiation.
pub trait EncoderBackend {
    /// Whether `format` can be produced.
    fn supports(&self, format: VideoFormat) -> bool;

    /// Construct an encoder; it produces nothing until [`VideoEncoder::start`].
    fn open(&self, config: &EncoderConfig) -> ShotframeResult<Box<dyn VideoEncoder>>;
}

/// Consumes captured frames and emits encoded fragments in order.
pub trait VideoEncoder {
    /// Begin encoding.
    fn start(&mut self) -> ShotframeResult<()>;

    /// Encode the next frame.
    fn push_frame(&mut self, frame: &CapturedFrame<'_>) -> ShotframeResult<()>;

    /// Fragments emitted since the previous call, in emission order.
    fn take_chunks(&mut self) -> Vec<Vec<u8>>;

    /// Flush and finish; returns the fragments emitted after the last `take_chunks`.
    fn stop(&mut self) -> ShotframeResult<Vec<Vec<u8>>>;
}

/// Where an [`InMemoryEncoder`] should fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InjectedFailure {
    /// `EncoderBackend::open` fails with CaptureUnavailable.
    Open,
    /// `start` fails with CaptureUnavailable.
    Start,
    /// `push_frame` fails with Encoding at this frame index.
    Frame(u64),
    /// `stop` fails with Encoding.
    Stop,
}

/// Process-free backend producing a simple framed byte stream.
///
/// The stream is `b"SFRM"` + format name, then per frame the index (`u64` LE) followed by the
/// first pixel, then `b"END"`.
#[derive(Clone, Debug)]
pub struct InMemoryBackend {
    supported: Vec<VideoFormat>,
    failure: Option<InjectedFailure>,
}

impl InMemoryBackend {
    /// Backend supporting exactly `supported` (the baseline is always accepted by `open`).
    pub fn new(supported: impl Into<Vec<VideoFormat>>) -> Self {
        Self {
            supported: supported.into(),
            failure: None,
        }
    }

    /// Fail at `failure`.
    pub fn failing(mut self, failure: InjectedFailure) -> Self {
        self.failure = Some(failure);
        self
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new(VideoFormat::PREFERENCES)
    }
}

impl EncoderBackend for InMemoryBackend {
    fn supports(&self, format: VideoFormat) -> bool {
        self.supported.contains(&format)
    }

    fn open(&self, config: &EncoderConfig) -> ShotframeResult<Box<dyn VideoEncoder>> {
        config.validate()?;
        if self.failure == Some(InjectedFailure::Open) {
            return Err(ShotframeError::capture_unavailable("injected open failure"));
        }
        Ok(Box::new(InMemoryEncoder {
            config: config.clone(),
            failure: self.failure,
            started: false,
            stopped: false,
            pending: Vec::new(),
        }))
    }
}

/// Encoder half of [`InMemoryBackend`].
#[derive(Debug)]
pub struct InMemoryEncoder {
    config: EncoderConfig,
    failure: Option<InjectedFailure>,
    started: bool,
    stopped: bool,
    pending: Vec<Vec<u8>>,
}

impl VideoEncoder for InMemoryEncoder {
    fn start(&mut self) -> ShotframeResult<()> {
        if self.failure == Some(InjectedFailure::Start) {
            return Err(ShotframeError::capture_unavailable("injected start failure"));
        }
        if self.started {
            return Err(ShotframeError::validation("encoder already started"));
        }
        self.started = true;
        let mut header = b"SFRM".to_vec();
        header.extend_from_slice(self.config.format.to_string().as_bytes());
        self.pending.push(header);
        Ok(())
    }

    fn push_frame(&mut self, frame: &CapturedFrame<'_>) -> ShotframeResult<()> {
        if !self.started || self.stopped {
            return Err(ShotframeError::validation("encoder is not recording"));
        }
        if self.failure == Some(InjectedFailure::Frame(frame.index.0)) {
            return Err(ShotframeError::encoding(format!(
                "injected failure at frame {}",
                frame.index.0
            )));
        }
        if (frame.width, frame.height) != (self.config.width, self.config.height)
            || frame.rgba.len() != self.config.frame_len()
        {
            return Err(ShotframeError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.config.width, self.config.height
            )));
        }
        let mut chunk = frame.index.0.to_le_bytes().to_vec();
        chunk.extend_from_slice(&frame.rgba[..4]);
        self.pending.push(chunk);
        Ok(())
    }

    fn take_chunks(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.pending)
    }

    fn stop(&mut self) -> ShotframeResult<Vec<Vec<u8>>> {
        if self.failure == Some(InjectedFailure::Stop) {
            return Err(ShotframeError::encoding("injected stop failure"));
        }
        if !self.started {
            return Err(ShotframeError::validation("encoder was never started"));
        }
        if !self.stopped {
            self.stopped = true;
            self.pending.push(b"END".to_vec());
        }
        Ok(self.take_chunks())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/encoder.rs"]
mod tests;
