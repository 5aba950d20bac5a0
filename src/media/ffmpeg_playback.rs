use std::io::Read as _;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use crate::foundation::core::Fps;
use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::media::frame::{MediaFrame, premultiply_rgba8_in_place};
use crate::media::playback::Playback;
use crate::media::tools::FfmpegTools;
use crate::media::video::VideoInfo;

/// Muted video playback backed by its own `ffmpeg` decode process.
///
/// Frames are resampled to a fixed rate and streamed as raw RGBA; every handle spawns an
/// independent process, so a preview and an export never share decoder state.
pub struct FfmpegPlayback {
    tools: FfmpegTools,
    info: VideoInfo,
    fps: Fps,
    decoder: Option<Decoder>,
    frame: Option<MediaFrame>,
    frame_index: u64,
    ended: bool,
}

struct Decoder {
    child: Child,
    stdout: ChildStdout,
    stderr: Option<JoinHandle<String>>,
}

impl FfmpegPlayback {
    /// Prepare playback; no process is spawned until data is requested.
    pub fn new(tools: FfmpegTools, info: VideoInfo, fps: Fps) -> Self {
        Self {
            tools,
            info,
            fps,
            decoder: None,
            frame: None,
            frame_index: 0,
            ended: false,
        }
    }

    /// Probed source properties.
    pub fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn frame_len(&self) -> usize {
        self.info.width as usize * self.info.height as usize * 4
    }

    fn spawn(&self) -> ShotframeResult<Decoder> {
        let mut cmd = Command::new(&self.tools.ffmpeg);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd.args(["-v", "error", "-nostdin", "-i"])
            .arg(&self.info.source_path)
            .args([
                "-an",
                "-vf",
                &format!("fps={}/{}", self.fps.num, self.fps.den),
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "pipe:1",
            ]);

        let mut child = cmd.spawn().map_err(|e| {
            ShotframeError::media_load(format!(
                "failed to spawn ffmpeg for '{}': {e}",
                self.info.source_path.display()
            ))
        })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ShotframeError::media_load("failed to open ffmpeg stdout"))?;
        let stderr = child.stderr.take().map(|mut err| {
            std::thread::spawn(move || {
                let mut text = String::new();
                let _ = err.read_to_string(&mut text);
                text
            })
        });

        tracing::debug!(
            path = %self.info.source_path.display(),
            width = self.info.width,
            height = self.info.height,
            "spawned ffmpeg decoder"
        );
        Ok(Decoder {
            child,
            stdout,
            stderr,
        })
    }

    fn restart(&mut self) -> ShotframeResult<()> {
        if let Some(old) = self.decoder.take() {
            old.shutdown();
        }
        self.decoder = Some(self.spawn()?);
        self.frame_index = 0;
        self.ended = false;
        self.frame = None;
        if !self.read_next()? {
            return Err(ShotframeError::media_load(format!(
                "ffmpeg produced no frames for '{}'",
                self.info.source_path.display()
            )));
        }
        Ok(())
    }

    /// Read one frame into the current buffer; `false` at end of stream.
    fn read_next(&mut self) -> ShotframeResult<bool> {
        let len = self.frame_len();
        let Some(decoder) = self.decoder.as_mut() else {
            return Ok(false);
        };

        let mut fresh = Vec::new();
        let buf = match self.frame.as_mut().and_then(MediaFrame::pixels_mut) {
            Some(buf) => buf,
            None => {
                fresh.resize(len, 0);
                &mut fresh
            }
        };

        let filled = read_full(&mut decoder.stdout, buf).map_err(|e| {
            ShotframeError::media_load(format!("failed to read decoded frame: {e}"))
        })?;
        if filled == 0 {
            if let Some(d) = self.decoder.take() {
                d.finish()?;
            }
            return Ok(false);
        }
        if filled != len {
            return Err(ShotframeError::media_load(format!(
                "truncated decoded frame: got {filled} bytes, expected {len}"
            )));
        }

        premultiply_rgba8_in_place(buf);
        if !fresh.is_empty() {
            match self.frame.as_mut() {
                Some(frame) => frame.replace_pixels(fresh),
                None => {
                    self.frame = Some(MediaFrame::new(self.info.width, self.info.height, fresh)?)
                }
            }
        }
        Ok(true)
    }
}

impl Playback for FfmpegPlayback {
    fn wait_for_data(&mut self) -> ShotframeResult<()> {
        if self.frame.is_none() {
            self.restart()?;
        }
        Ok(())
    }

    fn play_from_start(&mut self) -> ShotframeResult<()> {
        if self.frame.is_some() && self.frame_index == 0 && !self.ended {
            return Ok(());
        }
        self.restart()
    }

    fn advance(&mut self) -> ShotframeResult<()> {
        if self.ended {
            return Ok(());
        }
        if self.read_next()? {
            self.frame_index += 1;
        } else {
            self.ended = true;
        }
        Ok(())
    }

    fn current_frame(&self) -> Option<&MediaFrame> {
        self.frame.as_ref()
    }

    fn current_time_secs(&self) -> f64 {
        if self.ended {
            return self.duration_secs();
        }
        let t = self.fps.frames_to_secs(self.frame_index);
        if self.info.duration_secs > 0.0 {
            t.min(self.info.duration_secs)
        } else {
            t
        }
    }

    fn duration_secs(&self) -> f64 {
        self.info.duration_secs
    }

    fn ended(&self) -> bool {
        self.ended
    }
}

impl Drop for FfmpegPlayback {
    fn drop(&mut self) {
        if let Some(d) = self.decoder.take() {
            d.shutdown();
        }
    }
}

impl Decoder {
    fn finish(mut self) -> ShotframeResult<()> {
        let status = self
            .child
            .wait()
            .map_err(|e| ShotframeError::media_load(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr = self
            .stderr
            .take()
            .and_then(|h| h.join().ok())
            .unwrap_or_default();
        if !status.success() {
            return Err(ShotframeError::media_load(format!(
                "ffmpeg decode exited with status {status}: {}",
                stderr.trim()
            )));
        }
        Ok(())
    }

    fn shutdown(mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        if let Some(h) = self.stderr.take() {
            let _ = h.join();
        }
    }
}

fn read_full(r: &mut impl std::io::Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
