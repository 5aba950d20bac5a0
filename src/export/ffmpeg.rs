use std::cell::OnceCell;
use std::io::{Read as _, Write as _};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::thread::JoinHandle;

use crate::export::capture::CapturedFrame;
use crate::export::codec::{Container, VideoCodec, VideoFormat};
use crate::export::encoder::{EncoderBackend, EncoderConfig, VideoEncoder};
use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::media::tools::FfmpegTools;

const READ_CHUNK: usize = 64 * 1024;

/// Encoder backend driving the system `ffmpeg` binary.
///
/// Codec support is probed once with `ffmpeg -encoders` and cached for the backend's lifetime.
#[derive(Debug)]
pub struct FfmpegBackend {
    tools: FfmpegTools,
    encoders: OnceCell<Vec<String>>,
}

impl FfmpegBackend {
    /// Backend using the given tool locations.
    pub fn new(tools: FfmpegTools) -> Self {
        Self {
            tools,
            encoders: OnceCell::new(),
        }
    }

    fn encoders(&self) -> &[String] {
        self.encoders.get_or_init(|| {
            let output = Command::new(&self.tools.ffmpeg)
                .args(["-hide_banner", "-encoders"])
                .stdin(Stdio::null())
                .stderr(Stdio::null())
                .output();
            match output {
                Ok(out) if out.status.success() => {
                    parse_encoder_list(&String::from_utf8_lossy(&out.stdout))
                }
                Ok(out) => {
                    tracing::warn!(status = %out.status, "ffmpeg -encoders failed");
                    Vec::new()
                }
                Err(err) => {
                    tracing::warn!(error = %err, "ffmpeg not runnable");
                    Vec::new()
                }
            }
        })
    }
}

impl EncoderBackend for FfmpegBackend {
    fn supports(&self, format: VideoFormat) -> bool {
        let wanted = format.ffmpeg_encoder();
        self.encoders().iter().any(|e| e == wanted)
    }

    fn open(&self, config: &EncoderConfig) -> ShotframeResult<Box<dyn VideoEncoder>> {
        config.validate()?;
        Ok(Box::new(FfmpegEncoder {
            tools: self.tools.clone(),
            config: config.clone(),
            process: None,
            finished: false,
        }))
    }
}

/// Names from the `ffmpeg -encoders` table (`" V....D libx264  ..."`).
pub(crate) fn parse_encoder_list(text: &str) -> Vec<String> {
    text.lines()
        .skip_while(|l| !l.trim_start().starts_with("------"))
        .skip(1)
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let flags = cols.next()?;
            let name = cols.next()?;
            flags.starts_with('V').then(|| name.to_owned())
        })
        .collect()
}

/// Streams raw frames into `ffmpeg` and reads a streamable container back from its stdout.
pub struct FfmpegEncoder {
    tools: FfmpegTools,
    config: EncoderConfig,
    process: Option<EncodeProcess>,
    finished: bool,
}

struct EncodeProcess {
    child: Child,
    stdin: Option<ChildStdin>,
    chunks: Receiver<Vec<u8>>,
    reader: Option<JoinHandle<std::io::Result<()>>>,
    stderr: Option<JoinHandle<String>>,
}

impl FfmpegEncoder {
    fn args(&self) -> Vec<String> {
        let cfg = &self.config;
        let fmt = cfg.format;
        let mut args: Vec<String> = [
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
        ]
        .map(String::from)
        .to_vec();
        args.push("-s".into());
        args.push(format!("{}x{}", cfg.width, cfg.height));
        args.push("-framerate".into());
        args.push(format!("{}/{}", cfg.fps.num, cfg.fps.den));
        args.extend(["-i", "pipe:0", "-an"].map(String::from));

        let (even_w, even_h) = even_dims(cfg.width, cfg.height);
        if (even_w, even_h) != (cfg.width, cfg.height) {
            args.push("-vf".into());
            args.push(format!(
                "pad={even_w}:{even_h}:0:0:color={}",
                cfg.background.to_ffmpeg_hex()
            ));
        }

        args.push("-c:v".into());
        args.push(fmt.ffmpeg_encoder().into());
        args.push("-b:v".into());
        args.push(cfg.bitrate_bps.to_string());
        args.extend(["-pix_fmt", "yuv420p"].map(String::from));
        if matches!(fmt.codec, VideoCodec::Vp8 | VideoCodec::Vp9) {
            args.extend(["-deadline", "realtime"].map(String::from));
        }
        if fmt.container == Container::Mp4 {
            args.extend(
                ["-movflags", "frag_keyframe+empty_moov+default_base_moof"].map(String::from),
            );
        }
        args.push("-f".into());
        args.push(fmt.ffmpeg_muxer().into());
        args.push("pipe:1".into());
        args
    }

    fn spawn(&self) -> ShotframeResult<EncodeProcess> {
        let mut child = Command::new(&self.tools.ffmpeg)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ShotframeError::capture_unavailable(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ShotframeError::capture_unavailable("failed to open ffmpeg stdin"))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| ShotframeError::capture_unavailable("failed to open ffmpeg stdout"))?;

        let (tx, rx) = channel();
        let reader = std::thread::spawn(move || -> std::io::Result<()> {
            let mut buf = vec![0u8; READ_CHUNK];
            loop {
                let n = match stdout.read(&mut buf) {
                    Ok(0) => return Ok(()),
                    Ok(n) => n,
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                };
                if tx.send(buf[..n].to_vec()).is_err() {
                    return Ok(());
                }
            }
        });
        let stderr = child.stderr.take().map(|mut err| {
            std::thread::spawn(move || {
                let mut text = String::new();
                let _ = err.read_to_string(&mut text);
                text
            })
        });

        tracing::debug!(
            width = self.config.width,
            height = self.config.height,
            format = %self.config.format,
            "spawned ffmpeg encoder"
        );
        Ok(EncodeProcess {
            child,
            stdin: Some(stdin),
            chunks: rx,
            reader: Some(reader),
            stderr,
        })
    }
}

impl VideoEncoder for FfmpegEncoder {
    fn start(&mut self) -> ShotframeResult<()> {
        if self.process.is_some() || self.finished {
            return Err(ShotframeError::validation("encoder already started"));
        }
        self.process = Some(self.spawn()?);
        Ok(())
    }

    fn push_frame(&mut self, frame: &CapturedFrame<'_>) -> ShotframeResult<()> {
        if (frame.width, frame.height) != (self.config.width, self.config.height)
            || frame.rgba.len() != self.config.frame_len()
        {
            return Err(ShotframeError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.config.width, self.config.height
            )));
        }
        let Some(stdin) = self.process.as_mut().and_then(|p| p.stdin.as_mut()) else {
            return Err(ShotframeError::validation("encoder is not recording"));
        };
        stdin.write_all(frame.rgba).map_err(|e| {
            ShotframeError::encoding(format!("failed to write frame to ffmpeg stdin: {e}"))
        })
    }

    fn take_chunks(&mut self) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        if let Some(p) = self.process.as_ref() {
            loop {
                match p.chunks.try_recv() {
                    Ok(chunk) => out.push(chunk),
                    Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
                }
            }
        }
        out
    }

    fn stop(&mut self) -> ShotframeResult<Vec<Vec<u8>>> {
        let Some(mut p) = self.process.take() else {
            return Err(ShotframeError::validation("encoder was never started"));
        };
        self.finished = true;
        drop(p.stdin.take());

        let read = p.reader.take().map(|h| h.join());
        let mut rest: Vec<Vec<u8>> = p.chunks.try_iter().collect();
        let status = p.child.wait().map_err(|e| {
            ShotframeError::encoding(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr = p.stderr.take().and_then(|h| h.join().ok()).unwrap_or_default();

        if !status.success() {
            return Err(ShotframeError::encoding(format!(
                "ffmpeg exited with status {status}: {}",
                stderr.trim()
            )));
        }
        match read {
            Some(Ok(Ok(()))) | None => {}
            Some(Ok(Err(e))) => {
                return Err(ShotframeError::encoding(format!(
                    "failed to read encoded output: {e}"
                )));
            }
            Some(Err(_)) => return Err(ShotframeError::encoding("encoder reader thread panicked")),
        }
        rest.retain(|c| !c.is_empty());
        Ok(rest)
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        if let Some(mut p) = self.process.take() {
            drop(p.stdin.take());
            let _ = p.child.kill();
            let _ = p.child.wait();
            if let Some(h) = p.reader.take() {
                let _ = h.join();
            }
            if let Some(h) = p.stderr.take() {
                let _ = h.join();
            }
        }
    }
}

/// Round both sides up to even (yuv420p needs even sizes).
pub(crate) fn even_dims(width: u32, height: u32) -> (u32, u32) {
    (width + width % 2, height + height % 2)
}

#[cfg(test)]
#[path = "../../tests/unit/export/ffmpeg.rs"]
mod tests;
