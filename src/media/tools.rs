use std::ffi::OsString;
use std::process::{Command, Stdio};

/// Environment variable overriding the `ffmpeg` binary.
pub const FFMPEG_ENV: &str = "SHOTFRAME_FFMPEG";
/// Environment variable overriding the `ffprobe` binary.
pub const FFPROBE_ENV: &str = "SHOTFRAME_FFPROBE";

/// Locations of the external ffmpeg tools used for video decode and encode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FfmpegTools {
    /// `ffmpeg` binary name or path.
    pub ffmpeg: OsString,
    /// `ffprobe` binary name or path.
    pub ffprobe: OsString,
}

impl Default for FfmpegTools {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".into(),
            ffprobe: "ffprobe".into(),
        }
    }
}

impl FfmpegTools {
    /// Defaults with `SHOTFRAME_FFMPEG` / `SHOTFRAME_FFPROBE` applied.
    pub fn from_env() -> Self {
        let mut tools = Self::default();
        if let Some(v) = std::env::var_os(FFMPEG_ENV).filter(|v| !v.is_empty()) {
            tools.ffmpeg = v;
        }
        if let Some(v) = std::env::var_os(FFPROBE_ENV).filter(|v| !v.is_empty()) {
            tools.ffprobe = v;
        }
        tools
    }

    /// Whether `ffmpeg -version` runs successfully.
    pub fn has_ffmpeg(&self) -> bool {
        runs_ok(&self.ffmpeg)
    }

    /// Whether `ffprobe -version` runs successfully.
    pub fn has_ffprobe(&self) -> bool {
        runs_ok(&self.ffprobe)
    }
}

fn runs_ok(bin: &OsString) -> bool {
    Command::new(bin)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
