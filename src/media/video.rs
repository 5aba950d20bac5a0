use std::path::{Path, PathBuf};

use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::media::tools::FfmpegTools;

/// Probed properties of a video file.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoInfo {
    /// Source file.
    pub source_path: PathBuf,
    /// Intrinsic width.
    pub width: u32,
    /// Intrinsic height.
    pub height: u32,
    /// Container duration in seconds (`0.0` when unknown).
    pub duration_secs: f64,
}

/// Run `ffprobe` and read the first video stream's size and the container duration.
pub fn probe_video(tools: &FfmpegTools, source_path: &Path) -> ShotframeResult<VideoInfo> {
    let out = std::process::Command::new(&tools.ffprobe)
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| ShotframeError::media_load(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(ShotframeError::media_load(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    let mut info = parse_probe_json(&out.stdout)?;
    info.source_path = source_path.to_path_buf();
    Ok(info)
}

pub(crate) fn parse_probe_json(json: &[u8]) -> ShotframeResult<VideoInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        duration: Option<String>,
        #[serde(default)]
        side_data_list: Vec<ProbeSideData>,
        #[serde(default)]
        tags: ProbeTags,
    }
    #[derive(serde::Deserialize)]
    struct ProbeSideData {
        rotation: Option<f64>,
    }
    #[derive(serde::Deserialize, Default)]
    struct ProbeTags {
        rotate: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        #[serde(default)]
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| ShotframeError::media_load(format!("ffprobe json parse failed: {e}")))?;
    let stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| ShotframeError::media_load("no video stream found"))?;
    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(ShotframeError::media_load("missing video dimensions from ffprobe")),
    };
    // ffmpeg autorotates on decode, so report the displayed size.
    let rotation = stream
        .side_data_list
        .iter()
        .find_map(|d| d.rotation)
        .or_else(|| {
            stream
                .tags
                .rotate
                .as_deref()
                .and_then(|r| r.trim().parse::<f64>().ok())
        })
        .filter(|r| r.is_finite())
        .unwrap_or(0.0);
    let quarter_turns = (rotation / 90.0).round() as i64;
    let (width, height) = if quarter_turns.rem_euclid(2) == 1 {
        (height, width)
    } else {
        (width, height)
    };

    let parse_secs = |s: &Option<String>| {
        s.as_deref()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
    };
    let duration_secs = parsed
        .format
        .as_ref()
        .and_then(|f| parse_secs(&f.duration))
        .or_else(|| parse_secs(&stream.duration))
        .unwrap_or(0.0);

    Ok(VideoInfo {
        source_path: PathBuf::new(),
        width,
        height,
        duration_secs,
    })
}
