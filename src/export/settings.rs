use crate::export::codec::VideoFormat;
use crate::export::naming::DEFAULT_LABEL;
use crate::foundation::core::Fps;
use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::media::tools::FfmpegTools;

/// Default video bitrate, 3 Mbps.
pub const DEFAULT_BITRATE_BPS: u64 = 3_000_000;

/// Default JPEG quality for still exports.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Knobs shared by video and still exports.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportSettings {
    /// Label prefixed to output file names.
    pub label: String,
    /// Capture rate of the export loop.
    pub fps: Fps,
    /// Target video bitrate in bits per second.
    pub bitrate_bps: u64,
    /// Quality for JPEG stills, `1..=100`.
    pub jpeg_quality: u8,
    /// Codec preferences, best first.
    pub preferences: Vec<VideoFormat>,
    /// External tool locations.
    #[serde(skip)]
    pub tools: FfmpegTools,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_owned(),
            fps: Fps::CAPTURE,
            bitrate_bps: DEFAULT_BITRATE_BPS,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            preferences: VideoFormat::PREFERENCES.to_vec(),
            tools: FfmpegTools::default(),
        }
    }
}

impl ExportSettings {
    /// Defaults with tool overrides read from the environment.
    pub fn from_env() -> Self {
        Self {
            tools: FfmpegTools::from_env(),
            ..Self::default()
        }
    }

    /// Reject values the pipeline cannot honour.
    pub fn validate(&self) -> ShotframeResult<()> {
        Fps::new(self.fps.num, self.fps.den)?;
        if self.bitrate_bps == 0 {
            return Err(ShotframeError::configuration("video bitrate must be non-zero"));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ShotframeError::configuration(format!(
                "jpeg quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}
