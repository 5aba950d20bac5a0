use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{ShotframeError, ShotframeResult};

/// Target aspect ratio of the output canvas.
///
/// Serialized as `"auto"` or `"W:H"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrameRatioSpec {
    /// Follow the media's intrinsic ratio.
    #[default]
    Auto,
    /// Explicit `width:height` ratio; both components are positive.
    Ratio {
        /// Width component.
        width: NonZeroU32,
        /// Height component.
        height: NonZeroU32,
    },
}

impl FrameRatioSpec {
    /// Build an explicit ratio, rejecting zero components.
    pub fn ratio(width: u32, height: u32) -> ShotframeResult<Self> {
        match (NonZeroU32::new(width), NonZeroU32::new(height)) {
            (Some(width), Some(height)) => Ok(Self::Ratio { width, height }),
            _ => Err(ShotframeError::configuration(format!(
                "frame ratio components must be positive, got {width}:{height}"
            ))),
        }
    }

    /// `width / height` for explicit ratios, `None` for `Auto`.
    pub fn target(self) -> Option<f64> {
        match self {
            Self::Auto => None,
            Self::Ratio { width, height } => Some(f64::from(width.get()) / f64::from(height.get())),
        }
    }
}

impl FromStr for FrameRatioSpec {
    type Err = ShotframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        let Some((w, h)) = s.split_once(':') else {
            return Err(ShotframeError::configuration(format!(
                "frame ratio must be \"auto\" or \"W:H\", got \"{s}\""
            )));
        };
        let parse = |part: &str| {
            part.trim().parse::<u32>().map_err(|_| {
                ShotframeError::configuration(format!(
                    "frame ratio component \"{part}\" is not a positive integer"
                ))
            })
        };
        Self::ratio(parse(w)?, parse(h)?)
    }
}

impl fmt::Display for FrameRatioSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Ratio { width, height } => write!(f, "{width}:{height}"),
        }
    }
}

impl Serialize for FrameRatioSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FrameRatioSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/ratio.rs"]
mod tests;
