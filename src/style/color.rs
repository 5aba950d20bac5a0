use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::ShotframeError;

/// Opaque sRGB colour used for the scene background.
///
/// Parsed from `#RRGGBB` / `#RRGGBBAA` strings, `{ "r", "g", "b" }` objects or `[r, g, b]`
/// arrays with channels in `0..=1`. Any alpha component is discarded: the background always
/// fully overwrites the previous frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Build a colour from 8-bit channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Opaque black, the shadow base colour.
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Build a colour from unit-range floating-point channels.
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        Self::rgb(to_u8(r), to_u8(g), to_u8(b))
    }

    /// Premultiplied pixel value (always opaque).
    pub fn to_rgba8_premul(self) -> Rgba8Premul {
        Rgba8Premul::opaque(self.r, self.g, self.b)
    }

    /// `0xRRGGBB` form used by ffmpeg filter arguments.
    pub fn to_ffmpeg_hex(self) -> String {
        format!("0x{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0xfa, 0xfa, 0xfa)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ShotframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex(s).map_err(ShotframeError::configuration)
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            RgbObj { r: f64, g: f64, b: f64 },
            Arr(Vec<f64>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::RgbObj { r, g, b } => Ok(Self::from_unit(r, g, b)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] | [r, g, b, _] => Ok(Self::from_unit(*r, *g, *b)),
                _ => Err(serde::de::Error::custom(
                    "colour array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn parse_hex(s: &str) -> Result<Color, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() || !matches!(s.len(), 6 | 8) {
        return Err("hex colour must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned());
    }
    Ok(Color::rgb(
        hex_byte(&s[0..2])?,
        hex_byte(&s[2..4])?,
        hex_byte(&s[4..6])?,
    ))
}
