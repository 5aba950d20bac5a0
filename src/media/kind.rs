use std::path::Path;

use crate::foundation::error::{ShotframeError, ShotframeResult};

/// Media class derived from a declared MIME type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// `video/*`
    Video,
    /// `image/*`
    Image,
}

impl MediaKind {
    /// Classify a declared type such as `"video/mp4"`; parameters after `;` are ignored.
    pub fn classify(declared_type: &str) -> ShotframeResult<Self> {
        let essence = declared_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.split_once('/') {
            Some(("video", sub)) if !sub.is_empty() => Ok(Self::Video),
            Some(("image", sub)) if !sub.is_empty() => Ok(Self::Image),
            _ => Err(ShotframeError::unsupported_media(format!(
                "\"{declared_type}\" is neither a video nor an image type"
            ))),
        }
    }

    /// Declared type guessed from the file extension.
    pub fn declared_type_for(path: &Path) -> ShotframeResult<&'static str> {
        mime_guess::from_path(path).first_raw().ok_or_else(|| {
            ShotframeError::unsupported_media(format!(
                "cannot determine a media type for '{}'",
                path.display()
            ))
        })
    }

    /// Classify a file by its extension.
    pub fn from_path(path: &Path) -> ShotframeResult<Self> {
        Self::classify(Self::declared_type_for(path)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/kind.rs"]
mod tests;
