/// Convenience result type used across shotframe.
pub type ShotframeResult<T> = Result<T, ShotframeError>;

/// Top-level error taxonomy used by compositor, preview and export APIs.
#[derive(thiserror::Error, Debug)]
pub enum ShotframeError {
    /// Malformed style or layout input (bad frame ratio, out-of-range values).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Source file could not be read or decoded.
    #[error("media load error: {0}")]
    MediaLoad(String),

    /// Declared media type is neither video nor image.
    #[error("unsupported media: {0}")]
    UnsupportedMedia(String),

    /// No capture stream or no usable encoder.
    #[error("capture unavailable: {0}")]
    CaptureUnavailable(String),

    /// The encoder failed while recording or finalizing.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Internal contract violation (buffer sizes, call ordering).
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShotframeError {
    /// Build a [`ShotframeError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`ShotframeError::MediaLoad`] value.
    pub fn media_load(msg: impl Into<String>) -> Self {
        Self::MediaLoad(msg.into())
    }

    /// Build a [`ShotframeError::UnsupportedMedia`] value.
    pub fn unsupported_media(msg: impl Into<String>) -> Self {
        Self::UnsupportedMedia(msg.into())
    }

    /// Build a [`ShotframeError::CaptureUnavailable`] value.
    pub fn capture_unavailable(msg: impl Into<String>) -> Self {
        Self::CaptureUnavailable(msg.into())
    }

    /// Build a [`ShotframeError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`ShotframeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether the calling UI should restore its pre-export controls after this error.
    pub fn is_export_failure(&self) -> bool {
        matches!(
            self,
            Self::CaptureUnavailable(_) | Self::Encoding(_) | Self::MediaLoad(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
