pub(crate) mod capture;
pub(crate) mod codec;
pub(crate) mod download;
pub(crate) mod encoder;
pub(crate) mod ffmpeg;
pub(crate) mod job;
pub(crate) mod naming;
pub(crate) mod pipeline;
pub(crate) mod progress;
pub(crate) mod settings;
pub(crate) mod still;
