pub(crate) mod ffmpeg_playback;
pub(crate) mod frame;
pub(crate) mod image;
pub(crate) mod kind;
pub(crate) mod playback;
pub(crate) mod source;
pub(crate) mod tools;
pub(crate) mod video;
