pub(crate) mod color;
pub(crate) mod handle;
pub(crate) mod ratio;
pub(crate) mod scene;
