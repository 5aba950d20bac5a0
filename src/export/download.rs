use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context as _;

use crate::foundation::error::ShotframeResult;

/// A finished export ready for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Suggested file name, e.g. `"Shot Formatted clip.mp4"`.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub mime_type: String,
    /// Encoded content.
    pub bytes: Vec<u8>,
}

/// Receives finished artifacts (a save dialog, a directory, a test buffer).
pub trait Download {
    /// Hand over one artifact; returns where it ended up, if it has a location.
    fn deliver(&mut self, artifact: Artifact) -> ShotframeResult<Option<PathBuf>>;
}

/// Writes artifacts into a directory under their suggested name.
#[derive(Clone, Debug)]
pub struct DirectoryDownload {
    dir: PathBuf,
}

impl DirectoryDownload {
    /// Deliver into `dir`, created on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Download for DirectoryDownload {
    fn deliver(&mut self, artifact: Artifact) -> ShotframeResult<Option<PathBuf>> {
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("failed to create output directory '{}'", self.dir.display())
        })?;
        let path = self.dir.join(&artifact.file_name);
        std::fs::write(&path, &artifact.bytes)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        tracing::info!(
            path = %path.display(),
            bytes = artifact.bytes.len(),
            "artifact written"
        );
        Ok(Some(path))
    }
}

/// Keeps delivered artifacts in memory; clones share one buffer.
#[derive(Clone, Debug, Default)]
pub struct InMemoryDownload {
    delivered: Rc<RefCell<Vec<Artifact>>>,
}

impl InMemoryDownload {
    /// Empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, oldest first.
    pub fn artifacts(&self) -> Vec<Artifact> {
        self.delivered.borrow().clone()
    }

    /// Most recent artifact.
    pub fn last(&self) -> Option<Artifact> {
        self.delivered.borrow().last().cloned()
    }
}

impl Download for InMemoryDownload {
    fn deliver(&mut self, artifact: Artifact) -> ShotframeResult<Option<PathBuf>> {
        self.delivered.borrow_mut().push(artifact);
        Ok(None)
    }
}
