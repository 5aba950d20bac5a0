use std::time::Instant;

use crate::foundation::error::{ShotframeError, ShotframeResult};

/// Lifecycle of one export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportState {
    /// Created, nothing allocated yet.
    Idle,
    /// Allocating the private surface and loading the playback clone.
    Preparing,
    /// Rendering, capturing and encoding frames.
    Recording,
    /// Collecting the encoded artifact and handing it to the download collaborator.
    Finalizing,
    /// Artifact delivered.
    Done,
    /// Aborted; no artifact was produced.
    Failed,
}

impl ExportState {
    /// Whether the job can make no further progress.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Allowed transitions: the happy path in order, or any non-terminal state to `Failed`.
    pub fn can_transition_to(self, next: ExportState) -> bool {
        use ExportState::*;
        matches!(
            (self, next),
            (Idle, Preparing) | (Preparing, Recording) | (Recording, Finalizing) | (Finalizing, Done)
        ) || (next == Failed && !self.is_terminal())
    }

    /// Lowercase name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Preparing => "preparing",
            Self::Recording => "recording",
            Self::Finalizing => "finalizing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

/// Per-export bookkeeping, discarded when the export completes or fails.
#[derive(Debug)]
pub struct ExportJob {
    state: ExportState,
    recorded_chunks: Vec<Vec<u8>>,
    started_at: Option<Instant>,
    source_file_name: String,
}

impl ExportJob {
    /// New idle job for the named source file.
    pub fn new(source_file_name: impl Into<String>) -> Self {
        Self {
            state: ExportState::Idle,
            recorded_chunks: Vec::new(),
            started_at: None,
            source_file_name: source_file_name.into(),
        }
    }

    /// Current state.
    pub fn state(&self) -> ExportState {
        self.state
    }

    /// Original file name of the exported media.
    pub fn source_file_name(&self) -> &str {
        &self.source_file_name
    }

    /// Wall-clock start of recording.
    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Move to `next`, rejecting transitions outside the state machine.
    pub fn transition(&mut self, next: ExportState) -> ShotframeResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(ShotframeError::validation(format!(
                "invalid export transition {} -> {}",
                self.state.as_str(),
                next.as_str()
            )));
        }
        if next == ExportState::Recording {
            self.started_at = Some(Instant::now());
        }
        if next == ExportState::Failed {
            self.recorded_chunks.clear();
        }
        tracing::info!(state = next.as_str(), "export state");
        self.state = next;
        Ok(())
    }

    /// Append encoder output in emission order; empty fragments are skipped.
    pub fn record_chunks(&mut self, chunks: impl IntoIterator<Item = Vec<u8>>) {
        self.recorded_chunks
            .extend(chunks.into_iter().filter(|c| !c.is_empty()));
    }

    /// Number of fragments recorded so far.
    pub fn chunk_count(&self) -> usize {
        self.recorded_chunks.len()
    }

    /// Concatenate all fragments into one artifact, leaving the job empty.
    pub fn take_artifact(&mut self) -> Vec<u8> {
        let total = self.recorded_chunks.iter().map(Vec::len).sum();
        let mut out = Vec::with_capacity(total);
        for chunk in self.recorded_chunks.drain(..) {
            out.extend_from_slice(&chunk);
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/job.rs"]
mod tests;
