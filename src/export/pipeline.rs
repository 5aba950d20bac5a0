use std::path::PathBuf;

use crate::compositor::scene::compose_scene;
use crate::export::capture::CaptureStream;
use crate::export::codec::{NegotiatedFormat, negotiate_format};
use crate::export::download::{Artifact, Download};
use crate::export::encoder::{EncoderBackend, EncoderConfig};
use crate::export::job::{ExportJob, ExportState};
use crate::export::naming::output_file_name;
use crate::export::progress::{ExportProgress, ProgressTracker};
use crate::export::settings::ExportSettings;
use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::layout::calculator::compute_geometry;
use crate::media::playback::Playback;
use crate::render::cpu::CpuSurface;
use crate::style::handle::StyleHandle;

/// UI hooks for a running export. All methods default to no-ops.
pub trait ExportObserver {
    /// The job entered `state`.
    fn on_state(&mut self, _state: ExportState) {}

    /// One progress sample per recorded frame.
    fn on_progress(&mut self, _progress: &ExportProgress) {}

    /// The export failed; pre-export controls should be restored.
    fn on_failed(&mut self, _error: &ShotframeError) {}
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl ExportObserver for NoopObserver {}

/// Summary of a finished video export.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportReport {
    /// Name the artifact was delivered under.
    pub file_name: String,
    /// MIME type of the artifact.
    pub mime_type: String,
    /// Negotiated container and codec.
    pub format: NegotiatedFormat,
    /// Frames captured and encoded.
    pub frames: u64,
    /// Artifact size.
    pub bytes: usize,
    /// Where the download collaborator stored it, if anywhere.
    pub location: Option<PathBuf>,
    /// Exported canvas width.
    pub canvas_width: u32,
    /// Exported canvas height.
    pub canvas_height: u32,
}

/// Offline render-and-capture loop reproducing the preview into an encoded file.
///
/// Runs on a private surface and its own playback clone, so a live preview keeps running
/// undisturbed. There is no cancellation: a run ends at end-of-media or on the first error.
pub struct ExportPipeline<'a> {
    settings: &'a ExportSettings,
    backend: &'a dyn EncoderBackend,
}

impl<'a> ExportPipeline<'a> {
    /// Pipeline encoding through `backend`.
    pub fn new(settings: &'a ExportSettings, backend: &'a dyn EncoderBackend) -> Self {
        Self { settings, backend }
    }

    /// Run one export to completion.
    ///
    /// The style is re-read on every tick; the canvas size is fixed from the snapshot taken
    /// while preparing. Any error moves the job to `Failed`, is reported to `observer`, and is
    /// returned; nothing is delivered in that case.
    #[tracing::instrument(level = "info", skip_all, fields(source = source_file_name))]
    pub fn run(
        &self,
        source_file_name: &str,
        clone: Box<dyn Playback>,
        style: &StyleHandle,
        download: &mut dyn Download,
        observer: &mut dyn ExportObserver,
    ) -> ShotframeResult<ExportReport> {
        let mut job = ExportJob::new(source_file_name);
        match self.run_job(&mut job, clone, style, download, observer) {
            Ok(report) => Ok(report),
            Err(err) => {
                if job.transition(ExportState::Failed).is_ok() {
                    observer.on_state(ExportState::Failed);
                }
                tracing::error!(error = %err, "export failed");
                observer.on_failed(&err);
                Err(err)
            }
        }
    }

    fn run_job(
        &self,
        job: &mut ExportJob,
        mut clone: Box<dyn Playback>,
        style: &StyleHandle,
        download: &mut dyn Download,
        observer: &mut dyn ExportObserver,
    ) -> ShotframeResult<ExportReport> {
        self.settings.validate()?;

        enter(job, observer, ExportState::Preparing)?;
        let prepared = style.snapshot();
        clone.wait_for_data()?;
        let (media_w, media_h) = clone
            .current_frame()
            .map(|f| (f.width, f.height))
            .ok_or_else(|| ShotframeError::media_load("playback clone has no decodable frame"))?;
        let duration = clone.duration_secs();
        if duration.is_nan() || duration <= 0.0 {
            return Err(ShotframeError::media_load(
                "video export needs media with a known, positive duration",
            ));
        }
        let geometry = compute_geometry(media_w, media_h, prepared.frame_ratio)?;
        let mut surface = CpuSurface::new(geometry.canvas_width, geometry.canvas_height)?;

        enter(job, observer, ExportState::Recording)?;
        let negotiated = negotiate_format(&self.settings.preferences, |f| {
            self.backend.supports(f)
        });
        let mut capture = CaptureStream::open(&surface, self.settings.fps, prepared.background)?;
        let mut encoder = self.backend.open(&EncoderConfig {
            width: geometry.canvas_width,
            height: geometry.canvas_height,
            fps: self.settings.fps,
            bitrate_bps: self.settings.bitrate_bps,
            format: negotiated.format,
            background: prepared.background,
        })?;
        encoder.start()?;
        clone.play_from_start()?;

        let started = job
            .started_at()
            .ok_or_else(|| ShotframeError::validation("recording started without a timestamp"))?;
        let mut tracker = ProgressTracker::since(started);
        loop {
            let tick_style = style.snapshot();
            let frame = clone
                .current_frame()
                .ok_or_else(|| ShotframeError::media_load("playback clone lost its frame"))?;
            compose_scene(&mut surface, &geometry, frame, &tick_style)?;
            let captured = capture.capture(&surface)?;
            encoder.push_frame(&captured)?;
            job.record_chunks(encoder.take_chunks());
            observer.on_progress(&tracker.sample(clone.current_time_secs(), duration));

            clone.advance()?;
            if clone.ended() {
                break;
            }
        }
        observer.on_progress(&tracker.sample(clone.current_time_secs(), duration));

        enter(job, observer, ExportState::Finalizing)?;
        job.record_chunks(encoder.stop()?);
        drop(encoder);
        drop(clone);
        drop(surface);

        let chunks = job.chunk_count();
        let bytes = job.take_artifact();
        if bytes.is_empty() {
            return Err(ShotframeError::encoding("encoder produced no output"));
        }
        let format = negotiated.format;
        let file_name = output_file_name(
            &self.settings.label,
            job.source_file_name(),
            format.extension(),
        );
        let size = bytes.len();
        tracing::info!(bytes = size, chunks, file_name = %file_name, "export finalized");
        let location = download.deliver(Artifact {
            file_name: file_name.clone(),
            mime_type: format.mime_type().to_owned(),
            bytes,
        })?;

        enter(job, observer, ExportState::Done)?;
        Ok(ExportReport {
            file_name,
            mime_type: format.mime_type().to_owned(),
            format: negotiated,
            frames: capture.frames_emitted(),
            bytes: size,
            location,
            canvas_width: geometry.canvas_width,
            canvas_height: geometry.canvas_height,
        })
    }
}

fn enter(
    job: &mut ExportJob,
    observer: &mut dyn ExportObserver,
    state: ExportState,
) -> ShotframeResult<()> {
    job.transition(state)?;
    observer.on_state(state);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
