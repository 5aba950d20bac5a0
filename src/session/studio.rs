use std::path::Path;

use crate::export::download::Download;
use crate::export::encoder::EncoderBackend;
use crate::export::pipeline::{ExportObserver, ExportPipeline, ExportReport};
use crate::export::settings::ExportSettings;
use crate::export::still::{StillFormat, StillReport, export_still};
use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::media::kind::MediaKind;
use crate::media::source::MediaSource;
use crate::session::context::RenderContext;
use crate::style::handle::StyleHandle;
use crate::style::scene::SceneStyle;

/// Top-level application state: the shared style plus the active [`RenderContext`].
pub struct Studio {
    style: StyleHandle,
    settings: ExportSettings,
    context: Option<RenderContext>,
}

impl Studio {
    /// Empty studio with an initial style.
    pub fn new(style: SceneStyle, settings: ExportSettings) -> ShotframeResult<Self> {
        style.validate()?;
        settings.validate()?;
        Ok(Self {
            style: StyleHandle::new(style),
            settings,
            context: None,
        })
    }

    /// Shared style handle (the configuration surface writes through it).
    pub fn style(&self) -> &StyleHandle {
        &self.style
    }

    /// Export settings.
    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Active context, if a file is loaded.
    pub fn context(&self) -> Option<&RenderContext> {
        self.context.as_ref()
    }

    /// Load a file, deriving its declared type from the extension.
    pub fn load_path(&mut self, path: &Path) -> ShotframeResult<MediaKind> {
        let declared = MediaKind::declared_type_for(path)?;
        self.load(path, declared)
    }

    /// Load a file with an explicit declared type.
    ///
    /// On any error the current context is left untouched.
    #[tracing::instrument(level = "info", skip(self))]
    pub fn load(&mut self, path: &Path, declared_type: &str) -> ShotframeResult<MediaKind> {
        let kind = MediaKind::classify(declared_type).inspect_err(|err| {
            tracing::warn!(error = %err, "rejected media");
        })?;
        let source = MediaSource::load(path, kind, &self.settings.tools)?;
        self.attach(source)?;
        Ok(kind)
    }

    /// Make an already loaded source current, discarding the previous context afterwards.
    pub fn attach(&mut self, source: MediaSource) -> ShotframeResult<()> {
        let next = RenderContext::start(source, self.style.clone(), self.settings.fps)?;
        if let Some(mut old) = self.context.replace(next) {
            old.live_mut().stop();
        }
        Ok(())
    }

    /// Edit the style and reschedule the preview so the change shows on the next refresh.
    pub fn update_style(&mut self, edit: impl FnOnce(&mut SceneStyle)) -> ShotframeResult<()> {
        self.style.update(edit)?;
        if let Some(ctx) = self.context.as_mut() {
            ctx.live_mut().restart();
        }
        Ok(())
    }

    /// Drive one display refresh; `false` when nothing is loaded or scheduled.
    pub fn refresh(&mut self) -> ShotframeResult<bool> {
        match self.context.as_mut() {
            Some(ctx) => ctx.live_mut().on_refresh(),
            None => Ok(false),
        }
    }

    /// Stop the preview and drop the loaded source.
    pub fn clear(&mut self) {
        if let Some(mut ctx) = self.context.take() {
            ctx.live_mut().stop();
        }
    }

    fn require(&self, kind: MediaKind) -> ShotframeResult<&MediaSource> {
        let source = self
            .context
            .as_ref()
            .map(RenderContext::source)
            .ok_or_else(|| ShotframeError::validation("no media loaded"))?;
        if source.kind() != kind {
            return Err(ShotframeError::validation(format!(
                "loaded media is {:?}, expected {kind:?}",
                source.kind()
            )));
        }
        Ok(source)
    }

    /// Record the loaded video through an independent playback clone.
    pub fn export_video(
        &self,
        backend: &dyn EncoderBackend,
        download: &mut dyn Download,
        observer: &mut dyn ExportObserver,
    ) -> ShotframeResult<ExportReport> {
        let source = self.require(MediaKind::Video)?;
        let clone = source.open_playback(self.settings.fps);
        ExportPipeline::new(&self.settings, backend).run(
            &source.file_name(),
            clone,
            &self.style,
            download,
            observer,
        )
    }

    /// Render the loaded image once and deliver it.
    pub fn export_still(
        &self,
        format: StillFormat,
        download: &mut dyn Download,
    ) -> ShotframeResult<StillReport> {
        let source = self.require(MediaKind::Image)?;
        let MediaSource::Image { frame, .. } = source else {
            return Err(ShotframeError::validation("loaded media is not an image"));
        };
        export_still(
            frame,
            &self.style.snapshot(),
            format,
            &self.settings.label,
            &source.file_name(),
            download,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/studio.rs"]
mod tests;
