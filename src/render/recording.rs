use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::media::frame::MediaFrame;
use crate::render::surface::DrawSurface;
use crate::style::color::Color;
use crate::style::scene::ShadowStyle;

/// One call recorded by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// [`DrawSurface::resize`] that changed the size.
    Resize {
        /// New width.
        width: u32,
        /// New height.
        height: u32,
    },
    /// [`DrawSurface::fill_background`].
    FillBackground(Color),
    /// [`DrawSurface::push_shadow`].
    PushShadow(ShadowStyle),
    /// [`DrawSurface::pop_shadow`].
    PopShadow,
    /// [`DrawSurface::fill_rounded_rect`].
    FillRoundedRect {
        /// Filled rectangle.
        rect: Rect,
        /// Corner radius.
        radius: f64,
        /// Fill colour.
        color: Color,
    },
    /// [`DrawSurface::draw_media`].
    DrawMedia {
        /// Top-left corner.
        origin: Point,
        /// Frame width.
        width: u32,
        /// Frame height.
        height: u32,
        /// Frame generation, identifying which sample was drawn.
        generation: u64,
    },
    /// [`DrawSurface::push_clip_rounded_rect`].
    PushClip {
        /// Clip rectangle.
        rect: Rect,
        /// Clip corner radius.
        radius: f64,
    },
    /// [`DrawSurface::pop_clip`].
    PopClip,
}

/// Surface that records the draw sequence instead of rasterizing it.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
    shadow_depth: u32,
    clip_depth: u32,
}

impl RecordingSurface {
    /// Empty recording of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Recorded operations, oldest first.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drain the recorded operations.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Whether no shadow or clip scope is left open.
    pub fn is_balanced(&self) -> bool {
        self.shadow_depth == 0 && self.clip_depth == 0
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) -> ShotframeResult<()> {
        if (width, height) != (self.width, self.height) {
            self.width = width;
            self.height = height;
            self.ops.push(DrawOp::Resize { width, height });
        }
        Ok(())
    }

    fn fill_background(&mut self, color: Color) -> ShotframeResult<()> {
        self.ops.push(DrawOp::FillBackground(color));
        Ok(())
    }

    fn push_shadow(&mut self, shadow: ShadowStyle) -> ShotframeResult<()> {
        if self.shadow_depth > 0 {
            return Err(ShotframeError::validation("shadow scope already open"));
        }
        self.shadow_depth += 1;
        self.ops.push(DrawOp::PushShadow(shadow));
        Ok(())
    }

    fn pop_shadow(&mut self) -> ShotframeResult<()> {
        if self.shadow_depth == 0 {
            return Err(ShotframeError::validation("pop_shadow without push_shadow"));
        }
        self.shadow_depth -= 1;
        self.ops.push(DrawOp::PopShadow);
        Ok(())
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Color) -> ShotframeResult<()> {
        self.ops.push(DrawOp::FillRoundedRect {
            rect,
            radius,
            color,
        });
        Ok(())
    }

    fn draw_media(&mut self, frame: &MediaFrame, origin: Point) -> ShotframeResult<()> {
        self.ops.push(DrawOp::DrawMedia {
            origin,
            width: frame.width,
            height: frame.height,
            generation: frame.generation(),
        });
        Ok(())
    }

    fn push_clip_rounded_rect(&mut self, rect: Rect, radius: f64) -> ShotframeResult<()> {
        if self.clip_depth > 0 {
            return Err(ShotframeError::validation("clip scope already open"));
        }
        self.clip_depth += 1;
        self.ops.push(DrawOp::PushClip { rect, radius });
        Ok(())
    }

    fn pop_clip(&mut self) -> ShotframeResult<()> {
        if self.clip_depth == 0 {
            return Err(ShotframeError::validation("pop_clip without push_clip"));
        }
        self.clip_depth -= 1;
        self.ops.push(DrawOp::PopClip);
        Ok(())
    }
}
