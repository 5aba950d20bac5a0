use std::sync::Arc;

use vello_cpu::kurbo::Shape as _;

use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::foundation::math::{Fnv1a64, mul_div255_u8};
use crate::media::frame::MediaFrame;
use crate::render::blur::{BlurRegion, blur_alpha_region_q16, shadow_kernel_q16};
use crate::render::frame::FrameRGBA;
use crate::render::surface::DrawSurface;
use crate::style::color::Color;
use crate::style::scene::{MAX_SHADOW_BLUR, ShadowStyle};

/// CPU raster surface built on `vello_cpu`.
///
/// Every shape is rasterized into a scratch layer, clipped, optionally shadowed, then
/// composited over the canvas. Scratch buffers, the clip mask, the blurred shadow and the media
/// paint are kept between calls, so repeated frames of the same size allocate nothing new.
pub struct CpuSurface {
    width: u16,
    height: u16,
    canvas: vello_cpu::Pixmap,
    layer: vello_cpu::Pixmap,
    layer_dirty: Option<PixelBounds>,
    ctx: Option<vello_cpu::RenderContext>,
    shadow: Option<ShadowStyle>,
    clip: Option<ClipMask>,
    clip_active: bool,
    paint: Option<(u64, vello_cpu::Image)>,
    shadow_cache: ShadowCache,
}

/// Half-open pixel rectangle clamped to the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PixelBounds {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

impl PixelBounds {
    fn covering(rect: Rect, width: u16, height: u16) -> Option<Self> {
        let clamp = |v: f64, max: u16| -> usize {
            if v.is_nan() { 0 } else { v.clamp(0.0, f64::from(max)) as usize }
        };
        let b = Self {
            x0: clamp(rect.x0.min(rect.x1).floor(), width),
            y0: clamp(rect.y0.min(rect.y1).floor(), height),
            x1: clamp(rect.x0.max(rect.x1).ceil(), width),
            y1: clamp(rect.y0.max(rect.y1).ceil(), height),
        };
        (b.x1 > b.x0 && b.y1 > b.y0).then_some(b)
    }

    fn width(&self) -> usize {
        self.x1 - self.x0
    }

    fn height(&self) -> usize {
        self.y1 - self.y0
    }

    fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

struct ClipMask {
    rect: Rect,
    radius: f64,
    bounds: Option<PixelBounds>,
    /// Coverage per pixel of `bounds`, row-major.
    coverage: Vec<u8>,
}

#[derive(Default)]
struct ShadowCache {
    kernel_blur: Option<u32>,
    kernel: Vec<u32>,
    key: Option<u64>,
    /// Region of the working window that lands on the canvas.
    out: BlurRegion,
    /// Source alpha and blurred alpha over the working window.
    src: Vec<u8>,
    tmp: Vec<u8>,
    alpha: Vec<u8>,
    width: usize,
    height: usize,
}

impl CpuSurface {
    /// Allocate a surface; both sides must fit in `1..=65535`.
    pub fn new(width: u32, height: u32) -> ShotframeResult<Self> {
        let (w, h) = surface_dims(width, height)?;
        Ok(Self {
            width: w,
            height: h,
            canvas: vello_cpu::Pixmap::new(w, h),
            layer: vello_cpu::Pixmap::new(w, h),
            layer_dirty: None,
            ctx: None,
            shadow: None,
            clip: None,
            clip_active: false,
            paint: None,
            shadow_cache: ShadowCache::default(),
        })
    }

    /// Premultiplied RGBA8 canvas bytes.
    pub fn pixels(&self) -> &[u8] {
        self.canvas.data_as_u8_slice()
    }

    /// Copy of the canvas.
    pub fn snapshot(&self) -> FrameRGBA {
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixels().to_vec(),
            premultiplied: true,
        }
    }

    fn with_ctx_mut(&mut self, draw: impl FnOnce(&mut vello_cpu::RenderContext)) {
        let (w, h) = (self.width, self.height);
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();
        draw(&mut ctx);
        ctx.flush();
        ctx.render_to_pixmap(&mut self.layer);
        self.ctx = Some(ctx);
    }

    /// Rasterize into a cleared scratch layer; `bounds` must cover everything `draw` touches.
    fn rasterize(&mut self, bounds: PixelBounds, draw: impl FnOnce(&mut vello_cpu::RenderContext)) {
        if let Some(dirty) = self.layer_dirty.take() {
            let stride = usize::from(self.width) * 4;
            let data = self.layer.data_as_u8_slice_mut();
            for y in dirty.y0..dirty.y1 {
                data[y * stride + dirty.x0 * 4..y * stride + dirty.x1 * 4].fill(0);
            }
        }
        self.with_ctx_mut(draw);
        self.layer_dirty = Some(bounds);
    }

    fn rasterize_rounded_rect(&mut self, bounds: PixelBounds, rect: Rect, radius: f64, color: Color) {
        let radius = clamp_radius(rect, radius);
        let cpu_rect = vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1);
        self.rasterize(bounds, |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, 255));
            if radius > 0.0 {
                let rr = vello_cpu::kurbo::RoundedRect::from_rect(cpu_rect, radius);
                ctx.fill_path(&rr.to_path(0.1));
            } else {
                ctx.fill_rect(&cpu_rect);
            }
        });
    }

    fn paint_for(&mut self, frame: &MediaFrame) -> ShotframeResult<vello_cpu::Image> {
        if let Some((generation, paint)) = &self.paint
            && *generation == frame.generation()
        {
            return Ok(paint.clone());
        }
        let pixmap = pixmap_from_premul_bytes(&frame.rgba8_premul, frame.width, frame.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.paint = Some((frame.generation(), paint.clone()));
        Ok(paint)
    }

    /// Clip, shadow and composite the scratch layer onto the canvas.
    fn commit_layer(&mut self, bounds: PixelBounds) -> ShotframeResult<()> {
        if self.clip_active {
            self.apply_clip(bounds);
        }
        if let Some(shadow) = self.shadow
            && shadow.is_visible()
        {
            self.cast_shadow(bounds, shadow)?;
        }

        let stride = usize::from(self.width) * 4;
        let src = self.layer.data_as_u8_slice();
        let dst = self.canvas.data_as_u8_slice_mut();
        for y in bounds.y0..bounds.y1 {
            let span = y * stride + bounds.x0 * 4..y * stride + bounds.x1 * 4;
            premul_over_in_place(&mut dst[span.clone()], &src[span]);
        }
        Ok(())
    }

    fn apply_clip(&mut self, bounds: PixelBounds) {
        let Some(clip) = self.clip.as_ref() else {
            return;
        };
        let stride = usize::from(self.width) * 4;
        let data = self.layer.data_as_u8_slice_mut();
        for y in bounds.y0..bounds.y1 {
            for x in bounds.x0..bounds.x1 {
                let cov = match clip.bounds {
                    Some(cb) if cb.contains(x, y) => {
                        clip.coverage[(y - cb.y0) * cb.width() + (x - cb.x0)]
                    }
                    _ => 0,
                };
                if cov == 255 {
                    continue;
                }
                let i = y * stride + x * 4;
                for c in &mut data[i..i + 4] {
                    *c = mul_div255_u8(u16::from(*c), u16::from(cov));
                }
            }
        }
    }

    /// Darken the canvas with the blurred, offset alpha of the scratch layer.
    ///
    /// Only the part of the shadow that can land on the canvas is blurred, so the cost tracks
    /// the canvas and the layer bounds instead of the blur radius.
    fn cast_shadow(&mut self, bounds: PixelBounds, shadow: ShadowStyle) -> ShotframeResult<()> {
        let blur = shadow.blur_radius.min(MAX_SHADOW_BLUR);
        let cache = &mut self.shadow_cache;
        if cache.kernel_blur != Some(blur) {
            cache.kernel = shadow_kernel_q16(blur)?;
            cache.kernel_blur = Some(blur);
            cache.key = None;
        }
        let pad = (cache.kernel.len() / 2) as i64;
        let (cw, ch) = (i64::from(self.width), i64::from(self.height));

        // Layer bounds moved by the offset, in canvas pixels.
        let (sx0, sy0) = (
            bounds.x0 as i64 + i64::from(shadow.offset_x),
            bounds.y0 as i64 + i64::from(shadow.offset_y),
        );
        let (sx1, sy1) = (
            sx0 + bounds.width() as i64,
            sy0 + bounds.height() as i64,
        );
        // Canvas pixels the blurred shadow can reach.
        let (ox0, oy0) = ((sx0 - pad).max(0), (sy0 - pad).max(0));
        let (ox1, oy1) = ((sx1 + pad).min(cw), (sy1 + pad).min(ch));
        if ox0 >= ox1 || oy0 >= oy1 {
            return Ok(());
        }
        // Working window: the reachable pixels plus the source pixels that feed them.
        let wx0 = ox0.min(sx0.max(ox0 - pad));
        let wy0 = oy0.min(sy0.max(oy0 - pad));
        let wx1 = ox1.max(sx1.min(ox1 + pad));
        let wy1 = oy1.max(sy1.min(oy1 + pad));
        let (ww, wh) = ((wx1 - wx0) as usize, (wy1 - wy0) as usize);
        let local = |x0: i64, y0: i64, x1: i64, y1: i64| BlurRegion {
            x0: (x0.clamp(wx0, wx1) - wx0) as usize,
            y0: (y0.clamp(wy0, wy1) - wy0) as usize,
            x1: (x1.clamp(wx0, wx1) - wx0) as usize,
            y1: (y1.clamp(wy0, wy1) - wy0) as usize,
        };
        let content = local(sx0, sy0, sx1, sy1);
        let out = local(ox0, oy0, ox1, oy1);

        let stride = usize::from(self.width) * 4;
        let layer = self.layer.data_as_u8_slice();

        let mut h = Fnv1a64::new_default();
        h.write_u32(blur);
        for v in [bounds.x0, bounds.y0, bounds.x1, bounds.y1] {
            h.write_u64(v as u64);
        }
        h.write_u64(shadow.offset_x as u64);
        h.write_u64(shadow.offset_y as u64);
        for y in bounds.y0..bounds.y1 {
            for x in bounds.x0..bounds.x1 {
                h.write_bytes(&[layer[y * stride + x * 4 + 3]]);
            }
        }
        let key = h.finish();

        if cache.key != Some(key) {
            cache.width = ww;
            cache.height = wh;
            cache.out = out;
            cache.src.clear();
            cache.src.resize(ww * wh, 0);
            cache.tmp.resize(ww * wh, 0);
            cache.alpha.resize(ww * wh, 0);
            // Content pixels map back to layer pixels by removing the offset.
            let lx0 = (bounds.x0 as i64 + content.x0 as i64 + wx0 - sx0) as usize;
            let ly0 = (bounds.y0 as i64 + content.y0 as i64 + wy0 - sy0) as usize;
            for (dy, y) in (content.y0..content.y1).enumerate() {
                let src_row = (ly0 + dy) * stride;
                for (dx, x) in (content.x0..content.x1).enumerate() {
                    cache.src[y * ww + x] = layer[src_row + (lx0 + dx) * 4 + 3];
                }
            }
            blur_alpha_region_q16(
                &cache.src,
                &mut cache.alpha,
                &mut cache.tmp,
                ww,
                &cache.kernel,
                content,
                out,
            );
            cache.key = Some(key);
        }

        let op = (shadow.opacity.clamp(0.0, 1.0) * 255.0).round() as u16;
        let out = cache.out;
        let dst = self.canvas.data_as_u8_slice_mut();
        for y in out.y0..out.y1 {
            let cy = (wy0 + y as i64) as usize;
            for x in out.x0..out.x1 {
                let cx = (wx0 + x as i64) as usize;
                let a = mul_div255_u8(u16::from(cache.alpha[y * cache.width + x]), op);
                if a == 0 {
                    continue;
                }
                let i = cy * stride + cx * 4;
                let inv = 255 - u16::from(a);
                let d = &mut dst[i..i + 4];
                d[3] = a.saturating_add(mul_div255_u8(u16::from(d[3]), inv));
                for c in &mut d[..3] {
                    *c = mul_div255_u8(u16::from(*c), inv);
                }
            }
        }
        Ok(())
    }
}

impl DrawSurface for CpuSurface {
    fn size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    fn resize(&mut self, width: u32, height: u32) -> ShotframeResult<()> {
        if (width, height) == self.size() {
            return Ok(());
        }
        let (w, h) = surface_dims(width, height)?;
        tracing::debug!(width, height, "resizing cpu surface");
        self.width = w;
        self.height = h;
        self.canvas = vello_cpu::Pixmap::new(w, h);
        self.layer = vello_cpu::Pixmap::new(w, h);
        self.layer_dirty = None;
        self.clip = None;
        self.clip_active = false;
        self.shadow_cache.key = None;
        Ok(())
    }

    fn fill_background(&mut self, color: Color) -> ShotframeResult<()> {
        clear_pixmap(&mut self.canvas, color.to_rgba8_premul().to_array());
        Ok(())
    }

    fn push_shadow(&mut self, shadow: ShadowStyle) -> ShotframeResult<()> {
        if self.shadow.is_some() {
            return Err(ShotframeError::validation("shadow scope already open"));
        }
        self.shadow = Some(shadow);
        Ok(())
    }

    fn pop_shadow(&mut self) -> ShotframeResult<()> {
        self.shadow
            .take()
            .map(|_| ())
            .ok_or_else(|| ShotframeError::validation("pop_shadow without push_shadow"))
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Color) -> ShotframeResult<()> {
        let Some(bounds) = PixelBounds::covering(rect, self.width, self.height) else {
            return Ok(());
        };
        self.rasterize_rounded_rect(bounds, rect, radius, color);
        self.commit_layer(bounds)
    }

    fn draw_media(&mut self, frame: &MediaFrame, origin: Point) -> ShotframeResult<()> {
        let (w, h) = (f64::from(frame.width), f64::from(frame.height));
        let rect = Rect::new(origin.x, origin.y, origin.x + w, origin.y + h);
        let Some(bounds) = PixelBounds::covering(rect, self.width, self.height) else {
            return Ok(());
        };
        let paint = self.paint_for(frame)?;
        self.rasterize(bounds, |ctx| {
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
        });
        self.commit_layer(bounds)
    }

    fn push_clip_rounded_rect(&mut self, rect: Rect, radius: f64) -> ShotframeResult<()> {
        if self.clip_active {
            return Err(ShotframeError::validation("clip scope already open"));
        }
        let cached = matches!(&self.clip, Some(c) if c.rect == rect && c.radius == radius);
        if !cached {
            let mut coverage = self.clip.take().map(|c| c.coverage).unwrap_or_default();
            coverage.clear();
            let bounds = PixelBounds::covering(rect, self.width, self.height);
            if let Some(b) = bounds {
                self.rasterize_rounded_rect(b, rect, radius, Color::BLACK);
                let stride = usize::from(self.width) * 4;
                let layer = self.layer.data_as_u8_slice();
                coverage.reserve(b.width() * b.height());
                for y in b.y0..b.y1 {
                    for x in b.x0..b.x1 {
                        coverage.push(layer[y * stride + x * 4 + 3]);
                    }
                }
            }
            self.clip = Some(ClipMask {
                rect,
                radius,
                bounds,
                coverage,
            });
        }
        self.clip_active = true;
        Ok(())
    }

    fn pop_clip(&mut self) -> ShotframeResult<()> {
        if !self.clip_active {
            return Err(ShotframeError::validation("pop_clip without push_clip"));
        }
        self.clip_active = false;
        Ok(())
    }
}

fn surface_dims(width: u32, height: u32) -> ShotframeResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ShotframeError::validation("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ShotframeError::validation("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(ShotframeError::validation("surface width/height must be non-zero"));
    }
    Ok((w, h))
}

fn clamp_radius(rect: Rect, radius: f64) -> f64 {
    let max = (rect.width().abs().min(rect.height().abs())) / 2.0;
    if radius.is_finite() { radius.clamp(0.0, max) } else { 0.0 }
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    for px in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ShotframeResult<vello_cpu::Pixmap> {
    let (w, h) = surface_dims(width, height)?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ShotframeError::validation("media frame byte len mismatch"));
    }
    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in bytes.chunks_exact(4) {
        may_have_opacities |= px[3] != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn premul_over_in_place(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = u16::from(s[3]);
        if sa == 0 {
            continue;
        }
        if sa == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - sa;
        d[3] = s[3].saturating_add(mul_div255_u8(u16::from(d[3]), inv));
        for c in 0..3 {
            d[c] = s[c].saturating_add(mul_div255_u8(u16::from(d[c]), inv));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
