use std::path::PathBuf;
use std::sync::Arc;

use kurbo::PathEl;
use vello_cpu::peniko::{BlendMode, Compose, Mix};

use crate::assets::decode::BackgroundImage;
use crate::assets::text::{TextBrushRgba8, TextLayoutEngine};
use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba8};
use crate::foundation::error::{VhdsError, VhdsResult};
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::render::plan::{DrawOp, FramePlan, Paint, TextAlign};
use crate::render::surface::RenderTarget;

/// Options for [`CpuBackend`].
#[derive(Debug, Clone, Default)]
pub struct CpuBackendOpts {
    pub(crate) clear_rgba: Option<[u8; 4]>,
    pub(crate) font: Option<PathBuf>,
}

impl CpuBackendOpts {
    /// Return options with a clear color applied before every frame.
    pub fn with_clear_rgba(mut self, clear: Option<[u8; 4]>) -> Self {
        self.clear_rgba = clear;
        self
    }

    /// Return options with a TTF/OTF font used for labels.
    pub fn with_font(mut self, font: Option<PathBuf>) -> Self {
        self.font = font;
        self
    }
}

/// CPU raster backend powered by `vello_cpu`.
pub struct CpuBackend {
    opts: CpuBackendOpts,
    ctx: Option<vello_cpu::RenderContext>,
    text: Option<TextLayoutEngine>,
    warned_no_font: bool,
}

impl std::fmt::Debug for CpuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuBackend")
            .field("opts", &self.opts)
            .field("has_font", &self.text.is_some())
            .finish_non_exhaustive()
    }
}

impl CpuBackend {
    /// Build a backend. A font that fails to load disables text with a warning.
    pub fn new(opts: CpuBackendOpts) -> Self {
        let text = opts
            .font
            .as_deref()
            .and_then(|p| match TextLayoutEngine::from_font_path(p) {
                Ok(engine) => Some(engine),
                Err(err) => {
                    tracing::warn!(font = %p.display(), error = %err, "font unavailable, labels will not be rasterized");
                    None
                }
            });
        Self {
            opts,
            ctx: None,
            text,
            warned_no_font: false,
        }
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> VhdsResult<R>,
    ) -> VhdsResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    fn exec_ops(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        ops: &[DrawOp],
        device: Affine,
    ) -> VhdsResult<()> {
        for op in ops {
            match op {
                DrawOp::FillPath { path, paint } => {
                    ctx.set_transform(affine_to_cpu(device));
                    ctx.set_paint(paint_to_cpu(paint));
                    ctx.fill_path(&bezpath_to_cpu(path));
                }
                DrawOp::StrokePath { path, color, width } => {
                    ctx.set_transform(affine_to_cpu(device));
                    ctx.set_paint(color_to_cpu(*color));
                    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                    ctx.stroke_path(&bezpath_to_cpu(path));
                }
                DrawOp::Text {
                    text,
                    anchor,
                    size_px,
                    align,
                    color,
                    max_width,
                } => self.exec_text(
                    ctx,
                    text,
                    TextPlacement {
                        anchor: *anchor,
                        align: *align,
                        max_width: *max_width,
                    },
                    *size_px,
                    *color,
                    device,
                )?,
                DrawOp::Image {
                    image,
                    rect,
                    opacity,
                } => exec_image(ctx, image, *rect, *opacity, device)?,
                DrawOp::Additive(inner) => {
                    ctx.push_blend_layer(BlendMode::new(Mix::Normal, Compose::Plus));
                    let res = self.exec_ops(ctx, inner, device);
                    ctx.pop_layer();
                    res?;
                }
            }
        }
        Ok(())
    }

    fn exec_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        placement: TextPlacement,
        size_px: f64,
        color: Rgba8,
        device: Affine,
    ) -> VhdsResult<()> {
        let Some(engine) = self.text.as_mut() else {
            if !self.warned_no_font {
                tracing::warn!("no font configured, skipping label text");
                self.warned_no_font = true;
            }
            return Ok(());
        };

        let layout = engine.layout_line(text, size_px as f32, TextBrushRgba8::from(color))?;
        let place = placement.transform(f64::from(layout.width()), f64::from(layout.height()));
        ctx.set_transform(affine_to_cpu(device * place));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(engine.font())
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }
}

impl RenderBackend for CpuBackend {
    #[tracing::instrument(skip_all, fields(surface = %target.id()))]
    fn render(&mut self, target: &mut RenderTarget, plan: &FramePlan) -> VhdsResult<FrameRGBA> {
        let fitted = *target
            .fitted()
            .ok_or_else(|| VhdsError::render("render target has not been fitted"))?;
        let width: u16 = fitted
            .canvas
            .width
            .try_into()
            .map_err(|_| VhdsError::render("canvas width exceeds u16"))?;
        let height: u16 = fitted
            .canvas
            .height
            .try_into()
            .map_err(|_| VhdsError::render("canvas height exceeds u16"))?;

        let mut pixmap = match target.pixmap.take() {
            Some(pm) if pm.width() == width && pm.height() == height => pm,
            _ => vello_cpu::Pixmap::new(width, height),
        };

        let clear = self.opts.clear_rgba;
        let res = self.with_ctx_mut(width, height, |this, ctx| {
            if let Some([r, g, b, a]) = clear {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(width),
                    f64::from(height),
                ));
            }
            this.exec_ops(ctx, plan.ops(), fitted.transform)?;
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        });

        let frame = res.map(|()| FrameRGBA {
            width: fitted.canvas.width,
            height: fitted.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        });
        target.pixmap = Some(pixmap);
        if frame.is_ok() {
            target.note_frame_drawn();
        }
        frame
    }
}

/// Where a shaped line of text goes.
#[derive(Clone, Copy, Debug)]
struct TextPlacement {
    anchor: Point,
    align: TextAlign,
    max_width: Option<f64>,
}

impl TextPlacement {
    /// Layout-space to logical transform for a line of `width` x `height`.
    fn transform(self, width: f64, height: f64) -> Affine {
        let scale = match self.max_width {
            Some(max) if width > max && max > 0.0 => max / width,
            _ => 1.0,
        };
        let (w, h) = (width * scale, height * scale);
        let x0 = match self.align {
            TextAlign::Left => self.anchor.x,
            TextAlign::Center => self.anchor.x - w / 2.0,
            TextAlign::Right => self.anchor.x - w,
        };
        let y0 = self.anchor.y - h / 2.0;
        Affine::translate((x0, y0)) * Affine::scale(scale)
    }
}

fn exec_image(
    ctx: &mut vello_cpu::RenderContext,
    image: &BackgroundImage,
    rect: Rect,
    opacity: f64,
    device: Affine,
) -> VhdsResult<()> {
    if image.width == 0 || image.height == 0 || rect.width() <= 0.0 || rect.height() <= 0.0 {
        return Ok(());
    }
    let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
    let paint = vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    };
    let (w, h) = (f64::from(image.width), f64::from(image.height));
    let place = Affine::translate((rect.x0, rect.y0))
        * Affine::scale_non_uniform(rect.width() / w, rect.height() / h);

    ctx.set_transform(affine_to_cpu(device * place));
    ctx.set_paint(paint);
    let opacity = opacity.clamp(0.0, 1.0) as f32;
    if opacity < 1.0 {
        ctx.push_opacity_layer(opacity);
    }
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
    if opacity < 1.0 {
        ctx.pop_layer();
    }
    Ok(())
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn stops_to_cpu(stops: &[(f32, Rgba8)]) -> Vec<(f32, vello_cpu::peniko::Color)> {
    stops.iter().map(|&(o, c)| (o, color_to_cpu(c))).collect()
}

fn paint_to_cpu(paint: &Paint) -> vello_cpu::PaintType {
    match paint {
        Paint::Solid(c) => color_to_cpu(*c).into(),
        Paint::Linear { start, end, stops } => vello_cpu::peniko::Gradient::new_linear(
            point_to_cpu(*start),
            point_to_cpu(*end),
        )
        .with_stops(stops_to_cpu(stops).as_slice())
        .into(),
        Paint::Radial {
            center,
            radius,
            stops,
        } => vello_cpu::peniko::Gradient::new_radial(point_to_cpu(*center), *radius as f32)
            .with_stops(stops_to_cpu(stops).as_slice())
            .into(),
    }
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3))
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> VhdsResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| VhdsError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| VhdsError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(VhdsError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        })
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
