use std::collections::{HashMap, HashSet};

use crate::{
    assets::bitmap::{Bitmap, BitmapId},
    assets::fonts::{FontLibrary, TextBrushRgba8, TextLayoutEngine},
    foundation::core::{Affine, BezPath, Point, Rgba8},
    foundation::error::{InkplateError, InkplateResult},
    render::backend::FrameRGBA,
    render::plan::{DrawOp, RenderPlan},
    scene::object::TextStyle,
};

/// CPU rasterizer powered by `vello_cpu`.
///
/// Holds paint caches across renders so the per-mutation full redraw does not re-upload
/// bitmaps or re-register fonts.
pub struct CpuBackend {
    fonts: FontLibrary,
    text: TextLayoutEngine,
    image_cache: HashMap<BitmapId, vello_cpu::Image>,
}

impl CpuBackend {
    /// Backend that resolves text from `fonts` first, then from the system font collection.
    pub fn new(fonts: FontLibrary) -> Self {
        Self::with_system_fonts(fonts, true)
    }

    /// Backend limited to `fonts` unless `system_fonts` is set.
    pub fn with_system_fonts(fonts: FontLibrary, system_fonts: bool) -> Self {
        Self {
            fonts,
            text: TextLayoutEngine::new(system_fonts),
            image_cache: HashMap::new(),
        }
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    /// Replace the font library. Faces registered for layout are dropped.
    pub fn set_fonts(&mut self, fonts: FontLibrary) {
        self.fonts = fonts;
        self.text = TextLayoutEngine::new(self.text.system_fonts());
    }

    /// Execute `plan` into a fresh premultiplied frame.
    #[tracing::instrument(skip_all, fields(w = plan.target.width, h = plan.target.height, ops = plan.ops.len()))]
    pub fn render(&mut self, plan: &RenderPlan) -> InkplateResult<FrameRGBA> {
        let width: u16 = plan
            .target
            .width
            .try_into()
            .map_err(|_| InkplateError::render("target width exceeds u16"))?;
        let height: u16 = plan
            .target
            .height
            .try_into()
            .map_err(|_| InkplateError::render("target height exceeds u16"))?;

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        let mut ctx = vello_cpu::RenderContext::new(width, height);

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color_to_cpu(plan.background));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        ));

        let mut live_bitmaps = HashSet::new();
        for op in &plan.ops {
            if let DrawOp::Image { bitmap, .. } = op {
                live_bitmaps.insert(bitmap.id());
            }
            self.draw_op(&mut ctx, op)?;
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        self.image_cache.retain(|id, _| live_bitmaps.contains(id));

        Ok(FrameRGBA {
            width: plan.target.width,
            height: plan.target.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn draw_op(&mut self, ctx: &mut vello_cpu::RenderContext, op: &DrawOp) -> InkplateResult<()> {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match op {
            DrawOp::FillPath {
                path,
                transform,
                color,
            } => {
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint(color_to_cpu(*color));
                ctx.fill_path(&bezpath_to_cpu(path));
                Ok(())
            }
            DrawOp::StrokePath {
                path,
                transform,
                color,
                width,
            } => {
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint(color_to_cpu(*color));
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                ctx.stroke_path(&bezpath_to_cpu(path));
                Ok(())
            }
            DrawOp::Image { bitmap, transform } => {
                let image_paint = self.image_paint_for(bitmap)?;
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint(image_paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(bitmap.width()),
                    f64::from(bitmap.height()),
                ));
                Ok(())
            }
            DrawOp::Text {
                text,
                style,
                transform,
                decorative,
            } => self.draw_text(ctx, text, style, *transform, *decorative),
        }
    }

    /// Draw `text` with its layout box origin at `transform`.
    ///
    /// Text no font can draw fails the render, except decorative text, which is skipped.
    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        style: &TextStyle,
        transform: Affine,
        decorative: bool,
    ) -> InkplateResult<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let faces: Vec<_> = self
            .fonts
            .resolve(&style.font_family, style.font_weight)
            .or_else(|| self.fonts.fallback())
            .into_iter()
            .cloned()
            .collect();
        let layout = if faces.is_empty() && !self.text.system_fonts() {
            None
        } else {
            Some(self.text.layout_plain(
                text,
                &style.font_family,
                &faces,
                style.font_size,
                style.font_weight,
                TextBrushRgba8::from(style.fill),
            )?)
        };

        ctx.set_transform(affine_to_cpu(transform));
        let mut drawn = 0usize;
        for line in layout.iter().flat_map(|l| l.lines()) {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let mut x = run.offset();
                let y = run.baseline();
                let glyphs: Vec<_> = run
                    .glyphs()
                    .map(|g| {
                        let glyph = vello_cpu::Glyph {
                            id: g.id,
                            x: x + g.x,
                            y: y - g.y,
                        };
                        x += g.advance;
                        glyph
                    })
                    .collect();
                drawn += glyphs.len();
                ctx.glyph_run(run.run().font())
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs.into_iter());
            }
        }

        if drawn == 0 {
            if decorative {
                tracing::warn!(family = %style.font_family, "no font available, label skipped");
                return Ok(());
            }
            return Err(InkplateError::render(format!(
                "no font available for text '{text}' (family '{}')",
                style.font_family
            )));
        }
        Ok(())
    }

    fn image_paint_for(&mut self, bitmap: &Bitmap) -> InkplateResult<vello_cpu::Image> {
        if let Some(paint) = self.image_cache.get(&bitmap.id()) {
            return Ok(paint.clone());
        }

        let pixmap =
            image_premul_bytes_to_pixmap(bitmap.rgba8_premul(), bitmap.width(), bitmap.height())?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        self.image_cache.insert(bitmap.id(), paint.clone());
        Ok(paint)
    }
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> InkplateResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| InkplateError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| InkplateError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(InkplateError::render("bitmap byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
