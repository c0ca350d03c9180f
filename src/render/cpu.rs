use kurbo::Shape;

use crate::foundation::core::{Affine, BezPath, Point, Rgba8};
use crate::foundation::error::{ChartError, ChartResult};
use crate::foundation::math::clock_deg_to_screen_rad;
use crate::layout::frame::{ChartFrame, LegendEntry};
use crate::layout::label::LabelAnchor;
use crate::layout::sector::WedgeGeometry;
use crate::render::backend::{ChartBackend, FrameRGBA};
use crate::render::style::{ChartGeometry, ChartStyle};
use crate::render::text::TextLayoutEngine;

const PATH_TOLERANCE: f64 = 0.1;
const LEGEND_ROW_SPACING: f64 = 1.6;
const LEGEND_SWATCH_GAP_PX: f64 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TextAlign {
    Center,
    Left,
}

/// CPU chart backend powered by `vello_cpu` for wedges and `parley` for text.
pub struct CpuChartBackend {
    style: ChartStyle,
    ctx: Option<vello_cpu::RenderContext>,
    text: Option<TextLayoutEngine>,
    warned_missing_font: bool,
}

impl CpuChartBackend {
    /// Build a backend for `style`, loading its font up front.
    pub fn new(style: ChartStyle) -> ChartResult<Self> {
        style.validate()?;
        let text = style.load_font()?.map(TextLayoutEngine::new).transpose()?;
        Ok(Self {
            style,
            ctx: None,
            text,
            warned_missing_font: false,
        })
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> ChartResult<R>,
    ) -> ChartResult<R> {
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

    fn draw_wedge(&self, ctx: &mut vello_cpu::RenderContext, geom: &ChartGeometry, w: &WedgeGeometry) {
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color_to_cpu(w.color));
        let path = wedge_path(geom, w);
        ctx.fill_path(&bezpath_to_cpu(&path));
    }

    fn draw_label(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        geom: &ChartGeometry,
        label: &LabelAnchor,
    ) -> ChartResult<()> {
        let fill = self.style.label_color.0;
        let size = self.style.label_size_px;
        let (nx, ny) = label.name_pos();
        self.draw_text(ctx, &label.text, size, geom.to_pixels(nx, ny), TextAlign::Center, fill)?;
        if !label.percent_text.is_empty() {
            let (px, py) = label.percent_pos();
            self.draw_text(
                ctx,
                &label.percent_text,
                size,
                geom.to_pixels(px, py),
                TextAlign::Center,
                fill,
            )?;
        }
        Ok(())
    }

    fn draw_legend(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        geom: &ChartGeometry,
        legend: &[LegendEntry],
    ) -> ChartResult<()> {
        let text_size = self.style.legend_size_px;
        let text_fill = self.style.legend_text_color.0;
        for (i, entry) in legend.iter().enumerate() {
            let slot = legend_slot(geom, f64::from(text_size), legend.len(), i);
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(color_to_cpu(entry.color));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                slot.x,
                slot.y - slot.swatch * 0.5,
                slot.x + slot.swatch,
                slot.y + slot.swatch * 0.5,
            ));
            let text_at = Point::new(slot.x + slot.swatch + LEGEND_SWATCH_GAP_PX, slot.y);
            self.draw_text(ctx, &entry.text, text_size, text_at, TextAlign::Left, text_fill)?;
        }
        Ok(())
    }

    /// Outline first, fill on top, so text stays legible over any wedge color.
    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        size_px: f32,
        anchor: Point,
        align: TextAlign,
        fill: Rgba8,
    ) -> ChartResult<()> {
        let outline_px = self.style.outline_px;
        let outline = self.style.outline_for(fill);
        let Some(engine) = self.text.as_mut() else {
            return Ok(());
        };
        let layout = engine.layout_line(text, size_px, fill.into())?;

        let w = f64::from(layout.width());
        let h = f64::from(layout.height());
        let origin = match align {
            TextAlign::Center => Point::new(anchor.x - w * 0.5, anchor.y - h * 0.5),
            TextAlign::Left => Point::new(anchor.x, anchor.y - h * 0.5),
        };
        ctx.set_transform(affine_to_cpu(Affine::translate(origin.to_vec2())));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let font_size = run.run().font_size();
                let glyphs = || {
                    run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    })
                };
                if outline_px > 0.0 {
                    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(f64::from(outline_px)));
                    ctx.set_paint(color_to_cpu(outline));
                    ctx.glyph_run(engine.font())
                        .font_size(font_size)
                        .stroke_glyphs(glyphs());
                }
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                ctx.glyph_run(engine.font())
                    .font_size(font_size)
                    .fill_glyphs(glyphs());
            }
        }
        Ok(())
    }
}

impl ChartBackend for CpuChartBackend {
    #[tracing::instrument(level = "trace", skip_all, fields(progress = frame.progress.get()))]
    fn render_frame(&mut self, frame: &ChartFrame) -> ChartResult<FrameRGBA> {
        let size: u16 = self
            .style
            .size_px
            .try_into()
            .map_err(|_| ChartError::render("frame size exceeds u16"))?;
        let geom = ChartGeometry::for_size(self.style.size_px);

        let has_text = !frame.labels.is_empty() || !frame.legend.is_empty();
        if has_text && self.text.is_none() && !self.warned_missing_font {
            tracing::warn!("no font configured; chart labels and legend are not drawn");
            self.warned_missing_font = true;
        }

        self.with_ctx_mut(size, size, |this, ctx| {
            if let Some(bg) = this.style.background {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(color_to_cpu(bg.0));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, geom.size, geom.size));
            }
            for w in frame.wedges.iter().filter(|w| w.is_visible()) {
                this.draw_wedge(ctx, &geom, w);
            }
            for label in &frame.labels {
                this.draw_label(ctx, &geom, label)?;
            }
            this.draw_legend(ctx, &geom, &frame.legend)?;

            let mut pixmap = vello_cpu::Pixmap::new(size, size);
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(FrameRGBA {
                width: u32::from(size),
                height: u32::from(size),
                data: pixmap.data_as_u8_slice().to_vec(),
                premultiplied: true,
            })
        })
    }

    fn frame_size(&self) -> u32 {
        self.style.size_px
    }
}

/// Pie slice (or full disc) in pixel space for one wedge.
pub(crate) fn wedge_path(geom: &ChartGeometry, w: &WedgeGeometry) -> BezPath {
    if w.sweep_deg() >= 360.0 {
        return kurbo::Circle::new(geom.center, geom.radius).to_path(PATH_TOLERANCE);
    }
    kurbo::CircleSegment::new(
        geom.center,
        geom.radius,
        0.0,
        clock_deg_to_screen_rad(w.start_angle_deg),
        w.sweep_deg().to_radians(),
    )
    .to_path(PATH_TOLERANCE)
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct LegendSlot {
    x: f64,
    /// Vertical center of the row.
    y: f64,
    swatch: f64,
}

/// Rows fill the legend band top to bottom, then wrap into another column.
fn legend_slot(geom: &ChartGeometry, text_size: f64, count: usize, i: usize) -> LegendSlot {
    let row_h = text_size * LEGEND_ROW_SPACING;
    let band = (geom.legend_bottom - geom.legend_top).max(row_h);
    let rows_per_col = ((band / row_h).floor() as usize).max(1);
    let cols = count.div_ceil(rows_per_col).max(1);
    let col_w = (geom.size - 2.0 * geom.margin) / cols as f64;

    let col = i / rows_per_col;
    let row = i % rows_per_col;
    LegendSlot {
        x: geom.margin + col as f64 * col_w,
        y: geom.legend_top + (row as f64 + 0.5) * row_h,
        swatch: text_size,
    }
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
