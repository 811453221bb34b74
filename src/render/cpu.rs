use kurbo::Shape;

use crate::foundation::core::{Canvas, Complex64, Rgba8Premul};
use crate::foundation::error::{EpicycleError, EpicycleResult};
use crate::foundation::math::ViewMapping;
use crate::render::composite::over_in_place;
use crate::render::frame::FrameRGBA;

const PATH_TOLERANCE: f64 = 0.1;

/// CPU rasterizer powered by `vello_cpu`.
///
/// Layers are drawn onto a scratch pixmap that starts fully transparent on every call and are
/// then composited over a caller-owned frame, so output depends only on the draw calls.
pub struct Rasterizer {
    canvas: Canvas,
    width: u16,
    height: u16,
    mapping: ViewMapping,
    ctx: Option<vello_cpu::RenderContext>,
    scratch: vello_cpu::Pixmap,
}

impl Rasterizer {
    /// Rasterizer for `canvas`, mapping the logical view `[-1, 1]²` onto it.
    pub fn new(canvas: Canvas) -> EpicycleResult<Self> {
        canvas.validate()?;
        let (width, height) = canvas.as_u16()?;
        Ok(Self {
            canvas,
            width,
            height,
            mapping: ViewMapping::for_canvas(canvas),
            ctx: None,
            scratch: vello_cpu::Pixmap::new(width, height),
        })
    }

    /// Draw one layer with `draw` and composite it source-over onto `dst`.
    pub fn paint_over(
        &mut self,
        dst: &mut FrameRGBA,
        draw: impl FnOnce(&mut LayerPainter<'_>),
    ) -> EpicycleResult<()> {
        dst.validate()?;
        if dst.canvas() != self.canvas {
            return Err(EpicycleError::render(format!(
                "target frame is {}x{}, rasterizer is {}x{}",
                dst.width, dst.height, self.canvas.width, self.canvas.height
            )));
        }

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == self.width && ctx.height() == self.height => ctx,
            _ => vello_cpu::RenderContext::new(self.width, self.height),
        };
        ctx.reset();

        let mut painter = LayerPainter {
            ctx: &mut ctx,
            mapping: self.mapping,
        };
        draw(&mut painter);

        ctx.flush();
        clear_pixmap(&mut self.scratch);
        ctx.render_to_pixmap(&mut self.scratch);
        self.ctx = Some(ctx);

        over_in_place(&mut dst.data, self.scratch.data_as_u8_slice())
    }
}

/// Draw calls in logical coordinates, mapped to pixels through the canvas [`ViewMapping`].
pub struct LayerPainter<'a> {
    ctx: &'a mut vello_cpu::RenderContext,
    mapping: ViewMapping,
}

impl LayerPainter<'_> {
    /// Outline of a circle of logical radius `radius`. Zero radii are drawn like any other.
    pub fn stroke_circle(
        &mut self,
        center: Complex64,
        radius: f64,
        color: Rgba8Premul,
        width: f64,
    ) {
        let path = self.ellipse_path(center, radius);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(to_cpu_color(color));
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&path);
    }

    /// Straight segment between two logical points.
    pub fn stroke_segment(
        &mut self,
        from: Complex64,
        to: Complex64,
        color: Rgba8Premul,
        width: f64,
    ) {
        let line = kurbo::Line::new(self.mapping.to_pixel(from), self.mapping.to_pixel(to));
        let path = bezpath_to_cpu(&line.to_path(PATH_TOLERANCE));
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(to_cpu_color(color));
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&path);
    }

    /// Filled disc of logical radius `radius`.
    pub fn fill_disc(&mut self, center: Complex64, radius: f64, color: Rgba8Premul) {
        let path = self.ellipse_path(center, radius);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(to_cpu_color(color));
        self.ctx.fill_path(&path);
    }

    // Non-square canvases stretch circles into axis-aligned ellipses.
    fn ellipse_path(&self, center: Complex64, radius: f64) -> vello_cpu::kurbo::BezPath {
        let e = kurbo::Ellipse::new(
            self.mapping.to_pixel(center),
            self.mapping.radii(radius),
            0.0,
        );
        bezpath_to_cpu(&e.to_path(PATH_TOLERANCE))
    }
}

fn to_cpu_color(c: Rgba8Premul) -> vello_cpu::peniko::Color {
    // vello_cpu paints take straight alpha.
    let straight = |v: u8| -> u8 {
        if c.a == 0 {
            0
        } else {
            ((u32::from(v) * 255 + u32::from(c.a) / 2) / u32::from(c.a)).min(255) as u8
        }
    };
    vello_cpu::peniko::Color::from_rgba8(straight(c.r), straight(c.g), straight(c.b), c.a)
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
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

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
