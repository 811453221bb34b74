use crate::foundation::core::{Canvas, Complex64, Timestep};
use crate::foundation::error::{EpicycleError, EpicycleResult};
use crate::render::{EpicycleStyle, FrameRGBA, Rasterizer};
use crate::spectrum::Spectrum;
use crate::synth::chain::EpicycleChain;
use crate::synth::state::TraceBuffer;

/// Inputs that fix the look of every frame in a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SynthParams {
    /// Output size.
    pub canvas: Canvas,
    /// Trace marker radius in logical units.
    pub point_radius: f64,
    /// Colors and stroke width.
    pub style: EpicycleStyle,
}

impl SynthParams {
    /// Validate the canvas, the style and the marker radius.
    pub fn validate(&self) -> EpicycleResult<()> {
        self.canvas.validate()?;
        self.style.validate()?;
        if !self.point_radius.is_finite() || self.point_radius < 0.0 {
            return Err(EpicycleError::validation(
                "point radius must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// Renders the epicycle frame for one timestep and advances the trace.
///
/// The rasterizer inside is reused between calls, but every call starts from a clean layer, so
/// identical inputs always give identical bytes.
pub struct FrameSynthesizer {
    params: SynthParams,
    raster: Rasterizer,
}

impl FrameSynthesizer {
    /// Validate `params` and set up a rasterizer for its canvas.
    pub fn new(params: SynthParams) -> EpicycleResult<Self> {
        params.validate()?;
        Ok(Self {
            raster: Rasterizer::new(params.canvas)?,
            params,
        })
    }

    /// Empty trace filled with the background color.
    pub fn blank_trace(&self) -> TraceBuffer {
        TraceBuffer::blank(self.params.canvas, self.params.style.background)
    }

    /// `(trace, t) -> (display, trace')`.
    ///
    /// Consumes the incoming trace; the returned display frame and trace are independent values.
    pub fn synthesize(
        &mut self,
        spectrum: &Spectrum,
        t: Timestep,
        trace: TraceBuffer,
    ) -> EpicycleResult<(FrameRGBA, TraceBuffer)> {
        let chain = EpicycleChain::at(spectrum, t);
        let display = self.render_display(&chain, &trace)?;
        let trace = self.advance_trace(chain.tip, trace)?;
        Ok((display, trace))
    }

    /// Copy of `trace` with every circle, radius segment and the tip marker of `chain` on top.
    pub fn render_display(
        &mut self,
        chain: &EpicycleChain,
        trace: &TraceBuffer,
    ) -> EpicycleResult<FrameRGBA> {
        let style = self.params.style;
        let point_radius = self.params.point_radius;
        let mut display = trace.frame().clone();
        self.raster.paint_over(&mut display, |p| {
            for link in &chain.links {
                p.stroke_circle(link.center, link.radius, style.circle, style.stroke_width);
                p.stroke_segment(link.center, link.end, style.segment, style.stroke_width);
            }
            p.fill_disc(chain.tip, point_radius, style.marker);
        })?;
        Ok(display)
    }

    /// Stamp the tip marker into the trace.
    pub fn advance_trace(
        &mut self,
        tip: Complex64,
        trace: TraceBuffer,
    ) -> EpicycleResult<TraceBuffer> {
        let style = self.params.style;
        let point_radius = self.params.point_radius;
        let mut frame = trace.into_frame();
        self.raster
            .paint_over(&mut frame, |p| p.fill_disc(tip, point_radius, style.marker))?;
        Ok(TraceBuffer::from_frame(frame))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/synth/frame.rs"]
mod tests;
