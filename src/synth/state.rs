use crate::foundation::core::{Canvas, Complex64, Rgba8Premul, Timestep};
use crate::foundation::error::{EpicycleError, EpicycleResult};
use crate::render::FrameRGBA;
use crate::spectrum::Spectrum;
use crate::synth::frame::FrameSynthesizer;

/// Accumulated tip markers of every timestep rendered so far. Never holds circles or segments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceBuffer(FrameRGBA);

impl TraceBuffer {
    /// Trace with no markers yet.
    pub fn blank(canvas: Canvas, background: Rgba8Premul) -> Self {
        Self(FrameRGBA::solid(canvas, background))
    }

    /// Adopt `frame` as the accumulated trace.
    pub fn from_frame(frame: FrameRGBA) -> Self {
        Self(frame)
    }

    /// Current trace pixels.
    pub fn frame(&self) -> &FrameRGBA {
        &self.0
    }

    /// Unwrap the trace pixels.
    pub fn into_frame(self) -> FrameRGBA {
        self.0
    }
}

/// Trace plus the position of the loop, threaded by value from one timestep to the next.
#[derive(Clone, Debug)]
pub struct SynthesisState {
    trace: TraceBuffer,
    next: Timestep,
    last_tip: Option<Complex64>,
}

impl SynthesisState {
    /// State before timestep 0.
    pub fn new(trace: TraceBuffer) -> Self {
        Self {
            trace,
            next: Timestep(0),
            last_tip: None,
        }
    }

    /// Timestep the next [`SynthesisState::step`] renders.
    pub fn timestep(&self) -> Timestep {
        self.next
    }

    /// Tip of the most recently rendered timestep.
    pub fn last_tip(&self) -> Option<Complex64> {
        self.last_tip
    }

    /// Markers of every timestep rendered so far.
    pub fn trace(&self) -> &TraceBuffer {
        &self.trace
    }

    /// Consume the state, keeping only its trace.
    pub fn into_trace(self) -> TraceBuffer {
        self.trace
    }

    /// `true` once all `N` timesteps of `spectrum` are rendered.
    pub fn is_complete(&self, spectrum: &Spectrum) -> bool {
        self.next.0 >= spectrum.len() as u64
    }

    /// Render the current timestep, returning its display frame and the successor state.
    pub fn step(
        self,
        synth: &mut FrameSynthesizer,
        spectrum: &Spectrum,
    ) -> EpicycleResult<(FrameRGBA, SynthesisState)> {
        self.ensure_pending(spectrum)?;
        let t = self.next;
        let (display, trace) = synth.synthesize(spectrum, t, self.trace)?;
        Ok((
            display,
            SynthesisState {
                trace,
                next: Timestep(t.0 + 1),
                last_tip: Some(spectrum.reconstruct(t)),
            },
        ))
    }

    /// Like [`SynthesisState::step`] but only advances the trace.
    pub fn advance(
        self,
        synth: &mut FrameSynthesizer,
        spectrum: &Spectrum,
    ) -> EpicycleResult<SynthesisState> {
        self.ensure_pending(spectrum)?;
        let t = self.next;
        let tip = spectrum.reconstruct(t);
        let trace = synth.advance_trace(tip, self.trace)?;
        Ok(SynthesisState {
            trace,
            next: Timestep(t.0 + 1),
            last_tip: Some(tip),
        })
    }

    fn ensure_pending(&self, spectrum: &Spectrum) -> EpicycleResult<()> {
        if self.is_complete(spectrum) {
            return Err(EpicycleError::validation(format!(
                "synthesis already finished all {} timesteps",
                spectrum.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/synth/state.rs"]
mod tests;
