use rayon::prelude::*;

use crate::encode::sink::{FrameMeta, FrameSink, InMemorySink, SinkConfig};
use crate::foundation::core::Timestep;
use crate::foundation::error::{EpicycleError, EpicycleResult};
use crate::foundation::progress::{RunHooks, Stage};
use crate::render::FrameRGBA;
use crate::session::config::AnimationConfig;
use crate::spectrum::Spectrum;
use crate::synth::{EpicycleChain, FrameSynthesizer, SynthParams, SynthesisState, TraceBuffer};

/// Counters of one [`render_animation`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Epicycle frames rendered (one per timestep).
    pub timesteps: u64,
    /// Frames handed to the sink, including the trace-only frame.
    pub frames_emitted: u64,
    /// Parallel batches used; 0 for sequential runs.
    pub chunks: u64,
}

/// A fully materialized animation, as returned by [`render_frames`].
#[derive(Clone, Debug)]
pub struct Animation {
    /// `N` epicycle frames followed by the final trace.
    pub frames: Vec<FrameRGBA>,
    /// Display time of each frame, in milliseconds.
    pub durations_ms: Vec<u32>,
}

/// Durations for `n` timesteps: `n` × frame duration, then the final hold.
pub fn frame_durations(n: usize, cfg: &AnimationConfig) -> Vec<u32> {
    let mut out = vec![cfg.frame_duration_ms; n];
    out.push(cfg.final_hold_ms);
    out
}

/// Render every timestep of `spectrum` and stream the frames into `sink`.
///
/// Emits `N` epicycle frames in timestep order followed by the final trace on its own, which is
/// held for `final_hold_ms`. Only the trace (and, when parallel, one chunk of frames) is kept in
/// memory.
#[tracing::instrument(
    skip_all,
    fields(n = spectrum.len(), size = cfg.image_size, parallel = cfg.threading.parallel)
)]
pub fn render_animation(
    spectrum: &Spectrum,
    cfg: &AnimationConfig,
    sink: &mut dyn FrameSink,
    hooks: RunHooks<'_>,
) -> EpicycleResult<RenderStats> {
    cfg.validate()?;
    ensure_bins(spectrum)?;
    let n = spectrum.len();
    let total = n as u64 + 1;
    let canvas = cfg.canvas();
    let mut synth = FrameSynthesizer::new(cfg.synth_params())?;

    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        frame_count: total,
        save_last: cfg.save_last,
    })?;

    let mut stats = RenderStats::default();
    let trace = if cfg.threading.parallel {
        render_parallel(spectrum, cfg, &mut synth, sink, hooks, &mut stats)?
    } else {
        render_sequential(spectrum, cfg, &mut synth, sink, hooks, &mut stats)?
    };

    sink.push_frame(
        FrameMeta {
            index: n as u64,
            duration_ms: cfg.final_hold_ms,
            is_final: true,
        },
        trace.frame(),
    )?;
    stats.frames_emitted += 1;
    hooks.report(Stage::Synthesis, total, total);
    sink.end()?;

    tracing::info!(
        frames = stats.frames_emitted,
        chunks = stats.chunks,
        "animation rendered"
    );
    Ok(stats)
}

/// [`render_animation`] into memory. Holds all `N + 1` frames; prefer a streaming sink for large
/// inputs.
pub fn render_frames(spectrum: &Spectrum, cfg: &AnimationConfig) -> EpicycleResult<Animation> {
    let mut sink = InMemorySink::new();
    render_animation(spectrum, cfg, &mut sink, RunHooks::none())?;
    let durations_ms = sink.durations_ms();
    let frames = sink.into_frames().into_iter().map(|(_, f)| f).collect();
    Ok(Animation {
        frames,
        durations_ms,
    })
}

/// Display frame of timestep `t`, drawn over the trace of timesteps `0..t`.
pub fn render_single_frame(
    spectrum: &Spectrum,
    cfg: &AnimationConfig,
    t: Timestep,
) -> EpicycleResult<FrameRGBA> {
    cfg.validate()?;
    ensure_bins(spectrum)?;
    if t.0 >= spectrum.len() as u64 {
        return Err(EpicycleError::validation(format!(
            "timestep {} out of range for {} coefficients",
            t.0,
            spectrum.len()
        )));
    }
    let mut synth = FrameSynthesizer::new(cfg.synth_params())?;
    let mut state = SynthesisState::new(synth.blank_trace());
    while state.timestep() < t {
        state = state.advance(&mut synth, spectrum)?;
    }
    let (display, _) = state.step(&mut synth, spectrum)?;
    Ok(display)
}

fn ensure_bins(spectrum: &Spectrum) -> EpicycleResult<()> {
    if spectrum.is_empty() {
        return Err(EpicycleError::validation("cannot render an empty spectrum"));
    }
    Ok(())
}

fn frame_meta(t: Timestep, cfg: &AnimationConfig) -> FrameMeta {
    FrameMeta {
        index: t.0,
        duration_ms: cfg.frame_duration_ms,
        is_final: false,
    }
}

fn render_sequential(
    spectrum: &Spectrum,
    cfg: &AnimationConfig,
    synth: &mut FrameSynthesizer,
    sink: &mut dyn FrameSink,
    hooks: RunHooks<'_>,
    stats: &mut RenderStats,
) -> EpicycleResult<TraceBuffer> {
    let total = spectrum.len() as u64 + 1;
    let mut state = SynthesisState::new(synth.blank_trace());
    while !state.is_complete(spectrum) {
        hooks.check(Stage::Synthesis)?;
        let t = state.timestep();
        let (display, next) = state.step(synth, spectrum)?;
        sink.push_frame(frame_meta(t, cfg), &display)?;
        stats.timesteps += 1;
        stats.frames_emitted += 1;
        hooks.report(Stage::Synthesis, t.0 + 1, total);
        state = next;
    }
    Ok(state.into_trace())
}

// Traces are advanced sequentially (markers only), then each chunk's display frames are drawn on
// the pool against the trace snapshot taken before their timestep.
fn render_parallel(
    spectrum: &Spectrum,
    cfg: &AnimationConfig,
    synth: &mut FrameSynthesizer,
    sink: &mut dyn FrameSink,
    hooks: RunHooks<'_>,
    stats: &mut RenderStats,
) -> EpicycleResult<TraceBuffer> {
    let n = spectrum.len();
    let total = n as u64 + 1;
    let chunk_size = cfg.threading.normalized_chunk_size();
    let params = cfg.synth_params();
    let pool = cfg.threading.build_pool()?;

    let mut state = SynthesisState::new(synth.blank_trace());
    let mut chunk_start = 0usize;
    while chunk_start < n {
        let chunk_end = (chunk_start + chunk_size).min(n);

        let mut snapshots = Vec::with_capacity(chunk_end - chunk_start);
        for _ in chunk_start..chunk_end {
            hooks.check(Stage::Synthesis)?;
            snapshots.push((state.timestep(), state.trace().clone()));
            state = state.advance(synth, spectrum)?;
        }

        let rendered = pool.install(|| {
            snapshots
                .par_iter()
                .map_init(
                    || FrameSynthesizer::new(params),
                    |worker, (t, trace)| render_snapshot(worker, params, spectrum, *t, trace, hooks),
                )
                .collect::<Vec<_>>()
        });
        drop(snapshots);

        for (offset, frame) in rendered.into_iter().enumerate() {
            let t = Timestep((chunk_start + offset) as u64);
            sink.push_frame(frame_meta(t, cfg), &frame?)?;
            stats.timesteps += 1;
            stats.frames_emitted += 1;
            hooks.report(Stage::Synthesis, t.0 + 1, total);
        }

        stats.chunks += 1;
        tracing::debug!(chunk_start, chunk_end, "chunk rendered");
        chunk_start = chunk_end;
    }
    Ok(state.into_trace())
}

fn render_snapshot(
    worker: &mut EpicycleResult<FrameSynthesizer>,
    params: SynthParams,
    spectrum: &Spectrum,
    t: Timestep,
    trace: &TraceBuffer,
    hooks: RunHooks<'_>,
) -> EpicycleResult<FrameRGBA> {
    hooks.check(Stage::Synthesis)?;
    let worker = match worker {
        Ok(w) => w,
        Err(e) => {
            return Err(EpicycleError::render(format!(
                "failed to start render worker for {}x{}: {e}",
                params.canvas.width, params.canvas.height
            )));
        }
    };
    let chain = EpicycleChain::at(spectrum, t);
    worker.render_display(&chain, trace)
}

#[cfg(test)]
#[path = "../../tests/unit/session/pipeline.rs"]
mod tests;
