//! Epicycle turns a closed drawing into a Fourier epicycle animation.
//!
//! A run has three stages:
//!
//! - Sample a drawing into complex points ([`points_from_svg`]) and transform them into a
//!   [`Spectrum`] of DFT coefficients
//! - Rebuild the drawing one timestep at a time as a chain of rotating circles
//!   ([`FrameSynthesizer`], [`SynthesisState`]), accumulating the traced path
//! - Stream the frames, plus a final trace-only frame, into a [`FrameSink`] such as [`GifSink`]
//!   via [`render_animation`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Frame sinks and still-image output.
pub mod encode;
/// Point sampling from SVG drawings.
pub mod extract;
/// CPU rasterization of epicycle layers.
pub mod render;
/// Run configuration and the animation pipeline.
pub mod session;
/// Discrete Fourier transform of sample points.
pub mod spectrum;
/// Per-timestep epicycle geometry and frame synthesis.
pub mod synth;

pub use crate::foundation::core::{
    BezPath, Canvas, Coefficient, Complex64, Point, Rgba8Premul, SamplePoint, Timestep,
};
pub use crate::foundation::error::{EpicycleError, EpicycleResult};
pub use crate::foundation::math::ViewMapping;
pub use crate::foundation::progress::{CancelToken, NoProgress, ProgressObserver, RunHooks, Stage};
pub use crate::foundation::threading::Threading;

pub use crate::encode::gif::{GifRepeat, GifSink, GifSinkOpts};
pub use crate::encode::sink::{FrameMeta, FrameSink, InMemorySink, SinkConfig};
pub use crate::encode::still::write_png;
pub use crate::extract::{
    ExtractOpts, dedup_points, points_from_path_data, points_from_svg, points_from_svg_file,
};
pub use crate::render::{EpicycleStyle, FrameRGBA, Rasterizer};
pub use crate::session::{
    Animation, AnimationConfig, DEFAULT_FINAL_HOLD_MS, MIN_FRAME_DURATION_MS, RenderStats,
    frame_durations, render_animation, render_frames, render_single_frame,
};
pub use crate::spectrum::{AnalyzeOpts, Spectrum, dft_bin};
pub use crate::synth::{
    EpicycleChain, EpicycleLink, FrameSynthesizer, SynthParams, SynthesisState, TraceBuffer,
};
