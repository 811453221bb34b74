//! Run configuration and the end-to-end animation pipeline.

pub(crate) mod config;
pub(crate) mod pipeline;

pub use config::{AnimationConfig, DEFAULT_FINAL_HOLD_MS, MIN_FRAME_DURATION_MS};
pub use pipeline::{
    Animation, RenderStats, frame_durations, render_animation, render_frames, render_single_frame,
};
