use std::path::Path;

use anyhow::Context as _;

use crate::encode::gif::GifRepeat;
use crate::foundation::core::Canvas;
use crate::foundation::error::{EpicycleError, EpicycleResult};
use crate::foundation::threading::Threading;
use crate::render::EpicycleStyle;
use crate::synth::SynthParams;

/// Hold time of the trailing trace-only frame, in milliseconds.
pub const DEFAULT_FINAL_HOLD_MS: u32 = 1 << 15;

/// Shortest frame a GIF can carry; delays are stored in whole centiseconds.
pub const MIN_FRAME_DURATION_MS: u32 = 10;

/// Everything a run needs besides the spectrum. Immutable for the duration of a run.
///
/// Deserializes from JSON with every field optional; missing fields take the defaults below.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Side of the square output image, in pixels.
    pub image_size: u32,
    /// Trace marker radius in logical units (the logical box spans 2 units).
    pub point_radius: f64,
    /// Duration of every epicycle frame, in milliseconds.
    pub frame_duration_ms: u32,
    /// Duration of the trailing trace-only frame, in milliseconds.
    pub final_hold_ms: u32,
    /// Also persist the final frame as a still image.
    pub save_last: bool,
    /// Report progress while running.
    pub progress: bool,
    /// GIF loop policy.
    pub repeat: GifRepeat,
    /// Parallel transform and rendering settings.
    pub threading: Threading,
    /// Colors and stroke width.
    pub style: EpicycleStyle,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            image_size: 500,
            point_radius: 0.01,
            frame_duration_ms: 20,
            final_hold_ms: DEFAULT_FINAL_HOLD_MS,
            save_last: false,
            progress: true,
            repeat: GifRepeat::default(),
            threading: Threading::default(),
            style: EpicycleStyle::default(),
        }
    }
}

impl AnimationConfig {
    /// Reject sizes, durations and styles no run can honor.
    ///
    /// Durations below [`MIN_FRAME_DURATION_MS`] would be written as a zero GIF delay.
    pub fn validate(&self) -> EpicycleResult<()> {
        self.canvas().validate()?;
        if self.frame_duration_ms < MIN_FRAME_DURATION_MS {
            return Err(EpicycleError::validation(format!(
                "frame duration must be at least {MIN_FRAME_DURATION_MS} ms"
            )));
        }
        if self.final_hold_ms < MIN_FRAME_DURATION_MS {
            return Err(EpicycleError::validation(format!(
                "final hold must be at least {MIN_FRAME_DURATION_MS} ms"
            )));
        }
        self.threading.validate()?;
        self.synth_params().validate()
    }

    /// Square output canvas of side `image_size`.
    pub fn canvas(&self) -> Canvas {
        Canvas::square(self.image_size)
    }

    /// The per-frame drawing inputs of this config.
    pub fn synth_params(&self) -> SynthParams {
        SynthParams {
            canvas: self.canvas(),
            point_radius: self.point_radius,
            style: self.style,
        }
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(s: &str) -> EpicycleResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| EpicycleError::validation(format!("invalid animation config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> EpicycleResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read animation config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
