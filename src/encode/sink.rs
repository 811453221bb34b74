use crate::foundation::error::{EpicycleError, EpicycleResult};
use crate::render::FrameRGBA;

/// Configuration provided to a [`FrameSink`] at the start of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Frames that will be pushed: `N` timesteps plus the trace-only frame.
    pub frame_count: u64,
    /// Also persist the final frame as a standalone still image.
    pub save_last: bool,
}

/// Per-frame metadata accompanying [`FrameSink::push_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameMeta {
    /// 0-based position in the output sequence.
    pub index: u64,
    /// How long the frame stays on screen, in milliseconds.
    pub duration_ms: u32,
    /// `true` for the trailing trace-only frame.
    pub is_final: bool,
}

/// Sink contract for consuming rendered frames in output order.
///
/// Ordering contract: `push_frame` is called with strictly increasing `FrameMeta::index`,
/// starting at 0, exactly `SinkConfig::frame_count` times.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> EpicycleResult<()>;
    /// Push one frame in output order.
    fn push_frame(&mut self, meta: FrameMeta, frame: &FrameRGBA) -> EpicycleResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> EpicycleResult<()>;
}

/// In-memory sink for tests and small runs. Retains every frame.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameMeta, FrameRGBA)>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.clone()
    }

    /// Borrow the captured frames with their metadata.
    pub fn frames(&self) -> &[(FrameMeta, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` was called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Per-frame durations in output order.
    pub fn durations_ms(&self) -> Vec<u32> {
        self.frames.iter().map(|(m, _)| m.duration_ms).collect()
    }

    /// Take ownership of the captured frames.
    pub fn into_frames(self) -> Vec<(FrameMeta, FrameRGBA)> {
        self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> EpicycleResult<()> {
        self.frames.clear();
        self.frames
            .reserve(usize::try_from(cfg.frame_count).unwrap_or(0).min(4096));
        self.cfg = Some(cfg);
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, meta: FrameMeta, frame: &FrameRGBA) -> EpicycleResult<()> {
        if self.cfg.is_none() {
            return Err(EpicycleError::encode("push_frame called before begin"));
        }
        self.frames.push((meta, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> EpicycleResult<()> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
