use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::foundation::error::{EpicycleError, EpicycleResult};

/// Long-running phase a progress report refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Spectrum bins (one unit per bin).
    Transform,
    /// Animation timesteps (one unit per emitted frame).
    Synthesis,
}

impl Stage {
    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Transform => "transform",
            Stage::Synthesis => "synthesis",
        }
    }
}

/// Observer notified as bins and timesteps complete.
///
/// Reports are purely observational. During parallel evaluation `on_progress` can be called
/// from worker threads and `done` values may arrive out of order.
pub trait ProgressObserver: Sync {
    /// `done` of `total` units of `stage` are finished.
    fn on_progress(&self, stage: Stage, done: u64, total: u64);
}

/// Observer that ignores every report.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _stage: Stage, _done: u64, _total: u64) {}
}

/// Shared cancellation flag, polled between bins and between timesteps.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// New, not-yet-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Optional progress/cancellation hooks threaded through a run.
#[derive(Clone, Copy, Default)]
pub struct RunHooks<'a> {
    /// Progress observer.
    pub progress: Option<&'a dyn ProgressObserver>,
    /// Cancellation flag.
    pub cancel: Option<&'a CancelToken>,
}

impl<'a> RunHooks<'a> {
    /// Hooks with neither progress nor cancellation.
    pub fn none() -> Self {
        Self::default()
    }

    /// Attach a progress observer.
    pub fn with_progress(mut self, progress: &'a dyn ProgressObserver) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancel(mut self, cancel: &'a CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub(crate) fn report(&self, stage: Stage, done: u64, total: u64) {
        if let Some(p) = self.progress {
            p.on_progress(stage, done, total);
        }
    }

    pub(crate) fn check(&self, stage: Stage) -> EpicycleResult<()> {
        match self.cancel {
            Some(c) if c.is_cancelled() => Err(EpicycleError::cancelled(format!(
                "{} interrupted",
                stage.label()
            ))),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for RunHooks<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunHooks")
            .field("progress", &self.progress.is_some())
            .field("cancel", &self.cancel)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/progress.rs"]
mod tests;
