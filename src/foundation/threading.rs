use crate::foundation::error::{EpicycleError, EpicycleResult};

/// Parallelism settings shared by the transform and the frame pipeline.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Threading {
    /// Use a rayon pool instead of the calling thread.
    pub parallel: bool,
    /// Timesteps rendered per parallel batch; bounds the number of frames held at once.
    pub chunk_size: usize,
    /// Worker count; `None` lets rayon decide.
    pub threads: Option<usize>,
}

impl Default for Threading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 32,
            threads: None,
        }
    }
}

impl Threading {
    /// Sequential evaluation on the calling thread.
    pub fn sequential() -> Self {
        Self::default()
    }

    /// Parallel evaluation with rayon's default worker count.
    pub fn parallel() -> Self {
        Self {
            parallel: true,
            ..Self::default()
        }
    }

    /// An explicit worker count must be at least one.
    pub fn validate(&self) -> EpicycleResult<()> {
        if self.threads == Some(0) {
            return Err(EpicycleError::validation(
                "threading 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }

    pub(crate) fn normalized_chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }

    pub(crate) fn build_pool(&self) -> EpicycleResult<rayon::ThreadPool> {
        self.validate()?;
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(n) = self.threads {
            builder = builder.num_threads(n);
        }
        builder
            .build()
            .map_err(|e| EpicycleError::render(format!("failed to build rayon thread pool: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/threading.rs"]
mod tests;
