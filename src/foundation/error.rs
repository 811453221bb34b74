/// Result alias used across the crate.
pub type EpicycleResult<T> = Result<T, EpicycleError>;

/// Errors surfaced by analysis, synthesis, extraction and encoding.
#[derive(thiserror::Error, Debug)]
pub enum EpicycleError {
    /// Malformed input or configuration (empty samples, zero-sized canvas, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// Rasterization failure.
    #[error("render error: {0}")]
    Render(String),

    /// Frame sink / container failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// SVG parsing or path extraction failure.
    #[error("svg error: {0}")]
    Svg(String),

    /// The run was cancelled between bins or timesteps.
    #[error("cancelled: {0}")]
    Cancelled(String),

    /// Anything else, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EpicycleError {
    /// Build a [`EpicycleError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`EpicycleError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`EpicycleError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`EpicycleError::Svg`].
    pub fn svg(msg: impl Into<String>) -> Self {
        Self::Svg(msg.into())
    }

    /// Build a [`EpicycleError::Cancelled`].
    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    /// Return `true` for [`EpicycleError::Cancelled`].
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
