//! Frame sinks.
//!
//! Sinks consume rendered frames in output order and are driven by
//! [`render_animation`](crate::render_animation).

/// Animated GIF sink.
pub mod gif;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
/// Still-image output.
pub mod still;
