use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{EpicycleError, EpicycleResult};

/// Colors and stroke width for the epicycle overlay.
///
/// Only affects appearance; geometry is fixed by the spectrum and the view mapping.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EpicycleStyle {
    /// Canvas fill behind everything.
    pub background: Rgba8Premul,
    /// Circle outlines.
    pub circle: Rgba8Premul,
    /// Radius segments between successive circle centers.
    pub segment: Rgba8Premul,
    /// Trace markers.
    pub marker: Rgba8Premul,
    /// Outline width in pixels.
    pub stroke_width: f64,
}

impl Default for EpicycleStyle {
    fn default() -> Self {
        Self {
            background: Rgba8Premul::opaque(0, 0, 0),
            circle: Rgba8Premul::opaque(0, 255, 0),
            segment: Rgba8Premul::opaque(255, 255, 255),
            marker: Rgba8Premul::opaque(255, 0, 0),
            stroke_width: 1.0,
        }
    }
}

impl EpicycleStyle {
    /// Stroke width must be finite and positive.
    pub fn validate(&self) -> EpicycleResult<()> {
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(EpicycleError::validation(
                "style stroke_width must be finite and > 0",
            ));
        }
        Ok(())
    }
}
