use crate::foundation::core::{Canvas, Complex64, Point};

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Linear map from the logical box `(-1-1i, 1+1i)` onto canvas pixels.
///
/// The real axis runs left to right and the imaginary axis top to bottom, matching raster
/// row order. Points outside the box map outside the canvas and are clipped by the rasterizer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewMapping {
    half_w: f64,
    half_h: f64,
}

impl ViewMapping {
    /// Mapping for a canvas of the given size.
    pub fn for_canvas(canvas: Canvas) -> Self {
        Self {
            half_w: f64::from(canvas.width) / 2.0,
            half_h: f64::from(canvas.height) / 2.0,
        }
    }

    /// Pixel position of a logical point.
    pub fn to_pixel(self, z: Complex64) -> Point {
        Point::new((z.re + 1.0) * self.half_w, (z.im + 1.0) * self.half_h)
    }

    /// Horizontal/vertical pixel radii of a logical radius.
    pub fn radii(self, r: f64) -> (f64, f64) {
        (r * self.half_w, r * self.half_h)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
