use crate::foundation::core::{Canvas, Rgba8Premul};
use crate::foundation::error::{EpicycleError, EpicycleResult};

/// A rendered frame as RGBA8 pixels.
///
/// Frames produced by this crate are **premultiplied alpha**. The `premultiplied` flag is
/// included to make this explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// A frame filled with one color.
    pub fn solid(canvas: Canvas, color: Rgba8Premul) -> Self {
        let px = color.to_array();
        let mut data = vec![0u8; canvas.rgba_len()];
        for chunk in data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
        Self {
            width: canvas.width,
            height: canvas.height,
            data,
            premultiplied: true,
        }
    }

    /// Dimensions of this frame.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Check that `data` matches `width * height * 4`.
    pub fn validate(&self) -> EpicycleResult<()> {
        if self.data.len() != self.canvas().rgba_len() {
            return Err(EpicycleError::validation(format!(
                "frame data length {} does not match {}x{} rgba8",
                self.data.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }

    /// Convert to a straight-alpha `image` buffer for encoders.
    pub fn to_rgba_image(&self) -> EpicycleResult<image::RgbaImage> {
        self.validate()?;
        let mut data = self.data.clone();
        if self.premultiplied {
            for px in data.chunks_exact_mut(4) {
                unpremultiply_in_place(px);
            }
        }
        image::RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| EpicycleError::encode("frame buffer does not fit its dimensions"))
    }
}

fn unpremultiply_in_place(px: &mut [u8]) {
    let a = u32::from(px[3]);
    if a == 0 || a == 255 {
        return;
    }
    for c in &mut px[..3] {
        *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
