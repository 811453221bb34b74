//! CPU raster backend: frame buffers, layer compositing and `vello_cpu` drawing.

pub(crate) mod composite;
pub(crate) mod cpu;
pub(crate) mod frame;
pub(crate) mod style;

pub use cpu::{LayerPainter, Rasterizer};
pub use frame::FrameRGBA;
pub use style::EpicycleStyle;
