//! Direct O(N²) discrete transform of a complex sample sequence.

mod dft;

pub use dft::{AnalyzeOpts, Spectrum, dft_bin};
