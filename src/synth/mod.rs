//! Epicycle reconstruction and the per-timestep frame step.

pub(crate) mod chain;
pub(crate) mod frame;
pub(crate) mod state;

pub use chain::{EpicycleChain, EpicycleLink};
pub use frame::{FrameSynthesizer, SynthParams};
pub use state::{SynthesisState, TraceBuffer};
