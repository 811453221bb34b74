use crate::foundation::core::{Complex64, Timestep};
use crate::spectrum::Spectrum;

/// One epicycle: a circle of radius `|c_i|` around `center`, and the rotated radius ending at
/// `end`, which is the center of the next link.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpicycleLink {
    /// Sum of all earlier terms.
    pub center: Complex64,
    /// Magnitude of this bin's coefficient.
    pub radius: f64,
    /// `center` plus this bin's rotated term.
    pub end: Complex64,
}

/// The nested circles for one timestep, in bin order (not sorted by magnitude).
#[derive(Clone, Debug, PartialEq)]
pub struct EpicycleChain {
    /// Timestep the chain was evaluated at.
    pub timestep: Timestep,
    /// One link per bin.
    pub links: Vec<EpicycleLink>,
    /// Reconstructed path point; equals [`Spectrum::reconstruct`] for the same timestep.
    pub tip: Complex64,
}

impl EpicycleChain {
    /// Partial sums of the inverse transform at `t`, recomputed from the origin.
    pub fn at(spectrum: &Spectrum, t: Timestep) -> Self {
        let mut links = Vec::with_capacity(spectrum.len());
        let mut acc = Complex64::new(0.0, 0.0);
        for (i, c) in spectrum.coefficients().iter().enumerate() {
            let end = acc + spectrum.term(i, t);
            links.push(EpicycleLink {
                center: acc,
                radius: c.norm(),
                end,
            });
            acc = end;
        }
        Self {
            timestep: t,
            links,
            tip: acc,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/synth/chain.rs"]
mod tests;
