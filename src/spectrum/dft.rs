use std::f64::consts::TAU;
use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;

use crate::foundation::core::{Coefficient, Complex64, SamplePoint, Timestep};
use crate::foundation::error::{EpicycleError, EpicycleResult};
use crate::foundation::progress::{RunHooks, Stage};
use crate::foundation::threading::Threading;

/// Options for [`Spectrum::analyze_with`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalyzeOpts {
    /// Bin-level parallelism. `chunk_size` is ignored here.
    pub threading: Threading,
}

/// The `1/N`-normalized discrete spectrum of a sample sequence.
///
/// Bin 0 is the mean of the samples; bins are kept in index order (no frequency sorting), so
/// the upper half holds the negative frequencies.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "SpectrumRepr")]
pub struct Spectrum {
    coefficients: Vec<Coefficient>,
}

#[derive(serde::Deserialize)]
struct SpectrumRepr {
    coefficients: Vec<Coefficient>,
}

impl TryFrom<SpectrumRepr> for Spectrum {
    type Error = EpicycleError;

    fn try_from(repr: SpectrumRepr) -> Result<Self, Self::Error> {
        Self::from_coefficients(repr.coefficients)
    }
}

/// Unit phasor `exp(sign · 2πi · a·b / n)`.
///
/// The product `a·b` is reduced modulo `n` first, so the angle always lies in one turn and
/// large indices do not lose precision.
fn unit_phasor(a: usize, b: usize, n: usize, sign: f64) -> Complex64 {
    let r = ((a as u128 * b as u128) % n as u128) as f64;
    Complex64::from_polar(1.0, sign * TAU * r / (n as f64))
}

/// Evaluate one bin: `(1/N) Σ point[i] · exp(-2πi·k·i/N)`.
///
/// `points` must be non-empty.
pub fn dft_bin(points: &[SamplePoint], k: usize) -> Coefficient {
    let n = points.len();
    let sum = points
        .iter()
        .enumerate()
        .fold(Complex64::new(0.0, 0.0), |acc, (i, &p)| {
            acc + p * unit_phasor(k, i, n, -1.0)
        });
    sum / (n as f64)
}

impl Spectrum {
    /// Sequential transform without progress reporting.
    pub fn analyze(points: &[SamplePoint]) -> EpicycleResult<Self> {
        Self::analyze_with(points, &AnalyzeOpts::default(), RunHooks::none())
    }

    /// Transform `points`, optionally on a rayon pool, reporting one progress unit per bin.
    ///
    /// Parallel and sequential evaluation produce bit-identical coefficients.
    #[tracing::instrument(skip(points, hooks), fields(n = points.len()))]
    pub fn analyze_with(
        points: &[SamplePoint],
        opts: &AnalyzeOpts,
        hooks: RunHooks<'_>,
    ) -> EpicycleResult<Self> {
        if points.is_empty() {
            return Err(EpicycleError::validation(
                "spectrum requires at least one sample point",
            ));
        }
        if let Some(bad) = points.iter().position(|p| !p.is_finite()) {
            return Err(EpicycleError::validation(format!(
                "sample point {bad} is not finite"
            )));
        }

        let n = points.len();
        let total = n as u64;

        let coefficients = if opts.threading.parallel {
            let pool = opts.threading.build_pool()?;
            let done = AtomicU64::new(0);
            pool.install(|| {
                (0..n)
                    .into_par_iter()
                    .map(|k| -> EpicycleResult<Coefficient> {
                        hooks.check(Stage::Transform)?;
                        let c = dft_bin(points, k);
                        let d = done.fetch_add(1, Ordering::Relaxed) + 1;
                        hooks.report(Stage::Transform, d, total);
                        Ok(c)
                    })
                    .collect::<EpicycleResult<Vec<_>>>()
            })?
        } else {
            let mut out = Vec::with_capacity(n);
            for k in 0..n {
                hooks.check(Stage::Transform)?;
                out.push(dft_bin(points, k));
                hooks.report(Stage::Transform, (k + 1) as u64, total);
            }
            out
        };

        tracing::debug!(bins = n, dc = ?coefficients[0], "spectrum ready");
        Ok(Self { coefficients })
    }

    /// Wrap precomputed coefficients. Empty or non-finite input is rejected.
    pub fn from_coefficients(coefficients: Vec<Coefficient>) -> EpicycleResult<Self> {
        if coefficients.is_empty() {
            return Err(EpicycleError::validation(
                "spectrum requires at least one coefficient",
            ));
        }
        if let Some(bad) = coefficients.iter().position(|c| !c.is_finite()) {
            return Err(EpicycleError::validation(format!(
                "coefficient {bad} is not finite"
            )));
        }
        Ok(Self { coefficients })
    }

    #[cfg(test)]
    pub(crate) fn unchecked(coefficients: Vec<Coefficient>) -> Self {
        Self { coefficients }
    }

    /// Number of bins (`N`).
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// Whether there are no bins. Every constructor and deserializer rejects that case.
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Coefficients in bin order.
    pub fn coefficients(&self) -> &[Coefficient] {
        &self.coefficients
    }

    /// The DC term (mean of the samples).
    pub fn dc(&self) -> Coefficient {
        self.coefficients[0]
    }

    /// Rotation of bin `i` at timestep `t`: `exp(+2πi·t·i/N)`.
    pub fn phasor(&self, i: usize, t: Timestep) -> Complex64 {
        let n = self.len();
        unit_phasor((t.0 % n as u64) as usize, i, n, 1.0)
    }

    /// Contribution of bin `i` at timestep `t`.
    pub fn term(&self, i: usize, t: Timestep) -> Complex64 {
        self.coefficients[i] * self.phasor(i, t)
    }

    /// Full inverse sum at timestep `t`, accumulated in bin order.
    ///
    /// Equal to the tip of the epicycle chain drawn for `t`.
    pub fn reconstruct(&self, t: Timestep) -> Complex64 {
        (0..self.len()).fold(Complex64::new(0.0, 0.0), |acc, i| acc + self.term(i, t))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spectrum/dft.rs"]
mod tests;
