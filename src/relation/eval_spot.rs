//! Token-level attachment coordinate for `mid` relations.
//!
//! The draw is a Gaussian around the type-level eval spot, restricted to the spline's valid
//! parametric range by rejection. Scoring uses the untruncated log-density renormalized by the
//! Gaussian mass inside the range.

use rand::Rng;
use rand_distr::Distribution;
use statrs::distribution::{Continuous, ContinuousCDF};

use crate::foundation::error::{BplError, BplResult};
use crate::spline::bspline::bspline_bounds;

/// Upper limit on rejected draws before sampling fails.
pub const MAX_EVAL_SPOT_DRAWS: usize = 10_000;

/// Gaussian over the spline coordinate, restricted to the valid range `[lb, ub]`.
#[derive(Clone, Copy, Debug)]
pub struct EvalSpotDistribution {
    mean: f64,
    sigma: f64,
    lb: f64,
    ub: f64,
    sampler: rand_distr::Normal<f64>,
    density: statrs::distribution::Normal,
}

impl EvalSpotDistribution {
    /// Distribution around `mean` with std `sigma`, bounded by the range of an `ncpt`-point spline.
    pub fn new(mean: f64, sigma: f64, ncpt: usize) -> BplResult<Self> {
        if !mean.is_finite() {
            return Err(BplError::validation("eval spot mean must be finite"));
        }
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(BplError::validation("sigma_attach must be finite and > 0"));
        }
        let (lb, ub) = bspline_bounds(ncpt)?;
        Ok(Self {
            mean,
            sigma,
            lb,
            ub,
            sampler: rand_distr::Normal::new(mean, sigma)
                .map_err(|e| BplError::validation(format!("eval spot: {e}")))?,
            density: statrs::distribution::Normal::new(mean, sigma)
                .map_err(|e| BplError::validation(format!("eval spot: {e}")))?,
        })
    }

    /// Nominal eval spot.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Standard deviation before truncation.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Inclusive valid range `(lb, ub)`.
    pub fn bounds(&self) -> (f64, f64) {
        (self.lb, self.ub)
    }

    /// Probability mass of the untruncated Gaussian inside `[lb, ub]`.
    pub fn mass_within_bounds(&self) -> f64 {
        self.density.cdf(self.ub) - self.density.cdf(self.lb)
    }

    /// Draw until a value with finite score comes up.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BplResult<f64> {
        for _ in 0..MAX_EVAL_SPOT_DRAWS {
            let v = self.sampler.sample(rng);
            if self.score(v) != f64::NEG_INFINITY {
                return Ok(v);
            }
        }
        tracing::warn!(
            mean = self.mean,
            sigma = self.sigma,
            lb = self.lb,
            ub = self.ub,
            "eval spot rejection sampler exhausted"
        );
        Err(BplError::sampling(format!(
            "no eval spot inside [{}, {}] after {MAX_EVAL_SPOT_DRAWS} draws",
            self.lb, self.ub
        )))
    }

    /// Log-density of `v`, or negative infinity outside `[lb, ub]`.
    pub fn score(&self, v: f64) -> f64 {
        if !(self.lb <= v && v <= self.ub) {
            return f64::NEG_INFINITY;
        }
        self.density.ln_pdf(v) - self.mass_within_bounds().ln()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/relation/eval_spot.rs"]
mod tests;
