use rand::Rng;
use rand_distr::Distribution;
use statrs::distribution::Continuous;

use crate::foundation::core::Vec2;
use crate::foundation::error::{BplError, BplResult};

/// `n` evenly spaced values over `[lo, hi]`; a single sample sits at `lo`.
pub(crate) fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / ((n - 1) as f64);
            (0..n)
                .map(|i| if i == n - 1 { hi } else { lo + step * (i as f64) })
                .collect()
        }
    }
}

/// Zero-mean 2D Gaussian with independent axes.
///
/// `var_x` and `var_y` are variances (the diagonal of the covariance matrix).
#[derive(Clone, Copy, Debug)]
pub struct DiagonalGaussian {
    var_x: f64,
    var_y: f64,
    sample_x: rand_distr::Normal<f64>,
    sample_y: rand_distr::Normal<f64>,
    density_x: statrs::distribution::Normal,
    density_y: statrs::distribution::Normal,
}

impl DiagonalGaussian {
    /// Build from per-axis variances; both must be finite and positive.
    pub fn new(var_x: f64, var_y: f64) -> BplResult<Self> {
        for (name, v) in [("var_x", var_x), ("var_y", var_y)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(BplError::validation(format!(
                    "{name} must be finite and > 0, got {v}"
                )));
            }
        }
        let (sd_x, sd_y) = (var_x.sqrt(), var_y.sqrt());
        Ok(Self {
            var_x,
            var_y,
            sample_x: rand_distr::Normal::new(0.0, sd_x)
                .map_err(|e| BplError::validation(format!("x noise: {e}")))?,
            sample_y: rand_distr::Normal::new(0.0, sd_y)
                .map_err(|e| BplError::validation(format!("y noise: {e}")))?,
            density_x: statrs::distribution::Normal::new(0.0, sd_x)
                .map_err(|e| BplError::validation(format!("x noise: {e}")))?,
            density_y: statrs::distribution::Normal::new(0.0, sd_y)
                .map_err(|e| BplError::validation(format!("y noise: {e}")))?,
        })
    }

    /// Per-axis variances `(var_x, var_y)`.
    pub fn variances(&self) -> (f64, f64) {
        (self.var_x, self.var_y)
    }

    /// Draw one offset.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(self.sample_x.sample(rng), self.sample_y.sample(rng))
    }

    /// Log-density of offset `v`.
    pub fn log_prob(&self, v: Vec2) -> f64 {
        self.density_x.ln_pdf(v.x) + self.density_y.ln_pdf(v.y)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
