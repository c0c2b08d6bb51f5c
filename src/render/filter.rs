//! Same-size 2D convolution and the two kernels the renderer uses.

use rayon::prelude::*;

use crate::foundation::error::{BplError, BplResult};
use crate::render::grid::Grid;

/// Odd-sized 2D filter kernel, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    rows: usize,
    cols: usize,
    weights: Vec<f64>,
}

impl Kernel {
    /// Row-major kernel weights; `rows * cols` must match `weights.len()`.
    pub fn new(rows: usize, cols: usize, weights: Vec<f64>) -> BplResult<Self> {
        if rows % 2 == 0 || cols % 2 == 0 {
            return Err(BplError::render("kernel dimensions must be odd"));
        }
        if weights.len() != rows * cols {
            return Err(BplError::render(format!(
                "kernel expects {} weights, got {}",
                rows * cols,
                weights.len()
            )));
        }
        Ok(Self {
            rows,
            cols,
            weights,
        })
    }

    /// Kernel height.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Kernel width.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Weight at `(row, col)`.
    pub fn weight(&self, row: usize, col: usize) -> f64 {
        self.weights[row * self.cols + col]
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// 3x3 brush-broadening kernel: `b * [[a/12, a/6, a/12], [a/6, 1-a, a/6], [a/12, a/6, a/12]]`.
pub fn broaden_kernel(a: f64, b: f64) -> Kernel {
    let (c, e) = (a / 12.0, a / 6.0);
    Kernel {
        rows: 3,
        cols: 3,
        weights: [c, e, c, e, 1.0 - a, e, c, e, c]
            .iter()
            .map(|w| b * w)
            .collect(),
    }
}

/// Normalized `fsize x fsize` Gaussian, with negligible tails cut to exactly zero.
pub fn fspecial(fsize: usize, sigma: f64) -> BplResult<Kernel> {
    if fsize % 2 == 0 {
        return Err(BplError::render("gaussian kernel size must be odd"));
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(BplError::render("gaussian sigma must be > 0"));
    }
    let half = (fsize / 2) as i64;
    let denom = 2.0 * sigma * sigma;
    let mut weights = Vec::with_capacity(fsize * fsize);
    for y in -half..=half {
        for x in -half..=half {
            let r2 = (x * x + y * y) as f64;
            weights.push((-r2 / denom).exp());
        }
    }
    let peak = weights.iter().copied().fold(0.0, f64::max);
    for w in &mut weights {
        if *w < f64::EPSILON * peak {
            *w = 0.0;
        }
    }
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 {
        return Err(BplError::render("gaussian kernel sum is zero"));
    }
    for w in &mut weights {
        *w /= sum;
    }
    Kernel::new(fsize, fsize, weights)
}

/// Zero-padded convolution returning a grid of the input's size.
pub fn imfilter(src: &Grid, kernel: &Kernel) -> Grid {
    let (rows, cols) = (src.rows() as i64, src.cols() as i64);
    let (kr, kc) = (kernel.rows as i64, kernel.cols as i64);
    let (hr, hc) = (kr / 2, kc / 2);
    let input = src.as_slice();

    let mut out = Grid::zeros(src.size());
    out.as_mut_slice()
        .par_chunks_mut(cols as usize)
        .enumerate()
        .for_each(|(r, row_out)| {
            let r = r as i64;
            for (c, px) in row_out.iter_mut().enumerate() {
                let c = c as i64;
                let mut acc = 0.0;
                for i in 0..kr {
                    let sr = r + hr - i;
                    if sr < 0 || sr >= rows {
                        continue;
                    }
                    for j in 0..kc {
                        let sc = c + hc - j;
                        if sc < 0 || sc >= cols {
                            continue;
                        }
                        acc += kernel.weights[(i * kc + j) as usize]
                            * input[(sr * cols + sc) as usize];
                    }
                }
                *px = acc;
            }
        });
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/filter.rs"]
mod tests;
