//! Uniform cubic B-spline evaluation.
//!
//! Splines are parameterized by `s` over `[2, ncpt + 1]`. Basis rows are renormalized to sum to
//! one, so the curve stays inside the convex hull of its control points even near the ends
//! where some basis functions fall off the knot range.

use crate::foundation::core::{Point, Trajectory, Vec2};
use crate::foundation::error::{BplError, BplResult};
use crate::foundation::math::linspace;

/// Lower end of the valid parametric range for every control-point count.
pub const SPLINE_LOWER_BOUND: f64 = 2.0;

/// Valid parametric range `[lb, ub]` for a spline with `ncpt` control points.
pub fn bspline_bounds(ncpt: usize) -> BplResult<(f64, f64)> {
    if ncpt < 2 {
        return Err(BplError::validation(format!(
            "spline needs at least 2 control points, got {ncpt}"
        )));
    }
    Ok((SPLINE_LOWER_BOUND, (ncpt + 1) as f64))
}

/// `neval` evenly spaced parametric coordinates spanning the valid range, plus the range.
pub fn bspline_gen_s(ncpt: usize, neval: usize) -> BplResult<(Vec<f64>, f64, f64)> {
    let (lb, ub) = bspline_bounds(ncpt)?;
    if neval == 0 {
        return Err(BplError::validation("neval must be > 0"));
    }
    Ok((linspace(lb, ub, neval), lb, ub))
}

/// Cubic B-spline basis function anchored at knot `i`, evaluated at `s`.
fn basis(i: f64, s: f64) -> f64 {
    let t = s - i;
    if (0.0..1.0).contains(&t) {
        t.powi(3) / 6.0
    } else if (1.0..2.0).contains(&t) {
        let u = t - 1.0;
        (-3.0 * u.powi(3) + 3.0 * u.powi(2) + 3.0 * u + 1.0) / 6.0
    } else if (2.0..3.0).contains(&t) {
        let u = t - 2.0;
        (3.0 * u.powi(3) - 6.0 * u.powi(2) + 4.0) / 6.0
    } else if (3.0..4.0).contains(&t) {
        let u = t - 3.0;
        (1.0 - u).powi(3) / 6.0
    } else {
        0.0
    }
}

fn check_coordinate(s: f64, lb: f64, ub: f64) -> BplResult<()> {
    if !s.is_finite() || s < lb || s > ub {
        return Err(BplError::validation(format!(
            "spline coordinate {s} outside valid range [{lb}, {ub}]"
        )));
    }
    Ok(())
}

/// Evaluate the spline defined by `cpts` at each coordinate in `s`.
///
/// Returns the curve points and the row-normalized coefficient matrix (`s.len()` rows of
/// `cpts.len()` weights).
pub fn bspline_eval(s: &[f64], cpts: &[Point]) -> BplResult<(Vec<Point>, Vec<Vec<f64>>)> {
    let (lb, ub) = bspline_bounds(cpts.len())?;
    let mut points = Vec::with_capacity(s.len());
    let mut coefs = Vec::with_capacity(s.len());
    for &sv in s {
        check_coordinate(sv, lb, ub)?;
        let mut row: Vec<f64> = (0..cpts.len()).map(|i| basis(i as f64, sv)).collect();
        let total: f64 = row.iter().sum();
        if total <= 0.0 {
            return Err(BplError::validation(format!(
                "spline basis vanishes at coordinate {sv}"
            )));
        }
        let mut acc = Vec2::ZERO;
        for (w, p) in row.iter_mut().zip(cpts) {
            *w /= total;
            acc += p.to_vec2() * *w;
        }
        points.push(acc.to_point());
        coefs.push(row);
    }
    Ok((points, coefs))
}

/// Evaluate a single coordinate.
pub fn bspline_eval_point(s: f64, cpts: &[Point]) -> BplResult<Point> {
    let (points, _) = bspline_eval(&[s], cpts)?;
    points
        .into_iter()
        .next()
        .ok_or_else(|| BplError::validation("spline evaluation produced no point"))
}

/// Evaluate the same coordinates against a stack of control-point sets, one per sub-stroke.
pub fn bspline_eval_stack(s: &[f64], stack: &[Spline]) -> BplResult<Vec<Vec<Point>>> {
    stack
        .iter()
        .map(|spline| bspline_eval(s, spline.control_points()).map(|(points, _)| points))
        .collect()
}

/// Trajectory of `neval` points sampled uniformly over the spline's parametric range.
pub fn get_stk_from_bspline(cpts: &[Point], neval: usize) -> BplResult<Trajectory> {
    let (s, _, _) = bspline_gen_s(cpts.len(), neval)?;
    let (points, _) = bspline_eval(&s, cpts)?;
    Ok(points)
}

/// Immutable set of control points for one sub-stroke.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Spline {
    cpts: Vec<Point>,
}

impl Spline {
    /// Spline from finite control points; the count must give a valid range.
    pub fn new(cpts: Vec<Point>) -> BplResult<Self> {
        bspline_bounds(cpts.len())?;
        if cpts.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(BplError::validation("spline control points must be finite"));
        }
        Ok(Self { cpts })
    }

    /// Control points in order.
    pub fn control_points(&self) -> &[Point] {
        &self.cpts
    }

    /// Number of control points.
    pub fn ncpt(&self) -> usize {
        self.cpts.len()
    }

    /// Valid parametric range `(lb, ub)`.
    pub fn bounds(&self) -> (f64, f64) {
        (SPLINE_LOWER_BOUND, (self.cpts.len() + 1) as f64)
    }

    /// Evaluate at every coordinate in `s`.
    pub fn eval(&self, s: &[f64]) -> BplResult<Vec<Point>> {
        bspline_eval(s, &self.cpts).map(|(points, _)| points)
    }

    /// Evaluate at one coordinate.
    pub fn eval_at(&self, s: f64) -> BplResult<Point> {
        bspline_eval_point(s, &self.cpts)
    }

    /// `neval` evenly spaced points across the valid range.
    pub fn trajectory(&self, neval: usize) -> BplResult<Trajectory> {
        get_stk_from_bspline(&self.cpts, neval)
    }

    /// Control points multiplied by `factor` about the origin.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            cpts: self.cpts.iter().map(|p| (p.to_vec2() * factor).to_point()).collect(),
        }
    }

    /// Control points shifted by `-offset`.
    pub fn shifted_back(&self, offset: Vec2) -> Self {
        Self {
            cpts: self.cpts.iter().map(|&p| p - offset).collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spline/bspline.rs"]
mod tests;
