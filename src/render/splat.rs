//! Ink budgeting and bilinear splatting of trajectory points onto the pixel grid.

use crate::foundation::core::Point;
use crate::foundation::error::{BplError, BplResult};
use crate::render::grid::Grid;

/// Per-point out-of-bounds flags against `limits = (rows, cols)`.
///
/// A point is out when its floor is negative or its ceiling exceeds the limit on either axis.
/// Non-finite points are always out.
pub fn check_bounds(points: &[Point], limits: (f64, f64)) -> Vec<bool> {
    points
        .iter()
        .map(|p| {
            if !p.is_finite() {
                return true;
            }
            let x_out = p.x.floor() < 0.0 || p.x.ceil() > limits.0;
            let y_out = p.y.floor() < 0.0 || p.y.ceil() > limits.1;
            x_out || y_out
        })
        .collect()
}

/// Euclidean distance between each point and the next (`len - 1` values).
pub fn pair_dist(points: &[Point]) -> Vec<f64> {
    points.windows(2).map(|w| (w[1] - w[0]).hypot()).collect()
}

/// Ink assigned to each in-bounds point of one stroke.
///
/// Each point gets ink proportional to the (clipped) length of the segment that reaches it; the
/// first point reuses the first segment. Short strokes are scaled up so every stroke carries at
/// least `ink` in total.
pub fn stroke_ink(points: &[Point], ink: f64, max_dist: f64) -> Vec<f64> {
    if points.is_empty() {
        return Vec::new();
    }
    let mut myink = if points.len() == 1 {
        vec![ink]
    } else {
        let dist: Vec<f64> = pair_dist(points)
            .into_iter()
            .map(|d| d.min(max_dist))
            .collect();
        std::iter::once(dist[0])
            .chain(dist)
            .map(|d| (ink / max_dist) * d)
            .collect()
    };

    let sumink: f64 = myink.iter().sum();
    if sumink.abs() < 1e-6 {
        let n = myink.len() as f64;
        myink.iter_mut().for_each(|v| *v = ink / n);
    } else if sumink < ink {
        myink.iter_mut().for_each(|v| *v *= ink / sumink);
    }
    debug_assert!(myink.iter().sum::<f64>() > ink - 1e-4);
    myink
}

/// Add `inkval[k]` at pixel `(lind_x[k], lind_y[k])`, summing repeated targets.
///
/// Targets outside the grid are dropped. Contributions are grouped by pixel and summed in a
/// canonical order, so the result does not depend on the order of the inputs.
pub fn seqadd(grid: &mut Grid, lind_x: &[f64], lind_y: &[f64], inkval: &[f64]) -> BplResult<()> {
    if lind_x.len() != lind_y.len() || lind_x.len() != inkval.len() {
        return Err(BplError::validation(format!(
            "seqadd length mismatch: {} x, {} y, {} ink",
            lind_x.len(),
            lind_y.len(),
            inkval.len()
        )));
    }
    let limits = ((grid.rows() - 1) as f64, (grid.cols() - 1) as f64);
    let size = grid.size();

    let mut contributions: Vec<(usize, f64)> = lind_x
        .iter()
        .zip(lind_y)
        .zip(inkval)
        .filter(|((x, y), _)| !check_bounds(&[Point::new(**x, **y)], limits)[0])
        .map(|((x, y), v)| (size.linear_index(*x as usize, *y as usize), *v))
        .collect();
    if contributions.is_empty() {
        return Ok(());
    }
    contributions.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let data = grid.as_mut_slice();
    let mut group = contributions[0].0;
    let mut acc = 0.0;
    for (idx, v) in contributions {
        if idx != group {
            data[group] += acc;
            group = idx;
            acc = 0.0;
        }
        acc += v;
    }
    data[group] += acc;
    Ok(())
}

/// Share each point's ink among its four enclosing pixels by bilinear weights.
pub fn splat_bilinear(grid: &mut Grid, points: &[Point], ink: &[f64]) -> BplResult<()> {
    if points.len() != ink.len() {
        return Err(BplError::validation("one ink value is needed per point"));
    }
    let n = points.len();
    let mut xs = Vec::with_capacity(4 * n);
    let mut ys = Vec::with_capacity(4 * n);
    let mut vals = Vec::with_capacity(4 * n);
    for (p, &v) in points.iter().zip(ink) {
        let (xf, yf, xc, yc) = (p.x.floor(), p.y.floor(), p.x.ceil(), p.y.ceil());
        let (x_c, y_c) = (p.x - xf, p.y - yf);
        let (x_f, y_f) = (1.0 - x_c, 1.0 - y_c);
        for (x, y, w) in [
            (xf, yf, x_f * y_f),
            (xc, yf, x_c * y_f),
            (xf, yc, x_f * y_c),
            (xc, yc, x_c * y_c),
        ] {
            xs.push(x);
            ys.push(y);
            vals.push(v * w);
        }
    }
    seqadd(grid, &xs, &ys, &vals)
}

#[cfg(test)]
#[path = "../../tests/unit/render/splat.rs"]
mod tests;
