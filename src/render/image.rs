//! Probability-of-ink rendering of stroke trajectories.
//!
//! 1. Map model-space points `(x, y)` to image space `(-y, x)`.
//! 2. Drop out-of-page points, flag the page, budget ink per stroke, splat bilinearly.
//! 3. Broaden with the brush kernel `ink_ncon` times, truncate at 1.
//! 4. Optionally Gaussian-blur twice, truncate to `[0, 1]`.
//! 5. Mix with uniform pixel noise: `(1 - eps) * p + eps * (1 - p)`.

use rand::Rng;
use rayon::prelude::*;

use crate::foundation::core::{ImageSize, Point, Trajectory};
use crate::foundation::error::{BplError, BplResult};
use crate::foundation::params::RenderParams;
use crate::render::filter::{broaden_kernel, fspecial, imfilter};
use crate::render::grid::Grid;
use crate::render::splat::{check_bounds, splat_bilinear, stroke_ink};

/// Rendered character: per-pixel probability of ink plus whether any ink left the page.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbabilityMap {
    grid: Grid,
    ink_off_page: bool,
}

impl ProbabilityMap {
    /// Wrap a grid of probabilities with its off-page flag.
    pub fn new(grid: Grid, ink_off_page: bool) -> Self {
        Self { grid, ink_off_page }
    }

    /// Per-pixel ink probabilities.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Image dimensions.
    pub fn size(&self) -> ImageSize {
        self.grid.size()
    }

    /// Ink probability at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.grid.get(row, col)
    }

    /// True when some ink fell outside the image.
    pub fn ink_off_page(&self) -> bool {
        self.ink_off_page
    }

    /// Bernoulli log-likelihood of a binary image (`true` = ink), row-major.
    ///
    /// Ink that fell off the page makes every image impossible.
    pub fn log_likelihood(&self, image: &[bool]) -> BplResult<f64> {
        if image.len() != self.grid.as_slice().len() {
            return Err(BplError::validation(format!(
                "binary image has {} pixels, expected {}",
                image.len(),
                self.grid.as_slice().len()
            )));
        }
        if self.ink_off_page {
            return Ok(f64::NEG_INFINITY);
        }
        Ok(self
            .grid
            .as_slice()
            .iter()
            .zip(image)
            .map(|(&p, &on)| if on { p.ln() } else { (1.0 - p).ln() })
            .sum())
    }

    /// Draw a binary image with each pixel on independently with its probability.
    pub fn sample_binary<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<bool> {
        self.grid
            .as_slice()
            .iter()
            .map(|&p| rng.random::<f64>() < p)
            .collect()
    }

    /// 8-bit grayscale rendering, ink dark on white.
    pub fn to_gray_image(&self) -> image::GrayImage {
        let size = self.size();
        image::GrayImage::from_fn(size.cols(), size.rows(), |x, y| {
            let p = self.grid.get(y as usize, x as usize).clamp(0.0, 1.0);
            image::Luma([((1.0 - p) * 255.0).round() as u8])
        })
    }
}

/// Binary ink mask from a grayscale image where pixels darker than `threshold` are ink.
pub fn binary_from_gray(img: &image::GrayImage, threshold: u8) -> Vec<bool> {
    let (w, h) = img.dimensions();
    let mut out = Vec::with_capacity((w as usize) * (h as usize));
    for y in 0..h {
        for x in 0..w {
            out.push(img.get_pixel(x, y).0[0] < threshold);
        }
    }
    out
}

/// Model space `(x, y)` to image space `(-y, x)`; image `x` indexes rows.
pub fn space_motor_to_img(traj: &[Point]) -> Trajectory {
    traj.iter().map(|p| Point::new(-p.y, p.x)).collect()
}

/// Image-space points of one stroke that survived bounds checking, with their ink.
struct StrokeInk {
    points: Vec<Point>,
    ink: Vec<f64>,
}

/// Every point of every trajectory must have finite coordinates.
fn ensure_finite(trajs: &[Trajectory]) -> BplResult<()> {
    for (i, traj) in trajs.iter().enumerate() {
        if let Some(j) = traj.iter().position(|p| !p.is_finite()) {
            return Err(BplError::validation(format!(
                "sub-stroke {i} point {j} is not finite: {:?}",
                traj[j]
            )));
        }
    }
    Ok(())
}

/// Splat image-space trajectories onto a fresh grid. Returns the raw ink and the off-page flag.
///
/// Non-finite points are rejected rather than splatted.
pub fn rasterize_ink(traj_img: &[Trajectory], params: &RenderParams) -> BplResult<(Grid, bool)> {
    ensure_finite(traj_img)?;
    let size = params.imsize;
    let limits = (f64::from(size.rows()), f64::from(size.cols()));

    let per_stroke: Vec<(bool, Option<StrokeInk>)> = traj_img
        .par_iter()
        .map(|myt| {
            let out = check_bounds(myt, limits);
            let any_out = out.iter().any(|&o| o);
            let points: Vec<Point> = myt
                .iter()
                .zip(&out)
                .filter(|(_, o)| !**o)
                .map(|(p, _)| *p)
                .collect();
            if points.is_empty() {
                return (any_out, None);
            }
            let ink = stroke_ink(&points, params.ink_pp, params.ink_max_dist);
            (any_out, Some(StrokeInk { points, ink }))
        })
        .collect();

    let mut grid = Grid::zeros(size);
    let mut ink_off_page = false;
    for (i, (any_out, stroke)) in per_stroke.into_iter().enumerate() {
        if any_out {
            ink_off_page = true;
        }
        match stroke {
            Some(StrokeInk { points, ink }) => splat_bilinear(&mut grid, &points, &ink)?,
            None => tracing::debug!(sub_stroke = i, "sub-stroke entirely off the page; skipped"),
        }
    }
    if ink_off_page {
        tracing::debug!("ink went off the page");
    }
    Ok((grid, ink_off_page))
}

/// Render a list of model-space sub-stroke trajectories into a probability map.
#[tracing::instrument(skip(cell_traj, params), fields(nsub = cell_traj.len()))]
pub fn render_image(
    cell_traj: &[Trajectory],
    epsilon: f64,
    blur_sigma: f64,
    params: &RenderParams,
) -> BplResult<ProbabilityMap> {
    params.validate()?;
    if !(0.0..=1.0).contains(&epsilon) {
        return Err(BplError::render(format!("epsilon {epsilon} outside [0, 1]")));
    }
    if !blur_sigma.is_finite() || blur_sigma < 0.0 {
        return Err(BplError::render(format!(
            "blur_sigma must be finite and >= 0, got {blur_sigma}"
        )));
    }
    ensure_finite(cell_traj)?;

    let traj_img: Vec<Trajectory> = cell_traj
        .iter()
        .map(|t| space_motor_to_img(t.as_slice()))
        .collect();
    let (mut pimg, ink_off_page) = rasterize_ink(&traj_img, params)?;

    let h_broaden = broaden_kernel(params.ink_a, params.ink_b);
    for _ in 0..params.ink_ncon {
        pimg = imfilter(&pimg, &h_broaden);
    }
    pimg.map_in_place(|v| v.min(1.0));

    if blur_sigma > 0.0 {
        let h_gaussian = fspecial(params.fsize, blur_sigma)?;
        pimg = imfilter(&pimg, &h_gaussian);
        pimg = imfilter(&pimg, &h_gaussian);
    }
    pimg.map_in_place(|v| v.clamp(0.0, 1.0));

    pimg.map_in_place(|p| (1.0 - epsilon) * p + epsilon * (1.0 - p));
    Ok(ProbabilityMap::new(pimg, ink_off_page))
}

#[cfg(test)]
#[path = "../../tests/unit/render/image.rs"]
mod tests;
