use crate::foundation::core::{Motor, Trajectory};
use crate::foundation::error::BplResult;
use crate::foundation::params::RenderParams;
use crate::render::image::{ProbabilityMap, render_image};
use crate::token::stroke::StrokeToken;
use crate::transform::warp::{AffineWarp, apply_warp};

/// Warp (optionally) and render a character's strokes.
#[tracing::instrument(skip(strokes, params), fields(nstrokes = strokes.len()))]
pub fn apply_render(
    strokes: &[StrokeToken],
    warp: Option<AffineWarp>,
    epsilon: f64,
    blur_sigma: f64,
    params: &RenderParams,
) -> BplResult<ProbabilityMap> {
    let motors: Vec<Motor> = strokes.iter().map(|s| s.motor().clone()).collect();
    let motors = match warp {
        Some(w) => apply_warp(&motors, w),
        None => motors,
    };
    let cell_traj: Vec<Trajectory> = motors.into_iter().flatten().collect();
    render_image(&cell_traj, epsilon, blur_sigma, params)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
