use crate::foundation::core::{Motor, Point};
use crate::foundation::error::{BplError, BplResult};
use crate::spline::bspline::Spline;

/// Fine-motor trajectory of one stroke.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeMotor {
    /// One trajectory of `neval` points per sub-stroke.
    pub motor: Motor,
    /// Scaled, offset-corrected control points per sub-stroke (the motor in spline space).
    pub motor_spline: Vec<Spline>,
}

/// Turn normalized sub-stroke shapes into a continuous pen trajectory starting at `first_pos`.
///
/// Each sub-stroke is scaled by its inverse scale, sampled along the spline, then translated so
/// that it begins exactly where the previous sub-stroke ended.
#[tracing::instrument(skip(shapes, invscales), fields(nsub = shapes.len()))]
pub fn vanilla_to_motor(
    shapes: &[Spline],
    invscales: &[f64],
    first_pos: Point,
    neval: usize,
) -> BplResult<StrokeMotor> {
    let Some(first) = shapes.first() else {
        return Err(BplError::validation("stroke needs at least one sub-stroke"));
    };
    if shapes.iter().any(|s| s.ncpt() != first.ncpt()) {
        return Err(BplError::validation(
            "all sub-strokes must share the same control-point count",
        ));
    }
    if invscales.len() != shapes.len() {
        return Err(BplError::validation(format!(
            "expected {} inverse scales, got {}",
            shapes.len(),
            invscales.len()
        )));
    }
    if invscales.iter().any(|v| !v.is_finite()) {
        return Err(BplError::validation("inverse scales must be finite"));
    }
    if !first_pos.x.is_finite() || !first_pos.y.is_finite() {
        return Err(BplError::validation("first_pos must be finite"));
    }
    if neval == 0 {
        return Err(BplError::validation("neval must be > 0"));
    }

    let mut motor = Vec::with_capacity(shapes.len());
    let mut motor_spline = Vec::with_capacity(shapes.len());
    let mut previous_pos = first_pos;
    for (shape, &invscale) in shapes.iter().zip(invscales) {
        let scaled = shape.scaled(invscale);
        let traj = scaled.trajectory(neval)?;
        let offset = traj[0] - previous_pos;
        let traj: Vec<Point> = traj.into_iter().map(|p| p - offset).collect();
        if let Some(&last) = traj.last() {
            previous_pos = last;
        }
        motor.push(traj);
        motor_spline.push(scaled.shifted_back(offset));
    }

    Ok(StrokeMotor {
        motor,
        motor_spline,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/motor/vanilla.rs"]
mod tests;
