use crate::foundation::core::{Motor, Point};
use crate::foundation::error::BplResult;
use crate::motor::vanilla::{StrokeMotor, vanilla_to_motor};
use crate::spline::bspline::Spline;

/// One sampled stroke: its sub-stroke shapes and scales, where it starts, and the derived
/// trajectories.
///
/// The motor fields are always consistent with the parameters; every setter recomputes them.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeToken {
    shapes: Vec<Spline>,
    invscales: Vec<f64>,
    position: Point,
    neval: usize,
    motor: Motor,
    motor_spline: Vec<Spline>,
}

impl StrokeToken {
    /// Build the token and compute its motor.
    pub fn new(
        shapes: Vec<Spline>,
        invscales: Vec<f64>,
        position: Point,
        neval: usize,
    ) -> BplResult<Self> {
        let StrokeMotor {
            motor,
            motor_spline,
        } = vanilla_to_motor(&shapes, &invscales, position, neval)?;
        Ok(Self {
            shapes,
            invscales,
            position,
            neval,
            motor,
            motor_spline,
        })
    }

    /// Normalized sub-stroke shapes.
    pub fn shapes(&self) -> &[Spline] {
        &self.shapes
    }

    /// Per-sub-stroke inverse scales.
    pub fn invscales(&self) -> &[f64] {
        &self.invscales
    }

    /// Starting position of the first sub-stroke.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Points per sub-stroke trajectory.
    pub fn neval(&self) -> usize {
        self.neval
    }

    /// Number of sub-strokes.
    pub fn nsub(&self) -> usize {
        self.shapes.len()
    }

    /// Trajectory of each sub-stroke.
    pub fn motor(&self) -> &Motor {
        &self.motor
    }

    /// Each sub-stroke as a spline in motor space.
    pub fn motor_spline(&self) -> &[Spline] {
        &self.motor_spline
    }

    /// Move the stroke; the token is unchanged on error.
    pub fn set_position(&mut self, position: Point) -> BplResult<()> {
        self.rebuild(self.shapes.clone(), self.invscales.clone(), position)
    }

    /// Replace the scales; the token is unchanged on error.
    pub fn set_invscales(&mut self, invscales: Vec<f64>) -> BplResult<()> {
        self.rebuild(self.shapes.clone(), invscales, self.position)
    }

    /// Replace the shapes; the token is unchanged on error.
    pub fn set_shapes(&mut self, shapes: Vec<Spline>) -> BplResult<()> {
        self.rebuild(shapes, self.invscales.clone(), self.position)
    }

    fn rebuild(&mut self, shapes: Vec<Spline>, invscales: Vec<f64>, position: Point) -> BplResult<()> {
        *self = Self::new(shapes, invscales, position, self.neval)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/token/stroke.rs"]
mod tests;
