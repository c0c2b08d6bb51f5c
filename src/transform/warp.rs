//! Global affine warp of a character, anchored at its center of mass.

use crate::foundation::core::{Affine, Motor, Point, Vec2};
use crate::foundation::error::{BplError, BplResult};

/// Axis-aligned scale followed by a translation: `p' = scale * p + translate`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AffineWarp {
    /// Per-axis scale.
    pub scale: Vec2,
    /// Translation applied after scaling.
    pub translate: Vec2,
}

impl AffineWarp {
    /// Checked constructor; all components must be finite.
    pub fn new(scale: Vec2, translate: Vec2) -> BplResult<Self> {
        if !(scale.is_finite() && translate.is_finite()) {
            return Err(BplError::validation("affine warp parameters must be finite"));
        }
        Ok(Self { scale, translate })
    }

    /// From the packed form `[sx, sy, tx, ty]`.
    pub fn from_array(a: [f64; 4]) -> BplResult<Self> {
        Self::new(Vec2::new(a[0], a[1]), Vec2::new(a[2], a[3]))
    }

    /// Packed form `[sx, sy, tx, ty]`.
    pub fn to_array(self) -> [f64; 4] {
        [self.scale.x, self.scale.y, self.translate.x, self.translate.y]
    }

    /// No scaling, no translation.
    pub fn identity() -> Self {
        Self {
            scale: Vec2::new(1.0, 1.0),
            translate: Vec2::ZERO,
        }
    }

    /// The warp as a kurbo map, not anchored.
    pub fn to_affine(self) -> Affine {
        Affine::new([
            self.scale.x,
            0.0,
            0.0,
            self.scale.y,
            self.translate.x,
            self.translate.y,
        ])
    }

    /// The same warp re-anchored so that scaling happens about `com`.
    pub fn anchored_at(self, com: Point) -> Self {
        let c = com.to_vec2();
        Self {
            scale: self.scale,
            translate: Vec2::new(
                self.translate.x - (self.scale.x - 1.0) * c.x,
                self.translate.y - (self.scale.y - 1.0) * c.y,
            ),
        }
    }
}

/// Mean of every trajectory point across all strokes, or `None` when there are no points.
pub fn com_char(motors: &[Motor]) -> Option<Point> {
    let mut acc = Vec2::ZERO;
    let mut n = 0usize;
    for p in motors.iter().flatten().flatten() {
        acc += p.to_vec2();
        n += 1;
    }
    (n > 0).then(|| (acc / n as f64).to_point())
}

/// Apply `warp` to every point of one stroke's motor.
pub fn affine_warp(motor: &Motor, warp: AffineWarp) -> Motor {
    let affine = warp.to_affine();
    motor
        .iter()
        .map(|traj| traj.iter().map(|&p| affine * p).collect())
        .collect()
}

/// Warp all strokes with scaling anchored at the character's center of mass.
pub fn apply_warp(motors: &[Motor], warp: AffineWarp) -> Vec<Motor> {
    let Some(com) = com_char(motors) else {
        return motors.to_vec();
    };
    let anchored = warp.anchored_at(com);
    motors.iter().map(|m| affine_warp(m, anchored)).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/transform/warp.rs"]
mod tests;
