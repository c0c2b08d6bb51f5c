use crate::foundation::error::{BplError, BplResult};

pub use kurbo::{Affine, Point, Vec2};

/// A sampled pen trajectory for one sub-stroke, in model space.
pub type Trajectory = Vec<Point>;

/// Per-stroke motor: one trajectory per sub-stroke, chained end to start.
pub type Motor = Vec<Trajectory>;

/// Image dimensions in pixels. `rows` indexes the first image-space axis.
///
/// Both dimensions are always non-zero; deserialization goes through [`ImageSize::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawImageSize")]
pub struct ImageSize {
    rows: u32,
    cols: u32,
}

#[derive(serde::Deserialize)]
struct RawImageSize {
    rows: u32,
    cols: u32,
}

impl TryFrom<RawImageSize> for ImageSize {
    type Error = BplError;

    fn try_from(raw: RawImageSize) -> BplResult<Self> {
        Self::new(raw.rows, raw.cols)
    }
}

impl ImageSize {
    /// Checked constructor; both dimensions must be non-zero.
    pub fn new(rows: u32, cols: u32) -> BplResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(BplError::validation("ImageSize dimensions must be > 0"));
        }
        Ok(Self { rows, cols })
    }

    /// Number of image rows (first image-space axis).
    pub fn rows(self) -> u32 {
        self.rows
    }

    /// Number of image columns.
    pub fn cols(self) -> u32 {
        self.cols
    }

    /// `rows * cols`.
    pub fn pixel_count(self) -> usize {
        (self.rows as usize) * (self.cols as usize)
    }

    /// Row-major linear index of `(row, col)`.
    pub fn linear_index(self, row: usize, col: usize) -> usize {
        row * (self.cols as usize) + col
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self {
            rows: 105,
            cols: 105,
        }
    }
}

/// A tunable parameter with elementwise box bounds, as handed to external optimizers.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BoundedParameter {
    /// Parameter name as reported to optimizers.
    pub name: &'static str,
    /// Current value, one entry per component.
    pub value: Vec<f64>,
    /// Inclusive lower bounds.
    pub lower: Vec<f64>,
    /// Inclusive upper bounds.
    pub upper: Vec<f64>,
}

impl BoundedParameter {
    /// One-component parameter.
    pub fn scalar(name: &'static str, value: f64, lower: f64, upper: f64) -> Self {
        Self {
            name,
            value: vec![value],
            lower: vec![lower],
            upper: vec![upper],
        }
    }

    /// True when every component sits inside its bounds (inclusive).
    pub fn within_bounds(&self) -> bool {
        self.value
            .iter()
            .zip(self.lower.iter().zip(&self.upper))
            .all(|(v, (lo, hi))| lo <= v && v <= hi)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
