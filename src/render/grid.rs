use crate::foundation::core::ImageSize;
use crate::foundation::error::{BplError, BplResult};

/// Dense row-major grid of `f64` pixel values.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    size: ImageSize,
    data: Vec<f64>,
}

impl Grid {
    /// All-zero grid.
    pub fn zeros(size: ImageSize) -> Self {
        Self {
            size,
            data: vec![0.0; size.pixel_count()],
        }
    }

    /// Wrap row-major `data`; its length must equal `size.pixel_count()`.
    pub fn from_vec(size: ImageSize, data: Vec<f64>) -> BplResult<Self> {
        if data.len() != size.pixel_count() {
            return Err(BplError::validation(format!(
                "grid data has {} values, expected {}",
                data.len(),
                size.pixel_count()
            )));
        }
        Ok(Self { size, data })
    }

    /// Grid dimensions.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Row count.
    pub fn rows(&self) -> usize {
        self.size.rows() as usize
    }

    /// Column count.
    pub fn cols(&self) -> usize {
        self.size.cols() as usize
    }

    /// Value at `(row, col)`. Panics when out of range.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[self.size.linear_index(row, col)]
    }

    /// Row-major values.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Sum of all values.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Largest value, or `-inf` for no values.
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub(crate) fn map_in_place(&mut self, f: impl Fn(f64) -> f64) {
        for v in &mut self.data {
            *v = f(*v);
        }
    }
}
