//! Library-level constants consumed by the motor, relation, and rendering code.
//!
//! Parameters are plain serde data: they can be built in code, or loaded from a JSON file
//! where any missing field falls back to its default.

use std::path::Path;

use anyhow::Context;

use crate::foundation::core::ImageSize;
use crate::foundation::error::{BplError, BplResult};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Complete parameter set for sampling, scoring, and rendering.
pub struct LibraryParams {
    /// Number of spline control points per sub-stroke.
    pub ncpt: usize,
    /// Number of trajectory samples evaluated per sub-stroke.
    pub neval: usize,
    /// Relation noise parameters.
    pub rel: RelationParams,
    /// Rasterization constants.
    pub render: RenderParams,
    /// Admissible ranges for per-character noise parameters.
    pub noise: NoiseBounds,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Spatial noise for relation locations and attachment spots.
pub struct RelationParams {
    /// Variance of the x offset from the attach point.
    pub sigma_x: f64,
    /// Variance of the y offset from the attach point.
    pub sigma_y: f64,
    /// Standard deviation of the token-level eval spot around its type-level value.
    pub sigma_attach: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Constants of the ink rasterizer.
pub struct RenderParams {
    /// Output grid size.
    pub imsize: ImageSize,
    /// Ink deposited per trajectory point at full segment length.
    pub ink_pp: f64,
    /// Segment length at which per-point ink saturates.
    pub ink_max_dist: f64,
    /// Broadening kernel shape parameter.
    pub ink_a: f64,
    /// Broadening kernel gain.
    pub ink_b: f64,
    /// Number of broadening passes.
    pub ink_ncon: u32,
    /// Side length of the Gaussian blur kernel (odd).
    pub fsize: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Bounds for the pixel-noise mixture weight and blur width.
pub struct NoiseBounds {
    /// Smallest allowed pixel-noise weight.
    pub min_epsilon: f64,
    /// Largest allowed pixel-noise weight.
    pub max_epsilon: f64,
    /// Smallest allowed blur width.
    pub min_blur_sigma: f64,
    /// Largest allowed blur width.
    pub max_blur_sigma: f64,
}

impl Default for LibraryParams {
    fn default() -> Self {
        Self {
            ncpt: 5,
            neval: 200,
            rel: RelationParams::default(),
            render: RenderParams::default(),
            noise: NoiseBounds::default(),
        }
    }
}

impl Default for RelationParams {
    fn default() -> Self {
        Self {
            sigma_x: 2.0,
            sigma_y: 2.0,
            sigma_attach: 0.5,
        }
    }
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            imsize: ImageSize::default(),
            ink_pp: 2.0,
            ink_max_dist: 2.0,
            ink_a: 0.5,
            ink_b: 6.0,
            ink_ncon: 2,
            fsize: 11,
        }
    }
}

impl Default for NoiseBounds {
    fn default() -> Self {
        Self {
            min_epsilon: 1e-4,
            max_epsilon: 0.5,
            min_blur_sigma: 0.5,
            max_blur_sigma: 16.0,
        }
    }
}

impl LibraryParams {
    /// Parse parameters from JSON text and validate them.
    pub fn from_json_str(s: &str) -> BplResult<Self> {
        let params: Self = serde_json::from_str(s).map_err(|e| BplError::serde(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Read and parse a JSON parameter file.
    pub fn from_json_path(path: impl AsRef<Path>) -> BplResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read parameter file {}", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Pretty-printed JSON form.
    pub fn to_json_string(&self) -> BplResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| BplError::serde(e.to_string()))
    }

    /// Check every nested parameter set.
    pub fn validate(&self) -> BplResult<()> {
        if self.ncpt < 2 {
            return Err(BplError::validation("ncpt must be >= 2"));
        }
        if self.neval == 0 {
            return Err(BplError::validation("neval must be > 0"));
        }
        self.rel.validate()?;
        self.render.validate()?;
        self.noise.validate()
    }
}

impl RelationParams {
    /// Sigmas must be finite and positive.
    pub fn validate(&self) -> BplResult<()> {
        for (name, v) in [
            ("sigma_x", self.sigma_x),
            ("sigma_y", self.sigma_y),
            ("sigma_attach", self.sigma_attach),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(BplError::validation(format!(
                    "rel.{name} must be finite and > 0"
                )));
            }
        }
        Ok(())
    }
}

impl RenderParams {
    /// Check the render constants.
    pub fn validate(&self) -> BplResult<()> {
        if !self.ink_pp.is_finite() || self.ink_pp <= 0.0 {
            return Err(BplError::render("ink_pp must be finite and > 0"));
        }
        if !self.ink_max_dist.is_finite() || self.ink_max_dist <= 0.0 {
            return Err(BplError::render("ink_max_dist must be finite and > 0"));
        }
        if !self.ink_a.is_finite() || !self.ink_b.is_finite() {
            return Err(BplError::render("ink_a and ink_b must be finite"));
        }
        if self.fsize == 0 || self.fsize % 2 == 0 {
            return Err(BplError::render("fsize must be odd"));
        }
        Ok(())
    }
}

impl NoiseBounds {
    /// Ranges must be ordered and non-negative, with epsilon inside `[0, 1]`.
    pub fn validate(&self) -> BplResult<()> {
        if !(0.0 <= self.min_epsilon
            && self.min_epsilon <= self.max_epsilon
            && self.max_epsilon <= 1.0)
        {
            return Err(BplError::validation(
                "noise epsilon bounds must satisfy 0 <= min <= max <= 1",
            ));
        }
        if !(0.0 <= self.min_blur_sigma && self.min_blur_sigma <= self.max_blur_sigma) {
            return Err(BplError::validation(
                "noise blur_sigma bounds must satisfy 0 <= min <= max",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/params.rs"]
mod tests;
