use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rand::Rng;

use crate::foundation::core::{BoundedParameter, ImageSize, Point};
use crate::foundation::error::{BplError, BplResult};
use crate::foundation::math::DiagonalGaussian;
use crate::foundation::params::{LibraryParams, RelationParams};
use crate::relation::eval_spot::EvalSpotDistribution;
use crate::relation::token::RelationToken;
use crate::spline::bspline::{bspline_bounds, bspline_eval_point};
use crate::token::stroke::StrokeToken;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// The four attachment categories.
pub enum RelationCategory {
    /// Independent global position.
    Unihist,
    /// Start of a prior stroke.
    Start,
    /// End of a prior stroke.
    End,
    /// Somewhere along one sub-stroke of a prior stroke.
    Mid,
}

impl RelationCategory {
    /// Lowercase category name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unihist => "unihist",
            Self::Start => "start",
            Self::End => "end",
            Self::Mid => "mid",
        }
    }
}

impl fmt::Display for RelationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationCategory {
    type Err = BplError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unihist" => Ok(Self::Unihist),
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            "mid" => Ok(Self::Mid),
            other => Err(BplError::validation(format!(
                "unknown relation category '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Which end of a prior stroke an `Attach` relation anchors to.
pub enum StrokeEnd {
    /// First point of the first sub-stroke.
    Start,
    /// Last point of the last sub-stroke.
    End,
}

#[derive(Clone, Debug)]
/// Category-specific type-level state.
pub enum RelationKind {
    /// Fixed global position, unrelated to other strokes.
    Independent {
        /// Global start position in model space.
        gpos: Point,
        /// Image the position is bounded by.
        imsize: ImageSize,
    },
    /// Anchored to an endpoint of stroke `attach_ix`.
    Attach {
        /// Which endpoint.
        end: StrokeEnd,
        /// Index of the earlier stroke.
        attach_ix: usize,
    },
    /// Anchored along sub-stroke `attach_subix` of stroke `attach_ix`.
    AttachAlong {
        /// Index of the earlier stroke.
        attach_ix: usize,
        /// Sub-stroke of that stroke.
        attach_subix: usize,
        /// Nominal spline coordinate.
        eval_spot: f64,
        /// Token-level distribution around `eval_spot`.
        eval_spot_dist: EvalSpotDistribution,
    },
}

/// Type-level relation: where a new stroke starts relative to the strokes drawn before it.
#[derive(Clone, Debug)]
pub struct Relation {
    kind: RelationKind,
    loc_dist: DiagonalGaussian,
}

impl Relation {
    /// A `unihist` relation at global position `gpos` on an image of `imsize`.
    pub fn independent(gpos: Point, imsize: ImageSize, rel: &RelationParams) -> BplResult<Self> {
        if !gpos.x.is_finite() || !gpos.y.is_finite() {
            return Err(BplError::validation("gpos must be finite"));
        }
        Ok(Self {
            kind: RelationKind::Independent { gpos, imsize },
            loc_dist: DiagonalGaussian::new(rel.sigma_x, rel.sigma_y)?,
        })
    }

    /// `start` or `end` relation; any other category is rejected.
    pub fn attach(
        category: RelationCategory,
        attach_ix: usize,
        rel: &RelationParams,
    ) -> BplResult<Self> {
        let end = match category {
            RelationCategory::Start => StrokeEnd::Start,
            RelationCategory::End => StrokeEnd::End,
            other => {
                return Err(BplError::validation(format!(
                    "attach relations must be 'start' or 'end', got '{other}'"
                )));
            }
        };
        Ok(Self {
            kind: RelationKind::Attach { end, attach_ix },
            loc_dist: DiagonalGaussian::new(rel.sigma_x, rel.sigma_y)?,
        })
    }

    /// `mid` relation at type-level spline coordinate `eval_spot`.
    pub fn attach_along(
        attach_ix: usize,
        attach_subix: usize,
        eval_spot: f64,
        lib: &LibraryParams,
    ) -> BplResult<Self> {
        let (lb, ub) = bspline_bounds(lib.ncpt)?;
        if !(lb <= eval_spot && eval_spot <= ub) {
            return Err(BplError::validation(format!(
                "eval_spot {eval_spot} outside [{lb}, {ub}]"
            )));
        }
        Ok(Self {
            kind: RelationKind::AttachAlong {
                attach_ix,
                attach_subix,
                eval_spot,
                eval_spot_dist: EvalSpotDistribution::new(
                    eval_spot,
                    lib.rel.sigma_attach,
                    lib.ncpt,
                )?,
            },
            loc_dist: DiagonalGaussian::new(lib.rel.sigma_x, lib.rel.sigma_y)?,
        })
    }

    /// Variant and its category-specific state.
    pub fn kind(&self) -> &RelationKind {
        &self.kind
    }

    /// Category implied by the variant.
    pub fn category(&self) -> RelationCategory {
        match &self.kind {
            RelationKind::Independent { .. } => RelationCategory::Unihist,
            RelationKind::Attach {
                end: StrokeEnd::Start,
                ..
            } => RelationCategory::Start,
            RelationKind::Attach {
                end: StrokeEnd::End,
                ..
            } => RelationCategory::End,
            RelationKind::AttachAlong { .. } => RelationCategory::Mid,
        }
    }

    /// Index of the prior stroke this relation anchors to, if any.
    pub fn attach_ix(&self) -> Option<usize> {
        match &self.kind {
            RelationKind::Independent { .. } => None,
            RelationKind::Attach { attach_ix, .. } | RelationKind::AttachAlong { attach_ix, .. } => {
                Some(*attach_ix)
            }
        }
    }

    /// Noise distribution of the final location around the attach point.
    pub fn loc_dist(&self) -> &DiagonalGaussian {
        &self.loc_dist
    }

    /// Sample the token-level state: an eval spot for `mid`, nothing otherwise.
    pub fn sample_token<R: Rng + ?Sized>(self: &Arc<Self>, rng: &mut R) -> BplResult<RelationToken> {
        let eval_spot = match &self.kind {
            RelationKind::AttachAlong { eval_spot_dist, .. } => Some(eval_spot_dist.sample(rng)?),
            _ => None,
        };
        RelationToken::new(Arc::clone(self), eval_spot)
    }

    /// Log-probability of a token's own randomness (zero unless `mid`).
    pub fn score_token(&self, token: &RelationToken) -> BplResult<f64> {
        match (&self.kind, token.eval_spot()) {
            (RelationKind::AttachAlong { eval_spot_dist, .. }, Some(v)) => Ok(eval_spot_dist.score(v)),
            (RelationKind::AttachAlong { .. }, None) => Err(BplError::validation(
                "mid relation token is missing its eval spot",
            )),
            (_, Some(_)) => Err(BplError::validation(format!(
                "'{}' relation token must not carry an eval spot",
                self.category()
            ))),
            (_, None) => Ok(0.0),
        }
    }

    /// Type-level parameters with their optimizer bounds.
    pub fn optimizable_parameters(&self) -> Vec<BoundedParameter> {
        match &self.kind {
            RelationKind::Independent { gpos, imsize } => vec![BoundedParameter {
                name: "gpos",
                value: vec![gpos.x, gpos.y],
                lower: vec![0.0, -f64::from(imsize.rows())],
                upper: vec![f64::from(imsize.cols()), 0.0],
            }],
            RelationKind::Attach { .. } => Vec::new(),
            RelationKind::AttachAlong {
                eval_spot,
                eval_spot_dist,
                ..
            } => {
                let (lb, ub) = eval_spot_dist.bounds();
                vec![BoundedParameter::scalar("eval_spot", *eval_spot, lb, ub)]
            }
        }
    }

    /// Mean attach point using the type-level eval spot for `mid` relations.
    pub fn get_attach_point(&self, prev_strokes: &[StrokeToken]) -> BplResult<Point> {
        let eval_spot = match &self.kind {
            RelationKind::AttachAlong { eval_spot, .. } => Some(*eval_spot),
            _ => None,
        };
        self.attach_point_at(eval_spot, prev_strokes)
    }

    pub(crate) fn attach_point_at(
        &self,
        eval_spot: Option<f64>,
        prev_strokes: &[StrokeToken],
    ) -> BplResult<Point> {
        let prior = |ix: usize| {
            prev_strokes.get(ix).ok_or_else(|| {
                BplError::validation(format!(
                    "attach index {ix} does not reference one of the {} prior strokes",
                    prev_strokes.len()
                ))
            })
        };
        match &self.kind {
            RelationKind::Independent { gpos, .. } => Ok(*gpos),
            RelationKind::Attach { end, attach_ix } => {
                let motor = prior(*attach_ix)?.motor();
                let point = match end {
                    StrokeEnd::Start => motor.first().and_then(|t| t.first()),
                    StrokeEnd::End => motor.last().and_then(|t| t.last()),
                };
                point
                    .copied()
                    .ok_or_else(|| BplError::validation("prior stroke has an empty motor"))
            }
            RelationKind::AttachAlong {
                attach_ix,
                attach_subix,
                ..
            } => {
                let stroke = prior(*attach_ix)?;
                let spline = stroke.motor_spline().get(*attach_subix).ok_or_else(|| {
                    BplError::validation(format!(
                        "attach sub-stroke {attach_subix} out of range for a stroke with {} sub-strokes",
                        stroke.nsub()
                    ))
                })?;
                let s = eval_spot
                    .ok_or_else(|| BplError::validation("mid relation needs an eval spot"))?;
                bspline_eval_point(s, spline.control_points())
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/relation/types.rs"]
mod tests;
