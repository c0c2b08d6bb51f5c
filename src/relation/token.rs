use std::sync::Arc;

use rand::Rng;

use crate::foundation::core::{BoundedParameter, Point};
use crate::foundation::error::{BplError, BplResult};
use crate::relation::types::{Relation, RelationCategory, RelationKind};
use crate::token::stroke::StrokeToken;

/// One character sample's instantiation of a [`Relation`].
///
/// Only `mid` tokens carry state of their own: the sampled eval spot along the referenced
/// sub-stroke. The prior strokes are passed in at call time, so the token holds no reference
/// to them.
#[derive(Clone, Debug)]
pub struct RelationToken {
    relation: Arc<Relation>,
    eval_spot: Option<f64>,
}

impl RelationToken {
    /// Pair a relation with its token state. `mid` requires an eval spot; others forbid one.
    pub fn new(relation: Arc<Relation>, eval_spot: Option<f64>) -> BplResult<Self> {
        match (relation.category(), eval_spot) {
            (RelationCategory::Mid, None) => {
                return Err(BplError::validation("mid relation token needs an eval spot"));
            }
            (RelationCategory::Mid, Some(v)) if !v.is_finite() => {
                return Err(BplError::validation("eval spot must be finite"));
            }
            (RelationCategory::Mid, Some(_)) | (_, None) => {}
            (category, Some(_)) => {
                return Err(BplError::validation(format!(
                    "'{category}' relation token does not take an eval spot"
                )));
            }
        }
        Ok(Self {
            relation,
            eval_spot,
        })
    }

    /// Shared type-level relation.
    pub fn relation(&self) -> &Arc<Relation> {
        &self.relation
    }

    /// Category of the underlying relation.
    pub fn category(&self) -> RelationCategory {
        self.relation.category()
    }

    /// Sampled attachment coordinate; `Some` exactly for `mid`.
    pub fn eval_spot(&self) -> Option<f64> {
        self.eval_spot
    }

    /// Overwrite the sampled eval spot of a `mid` token.
    pub fn set_eval_spot(&mut self, v: f64) -> BplResult<()> {
        if self.category() != RelationCategory::Mid {
            return Err(BplError::validation(format!(
                "'{}' relation token has no eval spot",
                self.category()
            )));
        }
        if !v.is_finite() {
            return Err(BplError::validation("eval spot must be finite"));
        }
        self.eval_spot = Some(v);
        Ok(())
    }

    /// Log-probability of this token under its relation.
    pub fn score(&self) -> BplResult<f64> {
        self.relation.score_token(self)
    }

    /// `mid` tokens expose their eval spot with the spline bounds; other categories expose nothing.
    pub fn optimizable_parameters(&self) -> Vec<BoundedParameter> {
        match (self.relation.kind(), self.eval_spot) {
            (RelationKind::AttachAlong { eval_spot_dist, .. }, Some(v)) => {
                let (lb, ub) = eval_spot_dist.bounds();
                vec![BoundedParameter::scalar("eval_spot_token", v, lb, ub)]
            }
            _ => Vec::new(),
        }
    }

    /// Mean location of the next stroke's start, given the strokes drawn so far.
    pub fn get_attach_point(&self, prev_strokes: &[StrokeToken]) -> BplResult<Point> {
        self.relation.attach_point_at(self.eval_spot, prev_strokes)
    }

    /// Attach point plus a draw from the relation's location noise.
    pub fn sample_location<R: Rng + ?Sized>(
        &self,
        prev_strokes: &[StrokeToken],
        rng: &mut R,
    ) -> BplResult<Point> {
        let base = self.get_attach_point(prev_strokes)?;
        Ok(base + self.relation.loc_dist().sample(rng))
    }

    /// Log-density of `loc` under the location noise around the attach point.
    pub fn score_location(&self, loc: Point, prev_strokes: &[StrokeToken]) -> BplResult<f64> {
        let base = self.get_attach_point(prev_strokes)?;
        Ok(self.relation.loc_dist().log_prob(loc - base))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/relation/token.rs"]
mod tests;
