use rand::Rng;

use crate::foundation::core::{BoundedParameter, Point};
use crate::foundation::error::{BplError, BplResult};
use crate::foundation::params::{NoiseBounds, RenderParams};
use crate::relation::token::RelationToken;
use crate::render::image::ProbabilityMap;
use crate::render::pipeline::apply_render;
use crate::spline::bspline::Spline;
use crate::token::stroke::StrokeToken;
use crate::transform::warp::AffineWarp;

/// One sampled character: strokes in drawing order, the relation token that placed each one,
/// an optional global warp, and the pixel noise parameters.
#[derive(Clone, Debug)]
pub struct CharacterToken {
    strokes: Vec<StrokeToken>,
    relations: Vec<RelationToken>,
    warp: Option<AffineWarp>,
    epsilon: f64,
    blur_sigma: f64,
}

fn check_noise(epsilon: f64, blur_sigma: f64) -> BplResult<()> {
    if !(0.0..=1.0).contains(&epsilon) {
        return Err(BplError::validation(format!("epsilon {epsilon} outside [0, 1]")));
    }
    if !blur_sigma.is_finite() || blur_sigma < 0.0 {
        return Err(BplError::validation("blur_sigma must be finite and >= 0"));
    }
    Ok(())
}

impl CharacterToken {
    /// Empty character with the given noise parameters and optional warp.
    pub fn new(epsilon: f64, blur_sigma: f64, warp: Option<AffineWarp>) -> BplResult<Self> {
        check_noise(epsilon, blur_sigma)?;
        Ok(Self {
            strokes: Vec::new(),
            relations: Vec::new(),
            warp,
            epsilon,
            blur_sigma,
        })
    }

    /// Strokes in drawing order.
    pub fn strokes(&self) -> &[StrokeToken] {
        &self.strokes
    }

    /// Relation token of each stroke, same order as [`Self::strokes`].
    pub fn relations(&self) -> &[RelationToken] {
        &self.relations
    }

    /// Global warp, if any.
    pub fn warp(&self) -> Option<AffineWarp> {
        self.warp
    }

    /// Pixel-noise weight.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Blur width passed to the renderer.
    pub fn blur_sigma(&self) -> f64 {
        self.blur_sigma
    }

    /// Replace both noise parameters, validated like [`Self::new`].
    pub fn set_noise(&mut self, epsilon: f64, blur_sigma: f64) -> BplResult<()> {
        check_noise(epsilon, blur_sigma)?;
        self.epsilon = epsilon;
        self.blur_sigma = blur_sigma;
        Ok(())
    }

    /// Replace or clear the global warp.
    pub fn set_warp(&mut self, warp: Option<AffineWarp>) {
        self.warp = warp;
    }

    /// Append a stroke whose start location is sampled from `relation` given the strokes
    /// already in the character.
    pub fn push_stroke<R: Rng + ?Sized>(
        &mut self,
        relation: RelationToken,
        shapes: Vec<Spline>,
        invscales: Vec<f64>,
        neval: usize,
        rng: &mut R,
    ) -> BplResult<&StrokeToken> {
        self.check_attach(&relation)?;
        let position = relation.sample_location(&self.strokes, rng)?;
        self.push_stroke_at(relation, shapes, invscales, position, neval)
    }

    /// Append a stroke at a known start location.
    pub fn push_stroke_at(
        &mut self,
        relation: RelationToken,
        shapes: Vec<Spline>,
        invscales: Vec<f64>,
        position: Point,
        neval: usize,
    ) -> BplResult<&StrokeToken> {
        self.check_attach(&relation)?;
        let stroke = StrokeToken::new(shapes, invscales, position, neval)?;
        self.strokes.push(stroke);
        self.relations.push(relation);
        Ok(&self.strokes[self.strokes.len() - 1])
    }

    fn check_attach(&self, relation: &RelationToken) -> BplResult<()> {
        match relation.relation().attach_ix() {
            Some(ix) if ix >= self.strokes.len() => Err(BplError::validation(format!(
                "stroke {} cannot attach to stroke {ix}; only earlier strokes are allowed",
                self.strokes.len()
            ))),
            _ => Ok(()),
        }
    }

    /// Sum of relation token log-probabilities.
    pub fn score_relations(&self) -> BplResult<f64> {
        self.relations.iter().map(|r| r.score()).sum()
    }

    /// Sum over strokes of the log-density of each start location given the earlier strokes.
    pub fn score_locations(&self) -> BplResult<f64> {
        self.relations
            .iter()
            .zip(&self.strokes)
            .enumerate()
            .map(|(i, (rel, stroke))| rel.score_location(stroke.position(), &self.strokes[..i]))
            .sum()
    }

    /// Render all strokes, with the warp if one is set.
    #[tracing::instrument(skip(self, params), fields(nstrokes = self.strokes.len()))]
    pub fn render(&self, params: &RenderParams) -> BplResult<ProbabilityMap> {
        apply_render(
            &self.strokes,
            self.warp,
            self.epsilon,
            self.blur_sigma,
            params,
        )
    }

    /// Draw a binary image from the rendered probability map.
    pub fn sample_image<R: Rng + ?Sized>(
        &self,
        params: &RenderParams,
        rng: &mut R,
    ) -> BplResult<Vec<bool>> {
        Ok(self.render(params)?.sample_binary(rng))
    }

    /// Log-likelihood of a binary image under this character.
    pub fn score_image(&self, image: &[bool], params: &RenderParams) -> BplResult<f64> {
        self.render(params)?.log_likelihood(image)
    }

    /// Noise parameters and relation-token parameters with their admissible bounds.
    pub fn optimizable_parameters(&self, noise: &NoiseBounds) -> Vec<BoundedParameter> {
        let mut params = vec![
            BoundedParameter::scalar(
                "epsilon",
                self.epsilon,
                noise.min_epsilon,
                noise.max_epsilon,
            ),
            BoundedParameter::scalar(
                "blur_sigma",
                self.blur_sigma,
                noise.min_blur_sigma,
                noise.max_blur_sigma,
            ),
        ];
        params.extend(self.relations.iter().flat_map(|r| r.optimizable_parameters()));
        params
    }
}

#[cfg(test)]
#[path = "../../tests/unit/token/character.rs"]
mod tests;
