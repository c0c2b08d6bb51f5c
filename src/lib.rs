//! Stroke-program model of handwritten characters with a probabilistic ink renderer.
//!
//! A character is a sequence of strokes. Each stroke is a chain of cubic B-spline sub-strokes
//! placed relative to earlier strokes by a [`Relation`]. Rendering turns the resulting pen
//! trajectories into a per-pixel probability of ink.
//!
//! # Pipeline overview
//!
//! 1. **Relate**: a [`RelationToken`] picks the start location of a new stroke from the strokes
//!    drawn before it (independent, start, end, or along a sub-stroke).
//! 2. **Motor**: [`vanilla_to_motor`] turns normalized spline shapes and scales into a
//!    continuous trajectory beginning at that location.
//! 3. **Warp** (optional): [`apply_warp`] scales and shifts the whole character about its
//!    center of mass.
//! 4. **Render**: [`render_image`] splats ink, broadens and blurs it, and mixes in pixel noise,
//!    producing a [`ProbabilityMap`] with an off-page flag.
//!
//! Randomness is always passed in explicitly as a [`rand::Rng`]; nothing in the crate keeps
//! global state.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod motor;
mod relation;
mod render;
mod spline;
mod token;

/// Global character warps.
pub mod transform;

pub use foundation::core::{Affine, BoundedParameter, ImageSize, Motor, Point, Trajectory, Vec2};
pub use foundation::error::{BplError, BplResult};
pub use foundation::math::DiagonalGaussian;
pub use foundation::params::{LibraryParams, NoiseBounds, RelationParams, RenderParams};
pub use motor::vanilla::{StrokeMotor, vanilla_to_motor};
pub use relation::eval_spot::{EvalSpotDistribution, MAX_EVAL_SPOT_DRAWS};
pub use relation::token::RelationToken;
pub use relation::types::{Relation, RelationCategory, RelationKind, StrokeEnd};
pub use render::filter::{Kernel, broaden_kernel, fspecial, imfilter};
pub use render::grid::Grid;
pub use render::image::{
    ProbabilityMap, binary_from_gray, rasterize_ink, render_image, space_motor_to_img,
};
pub use render::pipeline::apply_render;
pub use render::splat::{check_bounds, pair_dist, seqadd, splat_bilinear, stroke_ink};
pub use spline::bspline::{
    SPLINE_LOWER_BOUND, Spline, bspline_bounds, bspline_eval, bspline_eval_point,
    bspline_eval_stack, bspline_gen_s, get_stk_from_bspline,
};
pub use token::character::CharacterToken;
pub use token::stroke::StrokeToken;
pub use transform::warp::{AffineWarp, affine_warp, apply_warp, com_char};
