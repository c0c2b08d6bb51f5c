/// Uniform cubic B-splines.
pub mod bspline;
