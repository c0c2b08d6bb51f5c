/// Convolution kernels and zero-padded filtering.
pub mod filter;
/// Dense pixel grid.
pub mod grid;
/// Probability maps and the rendering entry point.
pub mod image;
/// Warp-then-render.
pub mod pipeline;
/// Ink budgeting and splatting.
pub mod splat;
