/// Affine warps about a character's center of mass.
pub mod warp;
