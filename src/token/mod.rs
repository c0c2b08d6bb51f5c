/// Character tokens: strokes plus relations.
pub mod character;
/// Stroke tokens.
pub mod stroke;
