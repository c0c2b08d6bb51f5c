/// Truncated eval-spot distribution.
pub mod eval_spot;
/// Per-character relation instances.
pub mod token;
/// Type-level relations.
pub mod types;
