/// Geometry aliases and small validated value types.
pub mod core;
/// Error taxonomy.
pub mod error;
/// Shared numeric helpers.
pub mod math;
/// Serde parameter sets.
pub mod params;
