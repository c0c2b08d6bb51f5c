/// Spline shapes to continuous pen trajectories.
pub mod vanilla;
