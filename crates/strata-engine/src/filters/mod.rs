//! Sources and filters.
//!
//! Concrete parametric generators (spheres, planes, lines) live outside the
//! engine; [`PointCloudSource`] feeds caller-owned points into a pipeline.

mod calculator;
mod point_cloud;
mod warp_scalar;

pub use calculator::PointCalculator;
pub use point_cloud::PointCloudSource;
pub use warp_scalar::WarpScalar;
