//! Mappers: pipeline sinks that turn a point snapshot into device state.
//!
//! A mapper is an [`Algorithm`](crate::pipeline::Algorithm) with one input and
//! no outputs. Executing it only captures the latest snapshot; the work
//! happens in `render`, which rebuilds the packed vertex buffer when the
//! snapshot, the mapper's parameters or its color mapping changed, then
//! recompiles its program when the [`ShaderKey`](crate::render::ShaderKey)
//! changed.
//!
//! | Mapper | Vertices per point | Slots |
//! |---|---|---|
//! | [`PolyDataMapper`] | 1 | `vertexMC` |
//! | [`SphereMapper`] | 3 | `vertexMC`, `offsetMC` |
//! | [`StickMapper`] | 12 | `vertexMC`, `orientMC`, `offsetMC`, `radiusMC` |
//!
//! Every layout gets a trailing `scalarColor` slot when scalars are colored.

mod common;
mod poly_data;
mod sphere;
mod stick;

pub use poly_data::PolyDataMapper;
pub use sphere::{SphereMapper, DEFAULT_SPHERE_RADIUS};
pub use stick::{StickMapper, DEFAULT_STICK_LENGTH, DEFAULT_STICK_RADIUS};
