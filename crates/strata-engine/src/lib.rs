//! Strata engine crate.
//!
//! A demand-driven visualization pipeline for point data. Sources and
//! filters produce [`data::PolyData`] snapshots; mappers at the end of the
//! pipeline pack them into interleaved vertex buffers and compose GLSL
//! programs for them, drawn through a headless wgpu [`device`].
//!
//! ```no_run
//! use strata_engine::device::{Gpu, GpuInit};
//! use strata_engine::filters::{PointCloudSource, WarpScalar};
//! use strata_engine::pipeline::{NodeHandle, Pipeline};
//! use strata_engine::render::{ActorState, MapperUniforms, RenderState, SphereMapper};
//!
//! # fn main() -> anyhow::Result<()> {
//! let gpu = Gpu::new_blocking(GpuInit::default())?;
//! let mut backend = gpu.backend();
//! let target = gpu.create_offscreen_target(256, 256)?;
//!
//! let mut pipeline = Pipeline::new();
//! let source = pipeline.add(PointCloudSource::with_points(vec![[0.0, 0.0, 0.5]]));
//! let warp = pipeline.add(WarpScalar::new());
//! pipeline.get_mut(warp).unwrap().set_xy_plane(true);
//! let mapper: NodeHandle<SphereMapper> = pipeline.add(SphereMapper::new());
//! let port = pipeline.output_port(source, 0)?;
//! pipeline.set_input_connection(warp, port)?;
//! let port = pipeline.output_port(warp, 0)?;
//! pipeline.set_input_connection(mapper, port)?;
//!
//! pipeline.update(mapper)?;
//! let sphere = pipeline.get_mut(mapper).unwrap();
//! backend.clear(&target, [0.0, 0.0, 0.0, 1.0]);
//! if let Some(batch) = sphere.render(&mut backend, &ActorState::default(), &RenderState::default())? {
//!     backend.draw(&target, &batch, &MapperUniforms::default());
//! }
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod device;
pub mod filters;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod time;
