//! Everything between a point snapshot and a draw call.
//!
//! - [`packer`] lays points out as interleaved vertex buffers.
//! - [`shader`] composes GLSL programs from marker-laden templates.
//! - [`color`] turns scalar arrays into per-point RGBA.
//! - [`cache`] holds each mapper's device buffer and program and defines the
//!   [`RenderBackend`] seam the device layer implements.
//! - [`mappers`] ties the above together per point representation.

pub mod cache;
pub mod color;
mod error;
pub mod mappers;
pub mod packer;
pub mod scene;
pub mod shader;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{DeviceBuffer, DeviceResourceCache, DrawBatch, RenderBackend, Upload};
pub use color::{ColorMapping, ColorMode, LookupTable, MappedColors};
pub use error::RenderError;
pub use mappers::{PolyDataMapper, SphereMapper, StickMapper};
pub use scene::{ActorState, DrawMode, MapperUniforms, RenderState, Representation};
pub use shader::ShaderKey;
