//! Headless GPU device management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue without a window
//! - allocating offscreen color/depth targets
//! - implementing [`RenderBackend`](crate::render::RenderBackend) on top of
//!   wgpu so mappers can upload buffers and compile their GLSL programs

mod backend;
mod gpu;
mod init;
mod target;

pub use backend::{WgpuBackend, WgpuProgram};
pub use gpu::Gpu;
pub use init::GpuInit;
pub use target::OffscreenTarget;
