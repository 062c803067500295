//! Interleaved vertex-buffer packing.
//!
//! A [`BufferDescriptor`] fixes the per-vertex layout (named attribute slots
//! at byte offsets within a stride). [`PackedBufferBuilder`] appends vertices
//! that must match it tuple by tuple, into chunked storage that never copies
//! already-written floats while growing.

mod descriptor;
mod dynamic_array;
mod error;
mod writer;

pub use descriptor::{
    AttributeSlot, BufferDescriptor, BufferDescriptorBuilder, ScalarKind, COLOR_ATTRIBUTE,
    POSITION_ATTRIBUTE,
};
pub use dynamic_array::{DynamicF32Array, DEFAULT_CHUNK_SIZE};
pub use error::LayoutError;
pub use writer::{PackedBuffer, PackedBufferBuilder, VertexWriter};
