use std::sync::Arc;

use super::{BufferDescriptor, DynamicF32Array, LayoutError, DEFAULT_CHUNK_SIZE};

/// A finished vertex buffer: contiguous floats plus the layout they follow.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedBuffer {
    descriptor: Arc<BufferDescriptor>,
    data: Arc<[f32]>,
    vertex_count: u32,
}

impl PackedBuffer {
    pub fn descriptor(&self) -> &Arc<BufferDescriptor> {
        &self.descriptor
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn byte_len(&self) -> u64 {
        (self.data.len() * std::mem::size_of::<f32>()) as u64
    }
}

/// Accumulates vertices that follow one [`BufferDescriptor`].
#[derive(Debug)]
pub struct PackedBufferBuilder {
    descriptor: Arc<BufferDescriptor>,
    data: DynamicF32Array,
    /// The vertex being written; committed on [`VertexWriter::finish`].
    scratch: Vec<f32>,
    vertex_count: u32,
}

impl PackedBufferBuilder {
    pub fn new(descriptor: impl Into<Arc<BufferDescriptor>>) -> Self {
        Self::with_chunk_size(descriptor, DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(descriptor: impl Into<Arc<BufferDescriptor>>, chunk_size: usize) -> Self {
        let descriptor = descriptor.into();
        let scratch = Vec::with_capacity(descriptor.point_size() as usize);
        Self {
            descriptor,
            data: DynamicF32Array::with_chunk_size(chunk_size),
            scratch,
            vertex_count: 0,
        }
    }

    pub fn descriptor(&self) -> &BufferDescriptor {
        &self.descriptor
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Starts a vertex. Nothing is appended unless the writer finishes.
    pub fn vertex(&mut self) -> VertexWriter<'_> {
        self.scratch.clear();
        VertexWriter { builder: self, slot: 0 }
    }

    /// Appends one vertex given as one tuple per slot, in slot order.
    pub fn push_vertex(&mut self, tuples: &[&[f32]]) -> Result<(), LayoutError> {
        let expected = self.descriptor.slots().len();
        if tuples.len() != expected {
            return Err(LayoutError::SlotCount { expected, found: tuples.len() });
        }
        let mut v = self.vertex();
        for tuple in tuples {
            v.put(tuple)?;
        }
        v.finish()
    }

    pub fn finish(self) -> PackedBuffer {
        PackedBuffer {
            descriptor: self.descriptor,
            data: self.data.freeze(),
            vertex_count: self.vertex_count,
        }
    }
}

/// Writes the tuples of one vertex in slot order.
///
/// Gaps between slots and trailing stride padding are zero-filled.
#[derive(Debug)]
pub struct VertexWriter<'a> {
    builder: &'a mut PackedBufferBuilder,
    slot: usize,
}

impl VertexWriter<'_> {
    pub fn put(&mut self, tuple: &[f32]) -> Result<&mut Self, LayoutError> {
        let b = &mut *self.builder;
        let slots = b.descriptor.slots();
        let Some(slot) = slots.get(self.slot) else {
            return Err(LayoutError::SlotCount { expected: slots.len(), found: self.slot + 1 });
        };
        if tuple.len() != slot.components as usize {
            return Err(LayoutError::Arity {
                name: slot.name.clone(),
                expected: slot.components,
                found: tuple.len(),
            });
        }
        b.scratch.resize((slot.offset / 4) as usize, 0.0);
        b.scratch.extend_from_slice(tuple);
        self.slot += 1;
        Ok(self)
    }

    /// Commits the vertex; every slot must have been written.
    pub fn finish(self) -> Result<(), LayoutError> {
        let b = self.builder;
        let expected = b.descriptor.slots().len();
        if self.slot != expected {
            return Err(LayoutError::SlotCount { expected, found: self.slot });
        }
        b.scratch.resize(b.descriptor.point_size() as usize, 0.0);
        b.data.extend_from_slice(&b.scratch);
        b.vertex_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> BufferDescriptor {
        BufferDescriptor::builder().attribute("vertexMC", 3).attribute("offsetMC", 2).build().unwrap()
    }

    #[test]
    fn vertices_interleave_in_slot_order() {
        let mut b = PackedBufferBuilder::new(layout());
        b.push_vertex(&[&[1.0, 2.0, 3.0], &[4.0, 5.0]]).unwrap();
        // never finished: discarded
        b.vertex().put(&[0.0, 0.0, 0.0]).unwrap().put(&[0.0, 0.0]).unwrap();
        let mut v = b.vertex();
        v.put(&[6.0, 7.0, 8.0]).unwrap().put(&[9.0, 10.0]).unwrap();
        v.finish().unwrap();

        let packed = b.finish();
        assert_eq!(packed.vertex_count(), 2);
        assert_eq!(packed.data(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        assert_eq!(packed.byte_len(), 40);
        assert_eq!(packed.as_bytes().len(), 40);
    }

    #[test]
    fn arity_and_slot_count_are_checked() {
        let mut b = PackedBufferBuilder::new(layout());
        assert_eq!(
            b.push_vertex(&[&[1.0, 2.0], &[4.0, 5.0]]),
            Err(LayoutError::Arity { name: "vertexMC".into(), expected: 3, found: 2 })
        );
        assert_eq!(
            b.push_vertex(&[&[1.0, 2.0, 3.0]]),
            Err(LayoutError::SlotCount { expected: 2, found: 1 })
        );
        let mut v = b.vertex();
        v.put(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(v.finish(), Err(LayoutError::SlotCount { expected: 2, found: 1 }));
        assert_eq!(b.finish().vertex_count(), 0);
    }

    #[test]
    fn padding_is_zero_filled() {
        let d = BufferDescriptor::builder()
            .attribute_at("a", 0, 0, 1)
            .attribute_at("b", 1, 8, 1)
            .stride(16)
            .build()
            .unwrap();
        let mut b = PackedBufferBuilder::new(d);
        b.push_vertex(&[&[1.0], &[2.0]]).unwrap();
        assert_eq!(b.finish().data(), &[1.0, 0.0, 2.0, 0.0]);
    }

    #[test]
    fn small_chunks_freeze_contiguously() {
        let mut b = PackedBufferBuilder::with_chunk_size(layout(), 3);
        for i in 0..4 {
            let f = i as f32;
            b.push_vertex(&[&[f, f, f], &[f, f]]).unwrap();
        }
        let packed = b.finish();
        assert_eq!(packed.data().len(), 20);
        assert_eq!(packed.data()[15..], [3.0; 5]);
    }
}
