//! Per-mapper device state and the backend seam it talks through.

use std::sync::Arc;

use strata_glsl::ShaderSources;

use crate::time::TimeStamp;

use super::packer::{BufferDescriptor, PackedBuffer};
use super::scene::DrawMode;
use super::shader::ShaderKey;
use super::RenderError;

/// Smallest vertex buffer allocation, in bytes.
const MIN_BUFFER_SIZE: u64 = 256;

/// What a mapper needs from a graphics device.
pub trait RenderBackend {
    type Buffer;
    type Program;

    /// Allocates a vertex buffer of `size` bytes.
    fn create_vertex_buffer(&mut self, label: &str, size: u64) -> Result<Self::Buffer, RenderError>;

    /// Overwrites the start of `buffer` with `data`.
    fn write_vertex_buffer(&mut self, buffer: &Self::Buffer, data: &[u8]) -> Result<(), RenderError>;

    fn compile_program(
        &mut self,
        label: &str,
        sources: &ShaderSources,
        descriptor: &BufferDescriptor,
        draw_mode: DrawMode,
    ) -> Result<Self::Program, RenderError>;
}

/// How an upload reached the device.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Upload {
    /// First buffer for this mapper.
    Created,
    /// Layout changed or capacity ran out; the old buffer was dropped.
    Replaced,
    /// Same layout, enough room: written in place.
    Written,
}

/// A device vertex buffer and what it currently holds.
pub struct DeviceBuffer<T> {
    pub handle: T,
    pub descriptor: Arc<BufferDescriptor>,
    /// Allocated bytes.
    pub capacity: u64,
    pub vertex_count: u32,
}

/// Something ready to draw.
pub struct DrawBatch<'a, B: RenderBackend> {
    pub buffer: &'a B::Buffer,
    pub program: &'a B::Program,
    pub vertex_count: u32,
    pub draw_mode: DrawMode,
}

/// Device resources owned by one mapper.
pub struct DeviceResourceCache<B: RenderBackend> {
    /// Advanced after every successful buffer build.
    build_time: TimeStamp,
    buffer: Option<DeviceBuffer<B::Buffer>>,
    program: Option<(ShaderKey, B::Program)>,
}

impl<B: RenderBackend> Default for DeviceResourceCache<B> {
    fn default() -> Self {
        Self { build_time: TimeStamp::new(), buffer: None, program: None }
    }
}

impl<B: RenderBackend> DeviceResourceCache<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build_time(&self) -> TimeStamp {
        self.build_time
    }

    /// True when nothing was built yet or any dependency changed since.
    pub fn needs_buffer_rebuild(&self, stamps: &[TimeStamp]) -> bool {
        !self.build_time.is_set() || stamps.iter().any(|&s| s > self.build_time)
    }

    pub fn needs_program(&self, key: &ShaderKey) -> bool {
        self.program.as_ref().is_none_or(|(k, _)| k != key)
    }

    pub fn buffer(&self) -> Option<&DeviceBuffer<B::Buffer>> {
        self.buffer.as_ref()
    }

    pub fn program(&self) -> Option<&B::Program> {
        self.program.as_ref().map(|(_, p)| p)
    }

    pub fn shader_key(&self) -> Option<&ShaderKey> {
        self.program.as_ref().map(|(k, _)| k)
    }

    /// Moves `packed` to the device and advances the build stamp.
    pub fn upload(
        &mut self,
        backend: &mut B,
        label: &str,
        packed: &PackedBuffer,
    ) -> Result<Upload, RenderError> {
        let bytes = packed.as_bytes();
        let needed = packed.byte_len();

        let reusable = self
            .buffer
            .as_ref()
            .is_some_and(|b| b.descriptor == *packed.descriptor() && b.capacity >= needed);

        let kind = if let Some(current) = self.buffer.as_mut().filter(|_| reusable) {
            backend.write_vertex_buffer(&current.handle, bytes)?;
            current.vertex_count = packed.vertex_count();
            Upload::Written
        } else {
            let kind = if self.buffer.is_some() { Upload::Replaced } else { Upload::Created };
            // headroom so small growth keeps writing in place
            let capacity = needed.next_power_of_two().max(MIN_BUFFER_SIZE);
            let handle = backend.create_vertex_buffer(label, capacity)?;
            if !bytes.is_empty() {
                backend.write_vertex_buffer(&handle, bytes)?;
            }
            self.buffer = Some(DeviceBuffer {
                handle,
                descriptor: Arc::clone(packed.descriptor()),
                capacity,
                vertex_count: packed.vertex_count(),
            });
            kind
        };
        log::debug!("{label}: {kind:?} {needed} bytes, {} vertices", packed.vertex_count());

        self.build_time.modified();
        Ok(kind)
    }

    /// Compiles a program for `key` unless the cached one already matches.
    ///
    /// Returns whether a compile happened.
    pub fn ensure_program(
        &mut self,
        backend: &mut B,
        label: &str,
        key: ShaderKey,
        compose: impl FnOnce(&BufferDescriptor) -> ShaderSources,
    ) -> Result<bool, RenderError> {
        if !self.needs_program(&key) {
            return Ok(false);
        }
        let Some(buffer) = self.buffer.as_ref() else {
            return Ok(false);
        };
        let sources = compose(&buffer.descriptor);
        let program = backend.compile_program(label, &sources, &buffer.descriptor, key.draw_mode)?;
        log::debug!("{label}: compiled program for {key:?}");
        self.program = Some((key, program));
        Ok(true)
    }

    /// The current buffer and program, if both exist and there is something
    /// to draw.
    pub fn batch(&self) -> Option<DrawBatch<'_, B>> {
        let buffer = self.buffer.as_ref()?;
        let (key, program) = self.program.as_ref()?;
        if buffer.vertex_count == 0 {
            return None;
        }
        Some(DrawBatch {
            buffer: &buffer.handle,
            program,
            vertex_count: buffer.vertex_count,
            draw_mode: key.draw_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::packer::PackedBufferBuilder;
    use crate::render::scene::Representation;
    use crate::render::testing::RecordingBackend;

    fn packed(points: usize, color: u32) -> PackedBuffer {
        let d = BufferDescriptor::builder().attribute("vertexMC", 3).color(color).build().unwrap();
        let mut b = PackedBufferBuilder::new(d);
        let rgb = vec![0.5; color as usize];
        for i in 0..points {
            let p = [i as f32; 3];
            if color == 0 {
                b.push_vertex(&[&p]).unwrap();
            } else {
                b.push_vertex(&[&p, &rgb]).unwrap();
            }
        }
        b.finish()
    }

    fn key(color_components: u32) -> ShaderKey {
        ShaderKey {
            draw_mode: DrawMode::Points,
            representation: Representation::Points,
            color_components,
            has_scale: false,
            has_orientation: false,
            picking: false,
        }
    }

    #[test]
    fn same_layout_writes_in_place() {
        let mut backend = RecordingBackend::default();
        let mut cache = DeviceResourceCache::new();

        assert_eq!(cache.upload(&mut backend, "m", &packed(4, 0)).unwrap(), Upload::Created);
        assert_eq!(cache.upload(&mut backend, "m", &packed(5, 0)).unwrap(), Upload::Written);
        assert_eq!(backend.buffers_created, 1);
        assert_eq!(cache.buffer().unwrap().vertex_count, 5);
    }

    #[test]
    fn layout_change_replaces_buffer() {
        let mut backend = RecordingBackend::default();
        let mut cache = DeviceResourceCache::new();

        cache.upload(&mut backend, "m", &packed(4, 0)).unwrap();
        assert_eq!(cache.upload(&mut backend, "m", &packed(4, 3)).unwrap(), Upload::Replaced);
        assert_eq!(backend.buffers_created, 2);
        assert_eq!(cache.buffer().unwrap().descriptor.color_offset(), Some(12));
    }

    #[test]
    fn growth_past_capacity_replaces_buffer() {
        let mut backend = RecordingBackend::default();
        let mut cache = DeviceResourceCache::new();

        cache.upload(&mut backend, "m", &packed(1, 0)).unwrap();
        assert_eq!(cache.buffer().unwrap().capacity, MIN_BUFFER_SIZE);
        assert_eq!(cache.upload(&mut backend, "m", &packed(100, 0)).unwrap(), Upload::Replaced);
        assert_eq!(cache.buffer().unwrap().capacity, 2048);
    }

    #[test]
    fn build_stamp_gates_rebuilds() {
        let mut backend = RecordingBackend::default();
        let mut cache = DeviceResourceCache::new();
        let input = TimeStamp::modified_now();

        assert!(cache.needs_buffer_rebuild(&[input]));
        cache.upload(&mut backend, "m", &packed(1, 0)).unwrap();
        assert!(!cache.needs_buffer_rebuild(&[input, TimeStamp::new()]));
        assert!(cache.needs_buffer_rebuild(&[TimeStamp::modified_now()]));
    }

    #[test]
    fn program_compiles_once_per_key() {
        let mut backend = RecordingBackend::default();
        let mut cache = DeviceResourceCache::new();
        let compose = |_: &BufferDescriptor| ShaderSources::new("v", "f");

        // no buffer yet: nothing to compile against
        assert!(!cache.ensure_program(&mut backend, "m", key(0), compose).unwrap());
        cache.upload(&mut backend, "m", &packed(2, 0)).unwrap();

        assert!(cache.ensure_program(&mut backend, "m", key(0), compose).unwrap());
        assert!(!cache.ensure_program(&mut backend, "m", key(0), compose).unwrap());
        assert!(cache.ensure_program(&mut backend, "m", key(3), compose).unwrap());
        assert_eq!(backend.programs_compiled, 2);

        let batch = cache.batch().unwrap();
        assert_eq!(batch.vertex_count, 2);
        assert_eq!(batch.draw_mode, DrawMode::Points);
    }
}
