//! A [`RenderBackend`] that records calls instead of touching a device.

use strata_glsl::ShaderSources;

use super::packer::BufferDescriptor;
use super::scene::DrawMode;
use super::{RenderBackend, RenderError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedBuffer {
    pub id: usize,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedProgram {
    pub id: usize,
    pub sources: ShaderSources,
    pub descriptor: BufferDescriptor,
    pub draw_mode: DrawMode,
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub buffers_created: usize,
    pub buffer_writes: usize,
    pub programs_compiled: usize,
    /// Bytes of the most recent write.
    pub last_write: Vec<u8>,
}

impl RecordingBackend {
    /// The most recent upload viewed as floats.
    pub fn last_floats(&self) -> Vec<f32> {
        self.last_write
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect()
    }
}

impl RenderBackend for RecordingBackend {
    type Buffer = RecordedBuffer;
    type Program = RecordedProgram;

    fn create_vertex_buffer(&mut self, _label: &str, size: u64) -> Result<RecordedBuffer, RenderError> {
        self.buffers_created += 1;
        Ok(RecordedBuffer { id: self.buffers_created, size })
    }

    fn write_vertex_buffer(&mut self, buffer: &RecordedBuffer, data: &[u8]) -> Result<(), RenderError> {
        if data.len() as u64 > buffer.size {
            return Err(RenderError::Device(format!("write of {} bytes overflows buffer", data.len())));
        }
        self.buffer_writes += 1;
        self.last_write = data.to_vec();
        Ok(())
    }

    fn compile_program(
        &mut self,
        _label: &str,
        sources: &ShaderSources,
        descriptor: &BufferDescriptor,
        draw_mode: DrawMode,
    ) -> Result<RecordedProgram, RenderError> {
        self.programs_compiled += 1;
        Ok(RecordedProgram {
            id: self.programs_compiled,
            sources: sources.clone(),
            descriptor: descriptor.clone(),
            draw_mode,
        })
    }
}
