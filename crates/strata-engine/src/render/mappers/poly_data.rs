use std::sync::Arc;

use crate::data::PolyData;
use crate::device::WgpuBackend;
use crate::pipeline::{Algorithm, PipelineError};
use crate::render::cache::{DeviceResourceCache, DrawBatch, RenderBackend};
use crate::render::color::{ColorMapping, MappedColors};
use crate::render::packer::{BufferDescriptor, PackedBuffer, PackedBufferBuilder, POSITION_ATTRIBUTE};
use crate::render::scene::{ActorState, DrawMode, RenderState};
use crate::render::shader::PolyDataShaderLayer;
use crate::render::RenderError;
use crate::time::TimeStamp;

use super::common::{color_floats, MapperCore, PackError, RenderRequest};

/// Draws every point as a single vertex.
pub struct PolyDataMapper<B: RenderBackend = WgpuBackend> {
    core: MapperCore<B>,
    layer: PolyDataShaderLayer,
    mtime: TimeStamp,
}

impl<B: RenderBackend> Default for PolyDataMapper<B> {
    fn default() -> Self {
        Self {
            core: MapperCore::new("PolyDataMapper"),
            layer: PolyDataShaderLayer::new(),
            mtime: TimeStamp::new(),
        }
    }
}

impl<B: RenderBackend> PolyDataMapper<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_mapping(&self) -> &ColorMapping {
        self.core.color()
    }

    pub fn color_mapping_mut(&mut self) -> &mut ColorMapping {
        self.core.color_mut()
    }

    /// The snapshot captured by the last pipeline update.
    pub fn input(&self) -> Option<&Arc<PolyData>> {
        self.core.input()
    }

    pub fn resources(&self) -> &DeviceResourceCache<B> {
        self.core.cache()
    }

    pub fn render(
        &mut self,
        backend: &mut B,
        actor: &ActorState,
        state: &RenderState,
    ) -> Result<Option<DrawBatch<'_, B>>, RenderError> {
        let request = RenderRequest {
            params: self.mtime,
            layer: &self.layer,
            draw_mode: DrawMode::Points,
            has_scale: false,
            has_orientation: false,
        };
        self.core.render(backend, actor, state, request, pack_points)
    }
}

fn pack_points(input: &PolyData, colors: Option<&MappedColors>) -> Result<PackedBuffer, PackError> {
    let color_components = colors.map_or(0, |c| c.components() as u32);
    let descriptor = BufferDescriptor::builder()
        .attribute(POSITION_ATTRIBUTE, 3)
        .color(color_components)
        .build()?;

    let mut builder = PackedBufferBuilder::new(descriptor);
    for i in 0..input.number_of_points() {
        let mut v = builder.vertex();
        v.put(&input.point(i))?;
        if let Some(colors) = colors {
            let (rgba, n) = color_floats(colors.color(i));
            v.put(&rgba[..n])?;
        }
        v.finish()?;
    }
    Ok(builder.finish())
}

impl<B: RenderBackend + 'static> Algorithm for PolyDataMapper<B> {
    fn class_name(&self) -> &'static str {
        "PolyDataMapper"
    }

    fn output_ports(&self) -> usize {
        0
    }

    fn mtime(&self) -> TimeStamp {
        self.mtime.max(self.core.color().mtime())
    }

    fn request_data(&mut self, inputs: &[Arc<PolyData>]) -> Result<Vec<PolyData>, PipelineError> {
        self.core.set_input(Arc::clone(&inputs[0]));
        Ok(Vec::new())
    }
}
