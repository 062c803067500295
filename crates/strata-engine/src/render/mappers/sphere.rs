use std::sync::Arc;

use crate::data::{DataArray, PolyData};
use crate::device::WgpuBackend;
use crate::pipeline::{Algorithm, PipelineError};
use crate::render::cache::{DeviceResourceCache, DrawBatch, RenderBackend};
use crate::render::color::{ColorMapping, MappedColors};
use crate::render::packer::{BufferDescriptor, PackedBuffer, PackedBufferBuilder, POSITION_ATTRIBUTE};
use crate::render::scene::{ActorState, DrawMode, RenderState};
use crate::render::shader::SphereShaderLayer;
use crate::render::RenderError;
use crate::time::{assign, TimeStamp};

use super::common::{color_floats, MapperCore, PackError, RenderRequest};

pub const DEFAULT_SPHERE_RADIUS: f32 = 0.05;

/// Per-corner view-plane offset of the triangle circumscribing a disc of
/// radius `r`.
fn corner_offsets(r: f32) -> [[f32; 2]; 3] {
    let c = 30f32.to_radians().cos();
    [[-2.0 * r * c, -r], [2.0 * r * c, -r], [0.0, 2.0 * r]]
}

/// Draws every point as a shaded sphere.
///
/// The radius is [`radius`](Self::radius) unless a scale array is bound, in
/// which case each point uses the array's first component times
/// [`scale_factor`](Self::scale_factor).
pub struct SphereMapper<B: RenderBackend = WgpuBackend> {
    core: MapperCore<B>,
    layer: SphereShaderLayer,
    radius: f32,
    scale_array: Option<String>,
    scale_factor: f32,
    mtime: TimeStamp,
}

impl<B: RenderBackend> Default for SphereMapper<B> {
    fn default() -> Self {
        Self {
            core: MapperCore::new("SphereMapper"),
            layer: SphereShaderLayer::new(),
            radius: DEFAULT_SPHERE_RADIUS,
            scale_array: None,
            scale_factor: 1.0,
            mtime: TimeStamp::new(),
        }
    }
}

impl<B: RenderBackend> SphereMapper<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) {
        assign(&mut self.radius, radius, &mut self.mtime);
    }

    pub fn scale_array(&self) -> Option<&str> {
        self.scale_array.as_deref()
    }

    pub fn set_scale_array(&mut self, name: Option<&str>) {
        assign(&mut self.scale_array, name.map(str::to_owned), &mut self.mtime);
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    pub fn set_scale_factor(&mut self, factor: f32) {
        assign(&mut self.scale_factor, factor, &mut self.mtime);
    }

    pub fn color_mapping(&self) -> &ColorMapping {
        self.core.color()
    }

    pub fn color_mapping_mut(&mut self) -> &mut ColorMapping {
        self.core.color_mut()
    }

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
            draw_mode: DrawMode::Triangles,
            has_scale: self.scale_array.is_some(),
            has_orientation: false,
        };
        let (radius, factor, scale_array) = (self.radius, self.scale_factor, self.scale_array.as_deref());
        self.core.render(backend, actor, state, request, |input, colors| {
            pack_spheres(input, colors, radius, factor, scale_array)
        })
    }
}

fn pack_spheres(
    input: &PolyData,
    colors: Option<&MappedColors>,
    radius: f32,
    scale_factor: f32,
    scale_array: Option<&str>,
) -> Result<PackedBuffer, PackError> {
    let scales: Option<&Arc<DataArray>> = scale_array.and_then(|name| {
        let array = input.point_data().array(name);
        if array.is_none() {
            log::warn!("SphereMapper: scale array `{name}` not found; using radius");
        }
        array
    });

    let color_components = colors.map_or(0, |c| c.components() as u32);
    let descriptor = BufferDescriptor::builder()
        .attribute(POSITION_ATTRIBUTE, 3)
        .attribute("offsetMC", 2)
        .color(color_components)
        .build()?;

    let mut builder = PackedBufferBuilder::new(descriptor);
    for i in 0..input.number_of_points() {
        let p = input.point(i);
        let r = scales.map_or(radius, |s| s.component(i, 0) * scale_factor);
        let color = colors.map(|c| color_floats(c.color(i)));
        for offset in corner_offsets(r) {
            let mut v = builder.vertex();
            v.put(&p)?.put(&offset)?;
            if let Some((rgba, n)) = &color {
                v.put(&rgba[..*n])?;
            }
            v.finish()?;
        }
    }
    Ok(builder.finish())
}

impl<B: RenderBackend + 'static> Algorithm for SphereMapper<B> {
    fn class_name(&self) -> &'static str {
        "SphereMapper"
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
