use std::sync::Arc;

use crate::data::{DataArray, PolyData};
use crate::device::WgpuBackend;
use crate::pipeline::{Algorithm, PipelineError};
use crate::render::cache::{DeviceResourceCache, DrawBatch, RenderBackend};
use crate::render::color::{ColorMapping, MappedColors};
use crate::render::packer::{BufferDescriptor, PackedBuffer, PackedBufferBuilder, POSITION_ATTRIBUTE};
use crate::render::scene::{ActorState, DrawMode, RenderState};
use crate::render::shader::StickShaderLayer;
use crate::render::RenderError;
use crate::time::{assign, TimeStamp};

use super::common::{color_floats, MapperCore, PackError, RenderRequest};

pub const DEFAULT_STICK_LENGTH: f32 = 0.1;
pub const DEFAULT_STICK_RADIUS: f32 = 0.025;

/// Box corner tags; x and z pick the side across the axis, y the end.
const CORNERS: [[f32; 3]; 6] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

/// Four triangles over [`CORNERS`].
const ORDER: [usize; 12] = [0, 1, 2, 2, 3, 0, 3, 2, 4, 4, 5, 3];

/// Draws every point as a capped cylinder along a per-point direction.
///
/// The orientation array is required. A two-component scale array, when
/// bound, supplies per-point `(length, radius)`.
pub struct StickMapper<B: RenderBackend = WgpuBackend> {
    core: MapperCore<B>,
    layer: StickShaderLayer,
    length: f32,
    radius: f32,
    orientation_array: Option<String>,
    scale_array: Option<String>,
    mtime: TimeStamp,
}

impl<B: RenderBackend> Default for StickMapper<B> {
    fn default() -> Self {
        Self {
            core: MapperCore::new("StickMapper"),
            layer: StickShaderLayer::new(),
            length: DEFAULT_STICK_LENGTH,
            radius: DEFAULT_STICK_RADIUS,
            orientation_array: None,
            scale_array: None,
            mtime: TimeStamp::new(),
        }
    }
}

impl<B: RenderBackend> StickMapper<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn set_length(&mut self, length: f32) {
        assign(&mut self.length, length, &mut self.mtime);
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) {
        assign(&mut self.radius, radius, &mut self.mtime);
    }

    pub fn orientation_array(&self) -> Option<&str> {
        self.orientation_array.as_deref()
    }

    pub fn set_orientation_array(&mut self, name: Option<&str>) {
        assign(&mut self.orientation_array, name.map(str::to_owned), &mut self.mtime);
    }

    pub fn scale_array(&self) -> Option<&str> {
        self.scale_array.as_deref()
    }

    pub fn set_scale_array(&mut self, name: Option<&str>) {
        assign(&mut self.scale_array, name.map(str::to_owned), &mut self.mtime);
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
            has_orientation: true,
        };
        let params = StickParams {
            length: self.length,
            radius: self.radius,
            orientation_array: self.orientation_array.as_deref(),
            scale_array: self.scale_array.as_deref(),
        };
        self.core.render(backend, actor, state, request, |input, colors| {
            pack_sticks(input, colors, &params)
        })
    }
}

struct StickParams<'a> {
    length: f32,
    radius: f32,
    orientation_array: Option<&'a str>,
    scale_array: Option<&'a str>,
}

fn orientation<'a>(input: &'a PolyData, name: Option<&str>) -> Result<Option<&'a Arc<DataArray>>, PackError> {
    if input.number_of_points() == 0 {
        return Ok(None);
    }
    let Some(name) = name else {
        return Err(PackError::MissingArray("no orientation array set".into()));
    };
    match input.point_data().array(name) {
        Some(array) if array.components() == 3 => Ok(Some(array)),
        Some(array) => Err(PackError::MissingArray(format!(
            "orientation array `{name}` has {} components, expected 3",
            array.components()
        ))),
        None => Err(PackError::MissingArray(format!("orientation array `{name}` not found"))),
    }
}

fn pack_sticks(
    input: &PolyData,
    colors: Option<&MappedColors>,
    params: &StickParams<'_>,
) -> Result<PackedBuffer, PackError> {
    let orient = orientation(input, params.orientation_array)?;

    let scales = match params.scale_array {
        Some(name) => match input.point_data().array(name) {
            None => {
                log::warn!("StickMapper: scale array `{name}` not found; using length and radius");
                None
            }
            Some(array) if array.components() < 2 => {
                log::warn!(
                    "StickMapper: scale array `{name}` has {} component(s), need length and radius; ignoring it",
                    array.components()
                );
                None
            }
            Some(array) => Some(array),
        },
        None => None,
    };

    let color_components = colors.map_or(0, |c| c.components() as u32);
    let descriptor = BufferDescriptor::builder()
        .attribute(POSITION_ATTRIBUTE, 3)
        .attribute("orientMC", 3)
        .attribute("offsetMC", 3)
        .attribute("radiusMC", 1)
        .color(color_components)
        .build()?;

    let mut builder = PackedBufferBuilder::new(descriptor);
    for i in 0..input.number_of_points() {
        let p = input.point(i);
        let (length, radius) = match scales {
            Some(s) => (s.component(i, 0), s.component(i, 1)),
            None => (params.length, params.radius),
        };
        let axis = match orient {
            Some(o) => [
                o.component(i, 0) * length,
                o.component(i, 1) * length,
                o.component(i, 2) * length,
            ],
            None => [0.0, 0.0, length],
        };
        let color = colors.map(|c| color_floats(c.color(i)));
        for corner in ORDER {
            let mut v = builder.vertex();
            v.put(&p)?.put(&axis)?.put(&CORNERS[corner])?.put(&[radius])?;
            if let Some((rgba, n)) = &color {
                v.put(&rgba[..*n])?;
            }
            v.finish()?;
        }
    }
    Ok(builder.finish())
}

impl<B: RenderBackend + 'static> Algorithm for StickMapper<B> {
    fn class_name(&self) -> &'static str {
        "StickMapper"
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
