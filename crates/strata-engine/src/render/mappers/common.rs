use std::sync::Arc;

use crate::data::PolyData;
use crate::render::cache::{DeviceResourceCache, DrawBatch, RenderBackend};
use crate::render::color::{ColorMapping, MappedColors};
use crate::render::packer::{LayoutError, PackedBuffer};
use crate::render::scene::{ActorState, DrawMode, RenderState};
use crate::render::shader::{compose, ShaderBuildState, ShaderKey, ShaderLayer};
use crate::render::RenderError;
use crate::time::TimeStamp;

/// Why a buffer build did not produce a buffer.
pub(super) enum PackError {
    /// A required input array is absent; reported, not returned.
    MissingArray(String),
    Layout(LayoutError),
}

impl From<LayoutError> for PackError {
    fn from(err: LayoutError) -> Self {
        PackError::Layout(err)
    }
}

/// The mapper-specific half of a render call.
pub(super) struct RenderRequest<'a> {
    pub params: TimeStamp,
    pub layer: &'a dyn ShaderLayer,
    pub draw_mode: DrawMode,
    pub has_scale: bool,
    pub has_orientation: bool,
}

/// State shared by every mapper.
pub(super) struct MapperCore<B: RenderBackend> {
    class: &'static str,
    input: Option<Arc<PolyData>>,
    color: ColorMapping,
    cache: DeviceResourceCache<B>,
    /// Build stamps whose missing array was already reported.
    reported: Option<[TimeStamp; 3]>,
    #[cfg(test)]
    reports: usize,
}

impl<B: RenderBackend> MapperCore<B> {
    pub fn new(class: &'static str) -> Self {
        Self {
            class,
            input: None,
            color: ColorMapping::default(),
            cache: DeviceResourceCache::new(),
            reported: None,
            #[cfg(test)]
            reports: 0,
        }
    }

    pub fn set_input(&mut self, input: Arc<PolyData>) {
        self.input = Some(input);
    }

    pub fn input(&self) -> Option<&Arc<PolyData>> {
        self.input.as_ref()
    }

    pub fn color(&self) -> &ColorMapping {
        &self.color
    }

    pub fn color_mut(&mut self) -> &mut ColorMapping {
        &mut self.color
    }

    pub fn cache(&self) -> &DeviceResourceCache<B> {
        &self.cache
    }

    /// Missing-array diagnostics logged so far.
    #[cfg(test)]
    pub fn reports(&self) -> usize {
        self.reports
    }

    /// Buffer work, then program work, then the batch to draw.
    pub fn render(
        &mut self,
        backend: &mut B,
        actor: &ActorState,
        state: &RenderState,
        request: RenderRequest<'_>,
        pack: impl FnOnce(&PolyData, Option<&MappedColors>) -> Result<PackedBuffer, PackError>,
    ) -> Result<Option<DrawBatch<'_, B>>, RenderError> {
        let Some(input) = self.input.clone() else {
            return Ok(None);
        };

        let stamps = [input.mtime(), request.params, self.color.mtime()];
        if self.cache.needs_buffer_rebuild(&stamps) {
            let colors = self.color.map_scalars(&input);
            match pack(&input, colors.as_ref()) {
                Ok(packed) => {
                    self.cache.upload(backend, self.class, &packed)?;
                    self.reported = None;
                }
                Err(PackError::MissingArray(what)) => {
                    if self.reported != Some(stamps) {
                        log::error!("{}: {what}; keeping the previous buffer", self.class);
                        self.reported = Some(stamps);
                        #[cfg(test)]
                        {
                            self.reports += 1;
                        }
                    }
                }
                Err(PackError::Layout(err)) => return Err(err.into()),
            }
        }

        let Some(buffer) = self.cache.buffer() else {
            return Ok(None);
        };
        let key = ShaderKey {
            draw_mode: request.draw_mode,
            representation: actor.representation,
            color_components: buffer.descriptor.color_components(),
            has_scale: request.has_scale,
            has_orientation: request.has_orientation,
            picking: state.picking,
        };
        let layer = request.layer;
        self.cache.ensure_program(backend, self.class, key, |descriptor| {
            compose(layer, &ShaderBuildState { key, descriptor })
        })?;
        Ok(self.cache.batch())
    }
}

/// Byte colors as `[0, 1]` floats; only the first `n` entries are used.
pub(super) fn color_floats(bytes: &[u8]) -> ([f32; 4], usize) {
    let mut rgba = [0.0; 4];
    for (out, &b) in rgba.iter_mut().zip(bytes) {
        *out = f32::from(b) / 255.0;
    }
    (rgba, bytes.len().min(4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_normalize_to_unit_range() {
        let (rgba, n) = color_floats(&[0, 255, 51]);
        assert_eq!(n, 3);
        assert_eq!(&rgba[..n], &[0.0, 1.0, 0.2]);
    }
}
