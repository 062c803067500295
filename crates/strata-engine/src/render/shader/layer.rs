use strata_glsl::ShaderSources;

use crate::render::packer::BufferDescriptor;
use crate::render::scene::{DrawMode, Representation};

/// Everything that selects a distinct program for a mapper.
///
/// A mapper keeps one compiled program and recompiles only when its key
/// changes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ShaderKey {
    pub draw_mode: DrawMode,
    pub representation: Representation,
    /// 0, 3 or 4.
    pub color_components: u32,
    pub has_scale: bool,
    pub has_orientation: bool,
    pub picking: bool,
}

/// Inputs to a layer's substitutions.
#[derive(Debug, Copy, Clone)]
pub struct ShaderBuildState<'a> {
    pub key: ShaderKey,
    /// Layout of the vertex buffer the program will read.
    pub descriptor: &'a BufferDescriptor,
}

/// One contributor to a composed program.
pub trait ShaderLayer {
    /// Installs the template sources.
    fn shader_template(&self, sources: &mut ShaderSources);

    /// Fills markers in. Layers wrapping another layer call it last.
    fn replace_shader_values(&self, sources: &mut ShaderSources, state: &ShaderBuildState<'_>);
}

/// Runs `layer`'s template and substitution passes.
pub fn compose(layer: &dyn ShaderLayer, state: &ShaderBuildState<'_>) -> ShaderSources {
    let mut sources = ShaderSources::default();
    layer.shader_template(&mut sources);
    layer.replace_shader_values(&mut sources, state);
    sources
}
