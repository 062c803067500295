use strata_glsl::{ShaderSources, Stage};
use wgpu::naga::front::glsl::{Frontend, Options};
use wgpu::naga::ShaderStage;

use crate::render::RenderError;

/// Parses every stage with the GLSL frontend the wgpu backend compiles with.
///
/// Surfaces composition mistakes as a [`RenderError::ShaderCompile`] instead
/// of a device validation failure.
pub fn validate_glsl(label: &str, sources: &ShaderSources) -> Result<(), RenderError> {
    if sources.has_geometry_stage() {
        return Err(RenderError::ShaderCompile {
            label: label.to_owned(),
            stage: Stage::Geometry,
            message: "geometry stages are not supported".to_owned(),
        });
    }

    let mut frontend = Frontend::default();
    for (stage, naga_stage) in
        [(Stage::Vertex, ShaderStage::Vertex), (Stage::Fragment, ShaderStage::Fragment)]
    {
        frontend
            .parse(&Options::from(naga_stage), sources.stage(stage))
            .map_err(|errors| RenderError::ShaderCompile {
                label: label.to_owned(),
                stage,
                message: errors.to_string(),
            })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::packer::BufferDescriptor;
    use crate::render::scene::{DrawMode, Representation};
    use crate::render::shader::{
        compose, PolyDataShaderLayer, ShaderBuildState, ShaderKey, ShaderLayer, SphereShaderLayer,
        StickShaderLayer,
    };

    fn key(draw_mode: DrawMode, color_components: u32, picking: bool) -> ShaderKey {
        ShaderKey {
            draw_mode,
            representation: Representation::Surface,
            color_components,
            has_scale: false,
            has_orientation: false,
            picking,
        }
    }

    fn check(layer: &dyn ShaderLayer, extras: &[(&str, u32)], draw_mode: DrawMode) {
        for (color, picking) in [(0, false), (3, false), (4, true)] {
            let mut builder = BufferDescriptor::builder().attribute("vertexMC", 3);
            for (name, components) in extras {
                builder = builder.attribute(*name, *components);
            }
            let d = builder.color(color).build().unwrap();
            let state = ShaderBuildState { key: key(draw_mode, color, picking), descriptor: &d };
            let sources = compose(layer, &state);
            if let Err(err) = validate_glsl("test", &sources) {
                panic!("{err}\n--- vertex ---\n{}\n--- fragment ---\n{}", sources.vertex, sources.fragment);
            }
        }
    }

    #[test]
    fn poly_data_programs_parse() {
        check(&PolyDataShaderLayer, &[], DrawMode::Points);
    }

    #[test]
    fn sphere_programs_parse() {
        check(&SphereShaderLayer::new(), &[("offsetMC", 2)], DrawMode::Triangles);
    }

    #[test]
    fn stick_programs_parse() {
        check(
            &StickShaderLayer::new(),
            &[("orientMC", 3), ("offsetMC", 3), ("radiusMC", 1)],
            DrawMode::Triangles,
        );
    }

    #[test]
    fn geometry_stage_is_rejected() {
        let mut s = ShaderSources::new("", "");
        s.geometry = "void main() {}".into();
        assert!(matches!(
            validate_glsl("g", &s),
            Err(RenderError::ShaderCompile { stage: Stage::Geometry, .. })
        ));
    }

    #[test]
    fn syntax_errors_name_the_stage() {
        let s = ShaderSources::new("#version 450\nvoid main() { gl_Position = vec4(1.0); }\n", "#version 450\nvoid main() { nope }\n");
        assert!(matches!(
            validate_glsl("bad", &s),
            Err(RenderError::ShaderCompile { stage: Stage::Fragment, .. })
        ));
    }
}
