use strata_glsl::{ShaderSources, Stage};

use crate::render::packer::BufferDescriptor;
use crate::render::scene::DrawMode;

use super::markers::*;
use super::{ShaderBuildState, ShaderLayer};

const VERTEX_TEMPLATE: &str = include_str!("shaders/polydata.vert");
const FRAGMENT_TEMPLATE: &str = include_str!("shaders/polydata.frag");

/// Declared in both stages; matches `MapperUniforms`.
const UNIFORM_BLOCK: &str = "\
layout(set = 0, binding = 0) uniform MapperUniforms {
  mat4 MCVCMatrix;
  mat4 VCDCMatrix;
  mat3 normalMatrix;
  vec4 diffuseColor;
  vec4 mapperIndex;
  int cameraParallel;
};
";

/// The root layer: plain points, and the defaults every other layer relies
/// on.
#[derive(Debug, Copy, Clone, Default)]
pub struct PolyDataShaderLayer;

impl PolyDataShaderLayer {
    pub fn new() -> Self {
        Self
    }
}

impl ShaderLayer for PolyDataShaderLayer {
    fn shader_template(&self, sources: &mut ShaderSources) {
        sources.vertex = VERTEX_TEMPLATE.to_owned();
        sources.fragment = FRAGMENT_TEMPLATE.to_owned();
        sources.geometry.clear();
    }

    fn replace_shader_values(&self, sources: &mut ShaderSources, state: &ShaderBuildState<'_>) {
        use Stage::{Fragment, Vertex};

        sources.replace(Vertex, CAMERA_DEC, UNIFORM_BLOCK);
        sources.replace(Fragment, CAMERA_DEC, UNIFORM_BLOCK);
        sources.replace(Vertex, ATTRIBUTES_DEC, &attribute_declarations(state.descriptor));

        // position
        sources.replace(Vertex, POSITION_DEC, "layout(location = 0) out vec4 vertexVCVSOutput;\n");
        sources.replace(
            Vertex,
            POSITION_IMPL,
            &[
                "  vertexVCVSOutput = MCVCMatrix * vec4(vertexMC, 1.0);\n",
                "  gl_Position = VCDCMatrix * vertexVCVSOutput;\n",
            ],
        );
        sources.replace(Fragment, POSITION_DEC, "layout(location = 0) in vec4 vertexVCVSOutput;\n");
        sources.replace(Fragment, POSITION_IMPL, "  vec4 vertexVC = vertexVCVSOutput;\n");

        // color
        match state.key.color_components {
            0 => {
                sources.replace(
                    Fragment,
                    COLOR_IMPL,
                    &["  vec3 baseColor = diffuseColor.rgb;\n", "  float opacity = diffuseColor.a;\n"],
                );
            }
            components => {
                sources.replace(Vertex, COLOR_DEC, "layout(location = 1) out vec4 vertexColorVSOutput;\n");
                let assign = if components == 3 {
                    "  vertexColorVSOutput = vec4(scalarColor, 1.0);\n"
                } else {
                    "  vertexColorVSOutput = scalarColor;\n"
                };
                sources.replace(Vertex, COLOR_IMPL, assign);
                sources.replace(Fragment, COLOR_DEC, "layout(location = 1) in vec4 vertexColorVSOutput;\n");
                sources.replace(
                    Fragment,
                    COLOR_IMPL,
                    &[
                        "  vec3 baseColor = vertexColorVSOutput.rgb;\n",
                        "  float opacity = vertexColorVSOutput.a;\n",
                    ],
                );
            }
        }

        // normal and light; points are drawn unlit
        sources.replace(Fragment, NORMAL_IMPL, "  vec3 normalVC = vec3(0.0, 0.0, 1.0);\n");
        let light: &[&str] = match state.key.draw_mode {
            DrawMode::Points => &["  vec3 litColor = baseColor;\n"],
            DrawMode::Lines | DrawMode::Triangles => &[
                "  float diffuse = max(normalize(normalVC).z, 0.0);\n",
                "  vec3 litColor = baseColor * (0.2 + 0.8 * diffuse);\n",
            ],
        };
        sources.replace(Fragment, LIGHT_IMPL, light);

        // output
        sources.replace(Fragment, OUTPUT_DEC, "layout(location = 0) out vec4 fragOutput0;\n");
        sources.replace(Fragment, OUTPUT_IMPL, "  fragOutput0 = vec4(litColor, opacity);\n");
        if state.key.picking {
            sources.replace(Fragment, PICKING_IMPL, "  fragOutput0 = vec4(mapperIndex.rgb, 1.0);\n");
        }

        sources.strip_markers();
    }
}

/// `in` declarations for every slot of the vertex layout.
fn attribute_declarations(descriptor: &BufferDescriptor) -> Vec<String> {
    descriptor
        .slots()
        .iter()
        .map(|slot| {
            let ty = match slot.components {
                1 => "float",
                2 => "vec2",
                3 => "vec3",
                _ => "vec4",
            };
            format!("layout(location = {}) in {ty} {};\n", slot.location, slot.name)
        })
        .collect()
}
