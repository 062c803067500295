use strata_glsl::{ShaderSources, Stage};

use super::markers::{DEPTH_IMPL, NORMAL_IMPL, POSITION_DEC};
use super::{PolyDataShaderLayer, ShaderBuildState, ShaderLayer};

const VERTEX_TEMPLATE: &str = include_str!("shaders/sphere.vert");

/// Ray-traced spheres drawn on camera-facing triangles.
#[derive(Debug, Copy, Clone, Default)]
pub struct SphereShaderLayer {
    base: PolyDataShaderLayer,
}

impl SphereShaderLayer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShaderLayer for SphereShaderLayer {
    fn shader_template(&self, sources: &mut ShaderSources) {
        self.base.shader_template(sources);
        sources.vertex = VERTEX_TEMPLATE.to_owned();
    }

    fn replace_shader_values(&self, sources: &mut ShaderSources, state: &ShaderBuildState<'_>) {
        sources.replace(
            Stage::Vertex,
            POSITION_DEC,
            &[
                "layout(location = 0) out vec4 vertexVCVSOutput;\n",
                "layout(location = 2) out vec3 centerVCVSOutput;\n",
                "layout(location = 3) out float radiusVCVSOutput;\n",
            ],
        );
        sources.replace(
            Stage::Fragment,
            POSITION_DEC,
            &[
                "layout(location = 0) in vec4 vertexVCVSOutput;\n",
                "layout(location = 2) in vec3 centerVCVSOutput;\n",
                "layout(location = 3) in float radiusVCVSOutput;\n",
            ],
        );

        // the normal falls out of the intersection below
        sources.replace(Stage::Fragment, NORMAL_IMPL, "");
        sources.replace(
            Stage::Fragment,
            DEPTH_IMPL,
            &[
                "  vec3 eyePos;\n",
                "  vec3 eyeDir;\n",
                "  if (cameraParallel != 0) {\n",
                "    eyePos = vec3(vertexVC.x, vertexVC.y, vertexVC.z + 3.0 * radiusVCVSOutput);\n",
                "    eyeDir = vec3(0.0, 0.0, -1.0);\n",
                "  } else {\n",
                "    eyeDir = normalize(vertexVC.xyz);\n",
                "    eyePos = vec3(0.0, 0.0, 0.0);\n",
                // pull the eye in to limit precision noise far away
                "    if (length(vertexVC.xyz) > radiusVCVSOutput * 3.0) {\n",
                "      eyePos = vertexVC.xyz - eyeDir * 3.0 * radiusVCVSOutput;\n",
                "    }\n",
                "  }\n",
                "  eyePos = (eyePos - centerVCVSOutput) / radiusVCVSOutput;\n",
                "  float b = 2.0 * dot(eyePos, eyeDir);\n",
                "  float c = dot(eyePos, eyePos) - 1.0;\n",
                "  float d = b * b - 4.0 * c;\n",
                "  if (d < 0.0) {\n",
                "    discard;\n",
                "  }\n",
                "  float t = (-b - sqrt(d)) * 0.5;\n",
                "  vec3 normalVC = normalize(eyePos + t * eyeDir);\n",
                "  vertexVC = vec4(normalVC * radiusVCVSOutput + centerVCVSOutput, 1.0);\n",
                "  vec4 pos = VCDCMatrix * vertexVC;\n",
                "  gl_FragDepth = pos.z / pos.w;\n",
            ],
        );

        self.base.replace_shader_values(sources, state);
    }
}
