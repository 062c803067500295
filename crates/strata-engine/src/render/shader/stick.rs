use strata_glsl::{ShaderSources, Stage};

use super::markers::{DEPTH_IMPL, NORMAL_IMPL, POSITION_DEC};
use super::{PolyDataShaderLayer, ShaderBuildState, ShaderLayer};

const VERTEX_TEMPLATE: &str = include_str!("shaders/stick.vert");

/// Ray-traced capped cylinders drawn on camera-facing boxes.
#[derive(Debug, Copy, Clone, Default)]
pub struct StickShaderLayer {
    base: PolyDataShaderLayer,
}

impl StickShaderLayer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShaderLayer for StickShaderLayer {
    fn shader_template(&self, sources: &mut ShaderSources) {
        self.base.shader_template(sources);
        sources.vertex = VERTEX_TEMPLATE.to_owned();
    }

    fn replace_shader_values(&self, sources: &mut ShaderSources, state: &ShaderBuildState<'_>) {
        let varyings = |dir: &str| -> Vec<String> {
            [
                (0, "vec4", "vertexVCVSOutput"),
                (2, "vec3", "centerVCVSOutput"),
                (3, "float", "radiusVCVSOutput"),
                (4, "vec3", "orientVCVSOutput"),
                (5, "float", "lengthVCVSOutput"),
            ]
            .iter()
            .map(|(loc, ty, name)| format!("layout(location = {loc}) {dir} {ty} {name};\n"))
            .collect()
        };
        sources.replace(Stage::Vertex, POSITION_DEC, &varyings("out"));
        sources.replace(Stage::Fragment, POSITION_DEC, &varyings("in"));

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
                "    if (length(vertexVC.xyz) > radiusVCVSOutput * 3.0) {\n",
                "      eyePos = vertexVC.xyz - eyeDir * 3.0 * radiusVCVSOutput;\n",
                "    }\n",
                "  }\n",
                "  eyePos = eyePos - centerVCVSOutput;\n",
                // basis around the axis
                "  vec3 base1;\n",
                "  if (abs(orientVCVSOutput.z) < 0.99) {\n",
                "    base1 = normalize(cross(orientVCVSOutput, vec3(0.0, 0.0, 1.0)));\n",
                "  } else {\n",
                "    base1 = normalize(cross(orientVCVSOutput, vec3(0.0, 1.0, 0.0)));\n",
                "  }\n",
                "  vec3 base2 = cross(orientVCVSOutput, base1);\n",
                "  eyePos = vec3(dot(eyePos, base1), dot(eyePos, base2), dot(eyePos, orientVCVSOutput)) / radiusVCVSOutput;\n",
                "  eyeDir = vec3(dot(eyeDir, base1), dot(eyeDir, base2), dot(eyeDir, orientVCVSOutput));\n",
                // unit cylinder along z
                "  float halfLength = 0.5 * lengthVCVSOutput / radiusVCVSOutput;\n",
                "  float a = eyeDir.x * eyeDir.x + eyeDir.y * eyeDir.y;\n",
                "  float b = 2.0 * (eyePos.x * eyeDir.x + eyePos.y * eyeDir.y);\n",
                "  float c = eyePos.x * eyePos.x + eyePos.y * eyePos.y - 1.0;\n",
                "  float d = b * b - 4.0 * a * c;\n",
                "  if (d < 0.0) {\n",
                "    discard;\n",
                "  }\n",
                "  float t = (-b - sqrt(d)) / (2.0 * a);\n",
                "  vec3 hit = eyePos + t * eyeDir;\n",
                "  vec3 normalVC;\n",
                "  if (abs(hit.z) > halfLength) {\n",
                // past the side: try the cap facing the eye
                "    float t2 = (-b + sqrt(d)) / (2.0 * a);\n",
                "    float tz2 = eyePos.z + t2 * eyeDir.z;\n",
                "    if (tz2 > halfLength || hit.z < -halfLength) {\n",
                "      discard;\n",
                "    }\n",
                "    normalVC = orientVCVSOutput;\n",
                "    float t3 = (halfLength - eyePos.z) / eyeDir.z;\n",
                "    hit = eyePos + t3 * eyeDir;\n",
                "    vertexVC = vec4(radiusVCVSOutput * (hit.x * base1 + hit.y * base2 + hit.z * orientVCVSOutput) + centerVCVSOutput, 1.0);\n",
                "  } else {\n",
                "    normalVC = hit.x * base1 + hit.y * base2;\n",
                "    vertexVC = vec4(radiusVCVSOutput * (normalVC + hit.z * orientVCVSOutput) + centerVCVSOutput, 1.0);\n",
                "  }\n",
                "  vec4 pos = VCDCMatrix * vertexVC;\n",
                "  gl_FragDepth = pos.z / pos.w;\n",
            ],
        );

        self.base.replace_shader_values(sources, state);
    }
}

#[cfg(test)]
mod tests {
    use strata_glsl::find_markers;

    use super::*;
    use crate::render::packer::BufferDescriptor;
    use crate::render::scene::{DrawMode, Representation};
    use crate::render::shader::{compose, ShaderKey};

    #[test]
    fn stick_varyings_match_between_stages() {
        let d = BufferDescriptor::builder()
            .attribute("vertexMC", 3)
            .attribute("orientMC", 3)
            .attribute("offsetMC", 3)
            .attribute("radiusMC", 1)
            .color(4)
            .build()
            .unwrap();
        let key = ShaderKey {
            draw_mode: DrawMode::Triangles,
            representation: Representation::Surface,
            color_components: 4,
            has_scale: false,
            has_orientation: true,
            picking: false,
        };
        let s = compose(&StickShaderLayer::new(), &ShaderBuildState { key, descriptor: &d });

        for name in ["centerVCVSOutput", "radiusVCVSOutput", "orientVCVSOutput", "lengthVCVSOutput"] {
            assert!(s.vertex.contains(name), "{name} missing from vertex stage");
            assert!(s.fragment.contains(name), "{name} missing from fragment stage");
        }
        assert!(s.vertex.contains("layout(location = 3) in float radiusMC;"));
        assert!(s.vertex.contains("layout(location = 4) in vec4 scalarColor;"));
        assert!(s.vertex.contains("layout(location = 5) out float lengthVCVSOutput;"));
        assert!(s.fragment.contains("layout(location = 5) in float lengthVCVSOutput;"));
        assert!(find_markers(&s.vertex).is_empty());
        assert!(find_markers(&s.fragment).is_empty());
    }
}
