//! The few scene attributes a mapper reads.

use bytemuck::{Pod, Zeroable};

/// How an actor's geometry is rasterized.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Representation {
    Points,
    Wireframe,
    #[default]
    Surface,
}

/// Primitive topology of a draw.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DrawMode {
    Points,
    Lines,
    Triangles,
}

/// Per-actor state consulted when choosing a program.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ActorState {
    pub representation: Representation,
}

/// Per-pass state.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RenderState {
    /// Render mapper ids instead of shaded color.
    pub picking: bool,
}

// ── uniforms ──────────────────────────────────────────────────────────────

/// The uniform block shared by every mapper program (std140).
///
/// Matrices are column-major. The caller computes them; no camera math
/// happens here.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MapperUniforms {
    /// Model coordinates to view coordinates.
    pub mcvc: [[f32; 4]; 4],
    /// View coordinates to device coordinates.
    pub vcdc: [[f32; 4]; 4],
    /// mat3 columns, each padded to 16 bytes.
    pub normal_matrix: [[f32; 4]; 3],
    pub diffuse_color: [f32; 4],
    /// Picking color; only `rgb` is read.
    pub mapper_index: [f32; 4],
    pub camera_parallel: i32,
    pub _pad: [i32; 3], // 16-byte alignment
}

const IDENTITY4: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

impl Default for MapperUniforms {
    fn default() -> Self {
        Self {
            mcvc: IDENTITY4,
            vcdc: IDENTITY4,
            normal_matrix: [[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0]],
            diffuse_color: [1.0, 1.0, 1.0, 1.0],
            mapper_index: [0.0; 4],
            camera_parallel: 0,
            _pad: [0; 3],
        }
    }
}

impl MapperUniforms {
    pub fn new(mcvc: [[f32; 4]; 4], vcdc: [[f32; 4]; 4]) -> Self {
        Self { mcvc, vcdc, ..Self::default() }
    }

    pub fn with_normal_matrix(mut self, m: [[f32; 3]; 3]) -> Self {
        self.normal_matrix = m.map(|c| [c[0], c[1], c[2], 0.0]);
        self
    }

    pub fn with_diffuse_color(mut self, rgba: [f32; 4]) -> Self {
        self.diffuse_color = rgba;
        self
    }

    pub fn with_mapper_index(mut self, rgb: [f32; 3]) -> Self {
        self.mapper_index = [rgb[0], rgb[1], rgb[2], 1.0];
        self
    }

    pub fn with_parallel_projection(mut self, parallel: bool) -> Self {
        self.camera_parallel = i32::from(parallel);
        self
    }
}
