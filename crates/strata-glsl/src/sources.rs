use crate::substitute::{Replacement, strip_markers, substitute};

/// Programmable stage a source body belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Stage {
    Vertex,
    Fragment,
    Geometry,
}

/// The source bodies of one shader program.
///
/// `geometry` is empty for programs without a geometry stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
    pub geometry: String,
}

impl ShaderSources {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self { vertex: vertex.into(), fragment: fragment.into(), geometry: String::new() }
    }

    pub fn stage(&self, stage: Stage) -> &str {
        match stage {
            Stage::Vertex => &self.vertex,
            Stage::Fragment => &self.fragment,
            Stage::Geometry => &self.geometry,
        }
    }

    pub fn stage_mut(&mut self, stage: Stage) -> &mut String {
        match stage {
            Stage::Vertex => &mut self.vertex,
            Stage::Fragment => &mut self.fragment,
            Stage::Geometry => &mut self.geometry,
        }
    }

    /// Substitutes the first occurrence of `marker` in one stage in place.
    ///
    /// Returns whether the marker was found.
    pub fn replace<R: Replacement + ?Sized>(
        &mut self,
        stage: Stage,
        marker: &str,
        replacement: &R,
    ) -> bool {
        let body = self.stage_mut(stage);
        let out = substitute(body, marker, replacement);
        if out.replaced {
            *body = out.result;
        }
        out.replaced
    }

    /// Removes unclaimed markers from every stage.
    pub fn strip_markers(&mut self) {
        for stage in [Stage::Vertex, Stage::Fragment, Stage::Geometry] {
            let body = self.stage_mut(stage);
            *body = strip_markers(body);
        }
    }

    pub fn has_geometry_stage(&self) -> bool {
        !self.geometry.trim().is_empty()
    }
}
