use thiserror::Error;

use strata_glsl::Stage;

use super::packer::LayoutError;

/// Failures of the device-facing half of a mapper.
///
/// Missing input arrays are not errors here: mappers report them through
/// the log and keep drawing their previous buffer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("shader `{label}` failed to compile ({stage:?} stage): {message}")]
    ShaderCompile {
        label: String,
        stage: Stage,
        message: String,
    },

    #[error("device error: {0}")]
    Device(String),
}
