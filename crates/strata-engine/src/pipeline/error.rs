use std::fmt;

use thiserror::Error;

use crate::data::DataError;

use super::NodeId;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PortDirection {
    Input,
    Output,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortDirection::Input => f.write_str("input"),
            PortDirection::Output => f.write_str("output"),
        }
    }
}

/// Wiring and execution failures.
///
/// Wiring errors are raised synchronously by the connecting call. Execution
/// errors are local to the failing node: it keeps its previous outputs and
/// stamp, so every consumer stays stale.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("{node} does not belong to this pipeline")]
    UnknownNode { node: NodeId },

    #[error("{node} has no {direction} port {index} ({available} available)")]
    InvalidPort { node: NodeId, direction: PortDirection, index: usize, available: usize },

    #[error("connecting {producer} into {consumer} would create a cycle")]
    Cycle { consumer: NodeId, producer: NodeId },

    #[error("{class} ({node}) input port {port} is not connected")]
    MissingInput { node: NodeId, class: &'static str, port: usize },

    #[error("{class}: required point array `{name}` not found")]
    MissingArray { class: &'static str, name: String },

    #[error("{class} produced {found} outputs, expected {expected}")]
    OutputCount { class: &'static str, expected: usize, found: usize },

    #[error(transparent)]
    Data(#[from] DataError),
}
