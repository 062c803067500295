use std::any::Any;
use std::sync::Arc;

use crate::data::PolyData;
use crate::time::TimeStamp;

use super::PipelineError;

/// Type-erasure helper so the pipeline can hand out typed node references.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A pipeline node's behaviour.
///
/// Variants differ only in their port counts:
/// - source: no inputs, one or more outputs
/// - filter: N inputs, M outputs
/// - mapper: one input, no outputs (its product is device state)
pub trait Algorithm: AsAny {
    /// Human-readable class name for diagnostics.
    fn class_name(&self) -> &'static str;

    fn input_ports(&self) -> usize {
        1
    }

    fn output_ports(&self) -> usize {
        1
    }

    /// Stamp of the last parameter change.
    ///
    /// Setters must advance it only when a value actually changes.
    fn mtime(&self) -> TimeStamp;

    /// Recompute step.
    ///
    /// `inputs` holds one snapshot per input port, all current. Must return
    /// exactly `output_ports()` new snapshots. Inputs are shared and must not
    /// be modified; build new objects instead.
    fn request_data(&mut self, inputs: &[Arc<PolyData>]) -> Result<Vec<PolyData>, PipelineError>;
}
