use std::fmt;
use std::sync::Arc;

use crate::data::{DataArray, PolyData};
use crate::pipeline::{Algorithm, PipelineError};
use crate::time::{assign, TimeStamp};

type Formula = Box<dyn Fn([f32; 3]) -> f32>;

/// Evaluates a formula over point coordinates into a new point array.
///
/// Without a formula the input passes through unchanged.
pub struct PointCalculator {
    formula: Option<Formula>,
    result_array_name: String,
    result_as_scalars: bool,
    mtime: TimeStamp,
}

impl Default for PointCalculator {
    fn default() -> Self {
        Self {
            formula: None,
            result_array_name: "Result".to_owned(),
            result_as_scalars: true,
            mtime: TimeStamp::new(),
        }
    }
}

impl fmt::Debug for PointCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointCalculator")
            .field("has_formula", &self.formula.is_some())
            .field("result_array_name", &self.result_array_name)
            .field("result_as_scalars", &self.result_as_scalars)
            .finish()
    }
}

impl PointCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a formula and names its output array.
    ///
    /// Closures cannot be compared, so this always counts as a change.
    pub fn set_formula(
        &mut self,
        result_array_name: impl Into<String>,
        formula: impl Fn([f32; 3]) -> f32 + 'static,
    ) {
        self.formula = Some(Box::new(formula));
        self.result_array_name = result_array_name.into();
        self.mtime.modified();
    }

    pub fn clear_formula(&mut self) {
        if self.formula.take().is_some() {
            self.mtime.modified();
        }
    }

    pub fn result_array_name(&self) -> &str {
        &self.result_array_name
    }

    pub fn set_result_array_name(&mut self, name: impl Into<String>) {
        assign(&mut self.result_array_name, name.into(), &mut self.mtime);
    }

    pub fn result_as_scalars(&self) -> bool {
        self.result_as_scalars
    }

    /// Makes the computed array the output's active scalars.
    pub fn set_result_as_scalars(&mut self, on: bool) {
        assign(&mut self.result_as_scalars, on, &mut self.mtime);
    }
}

impl Algorithm for PointCalculator {
    fn class_name(&self) -> &'static str {
        "PointCalculator"
    }

    fn mtime(&self) -> TimeStamp {
        self.mtime
    }

    fn request_data(&mut self, inputs: &[Arc<PolyData>]) -> Result<Vec<PolyData>, PipelineError> {
        let input = &inputs[0];
        let mut output = PolyData::with_points(Arc::clone(input.points()))?;
        output.pass_point_data(input)?;

        if let Some(formula) = &self.formula {
            let values = (0..input.number_of_points()).map(|i| formula(input.point(i))).collect();
            output.add_array(DataArray::from_scalars(self.result_array_name.as_str(), values))?;
            if self.result_as_scalars {
                output.set_active_scalars(&self.result_array_name)?;
            }
        }
        Ok(vec![output])
    }
}
