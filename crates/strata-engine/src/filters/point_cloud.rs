use std::sync::Arc;

use crate::data::{DataArray, PolyData};
use crate::pipeline::{Algorithm, PipelineError};
use crate::time::{assign, TimeStamp};

/// Source publishing caller-supplied points and point arrays.
///
/// Arrays are validated against the point count when the source executes,
/// so points and arrays can be replaced in any order between updates.
#[derive(Debug, Default)]
pub struct PointCloudSource {
    points: Vec<[f32; 3]>,
    arrays: Vec<Arc<DataArray>>,
    active_scalars: Option<String>,
    mtime: TimeStamp,
}

impl PointCloudSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_points(points: Vec<[f32; 3]>) -> Self {
        Self { points, ..Self::default() }
    }

    pub fn points(&self) -> &[[f32; 3]] {
        &self.points
    }

    pub fn set_points(&mut self, points: Vec<[f32; 3]>) {
        assign(&mut self.points, points, &mut self.mtime);
    }

    /// Adds or replaces a point array by name.
    pub fn add_array(&mut self, array: DataArray) {
        match self.arrays.iter_mut().find(|a| a.name() == array.name()) {
            Some(slot) if **slot == array => return,
            Some(slot) => *slot = Arc::new(array),
            None => self.arrays.push(Arc::new(array)),
        }
        self.mtime.modified();
    }

    pub fn remove_array(&mut self, name: &str) {
        let before = self.arrays.len();
        self.arrays.retain(|a| a.name() != name);
        if self.arrays.len() != before {
            self.mtime.modified();
        }
    }

    pub fn active_scalars(&self) -> Option<&str> {
        self.active_scalars.as_deref()
    }

    pub fn set_active_scalars(&mut self, name: Option<&str>) {
        assign(&mut self.active_scalars, name.map(str::to_owned), &mut self.mtime);
    }
}

impl Algorithm for PointCloudSource {
    fn class_name(&self) -> &'static str {
        "PointCloudSource"
    }

    fn input_ports(&self) -> usize {
        0
    }

    fn mtime(&self) -> TimeStamp {
        self.mtime
    }

    fn request_data(&mut self, _inputs: &[Arc<PolyData>]) -> Result<Vec<PolyData>, PipelineError> {
        let mut output = PolyData::from_points(&self.points);
        for array in &self.arrays {
            output.add_array(Arc::clone(array))?;
        }
        if let Some(name) = &self.active_scalars {
            output.set_active_scalars(name)?;
        }
        Ok(vec![output])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataError;

    #[test]
    fn publishes_points_and_arrays() {
        let mut src = PointCloudSource::with_points(vec![[0.0; 3], [1.0; 3]]);
        src.add_array(DataArray::from_scalars("s", vec![0.5, 1.5]));
        src.set_active_scalars(Some("s"));

        let out = src.request_data(&[]).unwrap().remove(0);
        assert_eq!(out.number_of_points(), 2);
        assert_eq!(out.point_data().scalars().unwrap().component(1, 0), 1.5);
    }

    #[test]
    fn mismatched_array_fails_execution() {
        let mut src = PointCloudSource::with_points(vec![[0.0; 3]]);
        src.add_array(DataArray::from_scalars("s", vec![0.5, 1.5]));
        let err = src.request_data(&[]).unwrap_err();
        assert!(matches!(err, PipelineError::Data(DataError::TupleCountMismatch { .. })));
    }

    #[test]
    fn identical_array_does_not_touch() {
        let mut src = PointCloudSource::with_points(vec![[0.0; 3]]);
        src.add_array(DataArray::from_scalars("s", vec![1.0]));
        let stamp = src.mtime();
        src.add_array(DataArray::from_scalars("s", vec![1.0]));
        src.set_points(vec![[0.0; 3]]);
        assert_eq!(src.mtime(), stamp);

        src.remove_array("missing");
        assert_eq!(src.mtime(), stamp);
        src.remove_array("s");
        assert!(src.mtime() > stamp);
    }
}
