use std::sync::Arc;

use crate::time::TimeStamp;

use super::{DataArray, DataError, ScalarType};

/// Named per-point arrays of one [`PolyData`].
///
/// Every array holds exactly one tuple per point; the owning `PolyData`
/// enforces this on insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointData {
    arrays: Vec<Arc<DataArray>>,
    active_scalars: Option<String>,
}

impl PointData {
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    pub fn has_array(&self, name: &str) -> bool {
        self.array(name).is_some()
    }

    pub fn array(&self, name: &str) -> Option<&Arc<DataArray>> {
        self.arrays.iter().find(|a| a.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<DataArray>> {
        self.arrays.iter()
    }

    /// Name of the array designated as the default scalars, if any.
    pub fn active_scalars_name(&self) -> Option<&str> {
        self.active_scalars.as_deref()
    }

    /// The default scalars array, if one is designated and present.
    pub fn scalars(&self) -> Option<&Arc<DataArray>> {
        self.active_scalars.as_deref().and_then(|name| self.array(name))
    }

    fn insert(&mut self, array: Arc<DataArray>) {
        match self.arrays.iter_mut().find(|a| a.name() == array.name()) {
            Some(slot) => *slot = array,
            None => self.arrays.push(array),
        }
    }

    fn remove(&mut self, name: &str) -> Option<Arc<DataArray>> {
        let idx = self.arrays.iter().position(|a| a.name() == name)?;
        if self.active_scalars.as_deref() == Some(name) {
            self.active_scalars = None;
        }
        Some(self.arrays.remove(idx))
    }
}

/// A point snapshot: coordinates plus per-point attribute arrays.
///
/// Snapshots stored in pipeline ports are shared read-only; producing nodes
/// build a new `PolyData` on every execution.
#[derive(Debug, Clone)]
pub struct PolyData {
    points: Arc<DataArray>,
    point_data: PointData,
    mtime: TimeStamp,
}

impl PolyData {
    /// An empty snapshot with zero points.
    pub fn new() -> Self {
        Self::from_points(&[])
    }

    pub fn from_points(points: &[[f32; 3]]) -> Self {
        Self {
            points: Arc::new(DataArray::from_vec3("Points", points)),
            point_data: PointData::default(),
            mtime: TimeStamp::modified_now(),
        }
    }

    /// Wraps an existing coordinate array, which must be 3-component float32.
    pub fn with_points(points: Arc<DataArray>) -> Result<Self, DataError> {
        if points.components() != 3 || points.scalar_type() != ScalarType::Float32 {
            return Err(DataError::InvalidPoints { name: points.name().to_owned() });
        }
        Ok(Self {
            points,
            point_data: PointData::default(),
            mtime: TimeStamp::modified_now(),
        })
    }

    #[inline]
    pub fn number_of_points(&self) -> usize {
        self.points.tuple_count()
    }

    #[inline]
    pub fn points(&self) -> &Arc<DataArray> {
        &self.points
    }

    /// Flat `xyz xyz ...` coordinates.
    pub fn coordinates(&self) -> &[f32] {
        self.points.as_f32().unwrap_or(&[])
    }

    pub fn point(&self, index: usize) -> [f32; 3] {
        let c = self.coordinates();
        let i = index * 3;
        [c[i], c[i + 1], c[i + 2]]
    }

    #[inline]
    pub fn point_data(&self) -> &PointData {
        &self.point_data
    }

    /// Stamp taken when this snapshot was produced.
    #[inline]
    pub fn mtime(&self) -> TimeStamp {
        self.mtime
    }

    /// Attaches (or replaces) a per-point array.
    pub fn add_array(&mut self, array: impl Into<Arc<DataArray>>) -> Result<(), DataError> {
        let array = array.into();
        let expected = self.number_of_points();
        if array.tuple_count() != expected {
            return Err(DataError::TupleCountMismatch {
                name: array.name().to_owned(),
                expected,
                found: array.tuple_count(),
            });
        }
        self.point_data.insert(array);
        self.mtime.modified();
        Ok(())
    }

    pub fn remove_array(&mut self, name: &str) -> Option<Arc<DataArray>> {
        let removed = self.point_data.remove(name);
        if removed.is_some() {
            self.mtime.modified();
        }
        removed
    }

    /// Designates an existing array as the default scalars.
    pub fn set_active_scalars(&mut self, name: &str) -> Result<(), DataError> {
        if !self.point_data.has_array(name) {
            return Err(DataError::UnknownArray { name: name.to_owned() });
        }
        self.point_data.active_scalars = Some(name.to_owned());
        self.mtime.modified();
        Ok(())
    }

    /// Copies the arrays of `other` onto this snapshot (shared, not cloned).
    ///
    /// Used by filters that keep the point count and pass attributes through.
    pub fn pass_point_data(&mut self, other: &PolyData) -> Result<(), DataError> {
        for array in other.point_data.iter() {
            self.add_array(Arc::clone(array))?;
        }
        if let Some(name) = other.point_data.active_scalars_name() {
            self.set_active_scalars(name)?;
        }
        Ok(())
    }

    /// Re-stamps the snapshot as produced now.
    pub(crate) fn touch(&mut self) {
        self.mtime.modified();
    }
}

impl Default for PolyData {
    fn default() -> Self {
        Self::new()
    }
}
