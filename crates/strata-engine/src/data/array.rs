use super::DataError;

/// Numeric type of the values stored in an array.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Float32,
    Uint8,
}

/// Backing storage of a [`DataArray`].
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayValues {
    Float32(Vec<f32>),
    Uint8(Vec<u8>),
}

impl ArrayValues {
    pub fn len(&self) -> usize {
        match self {
            ArrayValues::Float32(v) => v.len(),
            ArrayValues::Uint8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn scalar_type(&self) -> ScalarType {
        match self {
            ArrayValues::Float32(_) => ScalarType::Float32,
            ArrayValues::Uint8(_) => ScalarType::Uint8,
        }
    }
}

/// A named sequence of fixed-arity numeric tuples.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    name: String,
    components: usize,
    values: ArrayValues,
}

impl DataArray {
    /// Creates an array, validating that `values` splits evenly into tuples.
    pub fn new(
        name: impl Into<String>,
        components: usize,
        values: ArrayValues,
    ) -> Result<Self, DataError> {
        let name = name.into();
        if components == 0 {
            return Err(DataError::NoComponents { name });
        }
        if values.len() % components != 0 {
            return Err(DataError::RaggedArray { name, len: values.len(), components });
        }
        Ok(Self { name, components, values })
    }

    pub fn from_f32(
        name: impl Into<String>,
        components: usize,
        values: Vec<f32>,
    ) -> Result<Self, DataError> {
        Self::new(name, components, ArrayValues::Float32(values))
    }

    pub fn from_u8(
        name: impl Into<String>,
        components: usize,
        values: Vec<u8>,
    ) -> Result<Self, DataError> {
        Self::new(name, components, ArrayValues::Uint8(values))
    }

    /// Builds a 3-component float array from coordinate triples.
    pub fn from_vec3(name: impl Into<String>, tuples: &[[f32; 3]]) -> Self {
        Self {
            name: name.into(),
            components: 3,
            values: ArrayValues::Float32(tuples.iter().flatten().copied().collect()),
        }
    }

    /// Builds a single-component float array.
    pub fn from_scalars(name: impl Into<String>, scalars: Vec<f32>) -> Self {
        Self { name: name.into(), components: 1, values: ArrayValues::Float32(scalars) }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn components(&self) -> usize {
        self.components
    }

    #[inline]
    pub fn tuple_count(&self) -> usize {
        self.values.len() / self.components
    }

    #[inline]
    pub fn values(&self) -> &ArrayValues {
        &self.values
    }

    #[inline]
    pub fn scalar_type(&self) -> ScalarType {
        self.values.scalar_type()
    }

    pub fn as_f32(&self) -> Option<&[f32]> {
        match &self.values {
            ArrayValues::Float32(v) => Some(v),
            ArrayValues::Uint8(_) => None,
        }
    }

    pub fn as_u8(&self) -> Option<&[u8]> {
        match &self.values {
            ArrayValues::Uint8(v) => Some(v),
            ArrayValues::Float32(_) => None,
        }
    }

    /// Reads one component as `f32`. Panics when out of range.
    #[inline]
    pub fn component(&self, tuple: usize, component: usize) -> f32 {
        debug_assert!(component < self.components);
        let idx = tuple * self.components + component;
        match &self.values {
            ArrayValues::Float32(v) => v[idx],
            ArrayValues::Uint8(v) => f32::from(v[idx]),
        }
    }

    /// Euclidean norm of one tuple.
    pub fn magnitude(&self, tuple: usize) -> f32 {
        (0..self.components)
            .map(|c| {
                let v = self.component(tuple, c);
                v * v
            })
            .sum::<f32>()
            .sqrt()
    }

    /// Returns a copy of this array under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self { name: name.into(), ..self.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ragged_values() {
        let err = DataArray::from_f32("v", 3, vec![0.0; 4]).unwrap_err();
        assert_eq!(err, DataError::RaggedArray { name: "v".into(), len: 4, components: 3 });
    }

    #[test]
    fn rejects_zero_components() {
        assert!(matches!(
            DataArray::from_u8("c", 0, vec![]),
            Err(DataError::NoComponents { .. })
        ));
    }

    #[test]
    fn component_reads_both_types() {
        let f = DataArray::from_f32("f", 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(f.tuple_count(), 2);
        assert_eq!(f.component(1, 0), 3.0);

        let u = DataArray::from_u8("u", 3, vec![0, 128, 255]).unwrap();
        assert_eq!(u.component(0, 2), 255.0);
        assert_eq!(u.scalar_type(), ScalarType::Uint8);
    }

    #[test]
    fn magnitude_of_tuple() {
        let a = DataArray::from_vec3("v", &[[3.0, 4.0, 0.0]]);
        assert_eq!(a.magnitude(0), 5.0);
    }
}
