use std::sync::Arc;

use crate::data::{DataArray, PolyData, ScalarType};
use crate::pipeline::{Algorithm, PipelineError};
use crate::time::{assign, TimeStamp};

/// Name of the per-point normal array honoured when `use_normal` is off.
pub const NORMALS_ARRAY: &str = "Normals";

/// Displaces every point along a normal, scaled by a per-point scalar.
///
/// `p' = p + scale_factor * s * n`, where `s` is the point's scalar (or its z
/// coordinate in xy-plane mode) and `n` is either the filter's normal or the
/// input's per-point `Normals`. The point count never changes and all point
/// arrays pass through unchanged.
#[derive(Debug)]
pub struct WarpScalar {
    scale_factor: f32,
    use_normal: bool,
    normal: [f32; 3],
    xy_plane: bool,
    scalars_array: Option<String>,
    mtime: TimeStamp,
}

impl Default for WarpScalar {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            use_normal: false,
            normal: [0.0, 0.0, 1.0],
            xy_plane: false,
            scalars_array: None,
            mtime: TimeStamp::new(),
        }
    }
}

impl WarpScalar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        assign(&mut self.scale_factor, scale_factor, &mut self.mtime);
    }

    pub fn use_normal(&self) -> bool {
        self.use_normal
    }

    /// Forces the filter normal even when the input carries `Normals`.
    pub fn set_use_normal(&mut self, use_normal: bool) {
        assign(&mut self.use_normal, use_normal, &mut self.mtime);
    }

    pub fn normal(&self) -> [f32; 3] {
        self.normal
    }

    pub fn set_normal(&mut self, normal: [f32; 3]) {
        assign(&mut self.normal, normal, &mut self.mtime);
    }

    pub fn xy_plane(&self) -> bool {
        self.xy_plane
    }

    /// Uses each point's z coordinate as its scalar.
    pub fn set_xy_plane(&mut self, xy_plane: bool) {
        assign(&mut self.xy_plane, xy_plane, &mut self.mtime);
    }

    pub fn scalars_array(&self) -> Option<&str> {
        self.scalars_array.as_deref()
    }

    /// Names the scalar array to warp by; `None` uses the active scalars.
    pub fn set_scalars_array(&mut self, name: Option<&str>) {
        assign(&mut self.scalars_array, name.map(str::to_owned), &mut self.mtime);
    }

    fn resolve_scalars<'a>(&self, input: &'a PolyData) -> Option<&'a Arc<DataArray>> {
        match &self.scalars_array {
            Some(name) => input.point_data().array(name),
            None => input.point_data().scalars(),
        }
    }
}

impl Algorithm for WarpScalar {
    fn class_name(&self) -> &'static str {
        "WarpScalar"
    }

    fn mtime(&self) -> TimeStamp {
        self.mtime
    }

    fn request_data(&mut self, inputs: &[Arc<PolyData>]) -> Result<Vec<PolyData>, PipelineError> {
        let input = &inputs[0];
        let count = input.number_of_points();

        let scalars = if self.xy_plane { None } else { self.resolve_scalars(input) };
        if !self.xy_plane && scalars.is_none() && count > 0 {
            return Err(PipelineError::MissingArray {
                class: self.class_name(),
                name: self.scalars_array.clone().unwrap_or_else(|| "<active scalars>".into()),
            });
        }

        let normals = if self.use_normal {
            None
        } else {
            input
                .point_data()
                .array(NORMALS_ARRAY)
                .filter(|a| a.components() == 3 && a.scalar_type() == ScalarType::Float32)
        };

        let warped: Vec<[f32; 3]> = (0..count)
            .map(|i| {
                let p = input.point(i);
                let s = match scalars {
                    Some(array) => array.component(i, 0),
                    None => p[2],
                };
                let n = match normals {
                    Some(array) => {
                        [array.component(i, 0), array.component(i, 1), array.component(i, 2)]
                    }
                    None => self.normal,
                };
                let k = self.scale_factor * s;
                [p[0] + k * n[0], p[1] + k * n[1], p[2] + k * n[2]]
            })
            .collect();

        let mut output = PolyData::from_points(&warped);
        output.pass_point_data(input)?;
        Ok(vec![output])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_with_scalars(scalars: Vec<f32>) -> Arc<PolyData> {
        let pts: Vec<[f32; 3]> = (0..scalars.len()).map(|i| [i as f32, 0.0, 1.0]).collect();
        let mut pd = PolyData::from_points(&pts);
        pd.add_array(DataArray::from_scalars("h", scalars)).unwrap();
        pd.set_active_scalars("h").unwrap();
        Arc::new(pd)
    }

    fn run(filter: &mut WarpScalar, input: Arc<PolyData>) -> PolyData {
        filter.request_data(&[input]).unwrap().remove(0)
    }

    #[test]
    fn defaults() {
        let w = WarpScalar::new();
        assert_eq!(w.scale_factor(), 1.0);
        assert!(!w.use_normal());
        assert!(!w.xy_plane());
        assert_eq!(w.normal(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn set_scale_factor_touches_once() {
        let mut w = WarpScalar::new();
        w.set_scale_factor(2.5);
        assert_eq!(w.scale_factor(), 2.5);
        let stamp = w.mtime();
        w.set_scale_factor(2.5);
        assert_eq!(w.mtime(), stamp);
    }

    #[test]
    fn warps_along_normal_and_keeps_point_count() {
        let mut w = WarpScalar::new();
        w.set_scale_factor(2.0);
        let out = run(&mut w, input_with_scalars(vec![0.5, -1.0]));
        assert_eq!(out.number_of_points(), 2);
        assert_eq!(out.point(0), [0.0, 0.0, 2.0]);
        assert_eq!(out.point(1), [1.0, 0.0, -1.0]);
        assert!(out.point_data().has_array("h"));
    }

    #[test]
    fn xy_plane_uses_z_as_scalar() {
        let mut w = WarpScalar::new();
        w.set_xy_plane(true);
        let pd = Arc::new(PolyData::from_points(&[[0.0, 0.0, 3.0]]));
        assert_eq!(run(&mut w, pd).point(0), [0.0, 0.0, 6.0]);
    }

    #[test]
    fn per_point_normals_unless_forced() {
        let mut pd = PolyData::from_points(&[[0.0; 3]]);
        pd.add_array(DataArray::from_scalars("h", vec![1.0])).unwrap();
        pd.add_array(DataArray::from_vec3(NORMALS_ARRAY, &[[1.0, 0.0, 0.0]])).unwrap();
        let pd = Arc::new(pd);

        let mut w = WarpScalar::new();
        w.set_scalars_array(Some("h"));
        assert_eq!(run(&mut w, Arc::clone(&pd)).point(0), [1.0, 0.0, 0.0]);

        w.set_use_normal(true);
        assert_eq!(run(&mut w, pd).point(0), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn missing_scalars_is_an_error() {
        let mut w = WarpScalar::new();
        let pd = Arc::new(PolyData::from_points(&[[0.0; 3]]));
        assert!(matches!(
            w.request_data(&[pd]),
            Err(PipelineError::MissingArray { class: "WarpScalar", .. })
        ));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let mut w = WarpScalar::new();
        let out = run(&mut w, Arc::new(PolyData::new()));
        assert_eq!(out.number_of_points(), 0);
    }
}
