//! Scalar-to-color mapping.

use std::sync::Arc;

use crate::data::{DataArray, PolyData, ScalarType};
use crate::time::{assign, TimeStamp};

/// Number of entries in a [`LookupTable`].
pub const TABLE_SIZE: usize = 256;

// ── lookup table ──────────────────────────────────────────────────────────

/// A 256-entry RGBA ramp built from HSVA ranges.
///
/// The default ramp runs from blue (hue 0.667) to red (hue 0).
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable {
    hue_range: [f32; 2],
    saturation_range: [f32; 2],
    value_range: [f32; 2],
    alpha_range: [f32; 2],
    table: Vec<[u8; 4]>,
}

impl Default for LookupTable {
    fn default() -> Self {
        Self::from_ranges([0.667, 0.0], [1.0, 1.0], [1.0, 1.0], [1.0, 1.0])
    }
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ranges(
        hue_range: [f32; 2],
        saturation_range: [f32; 2],
        value_range: [f32; 2],
        alpha_range: [f32; 2],
    ) -> Self {
        let mut lut = Self {
            hue_range,
            saturation_range,
            value_range,
            alpha_range,
            table: Vec::new(),
        };
        lut.build();
        lut
    }

    pub fn hue_range(&self) -> [f32; 2] {
        self.hue_range
    }

    pub fn saturation_range(&self) -> [f32; 2] {
        self.saturation_range
    }

    pub fn value_range(&self) -> [f32; 2] {
        self.value_range
    }

    pub fn alpha_range(&self) -> [f32; 2] {
        self.alpha_range
    }

    pub fn entries(&self) -> &[[u8; 4]] {
        &self.table
    }

    /// Maps `value` within `range` to a table entry.
    ///
    /// Values outside the range clamp to the end entries; a degenerate range
    /// maps everything to the first entry.
    pub fn map_value(&self, value: f32, range: [f32; 2]) -> [u8; 4] {
        let [lo, hi] = range;
        let t = if hi > lo { (value - lo) / (hi - lo) } else { 0.0 };
        // NaN saturates to 0 in the cast.
        let index = (t * TABLE_SIZE as f32) as usize;
        self.table[index.min(TABLE_SIZE - 1)]
    }

    fn build(&mut self) {
        let last = (TABLE_SIZE - 1) as f32;
        self.table = (0..TABLE_SIZE)
            .map(|i| {
                let t = i as f32 / last;
                let h = lerp(self.hue_range, t);
                let s = lerp(self.saturation_range, t);
                let v = lerp(self.value_range, t);
                let a = lerp(self.alpha_range, t);
                let [r, g, b] = hsv_to_rgb(h, s, v);
                [to_byte(r), to_byte(g), to_byte(b), to_byte(a)]
            })
            .collect();
    }
}

fn lerp([a, b]: [f32; 2], t: f32) -> f32 {
    a + (b - a) * t
}

fn to_byte(x: f32) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let h = h.rem_euclid(1.0) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector as u32 {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

// ── color mapping ─────────────────────────────────────────────────────────

/// When an array is mapped through the lookup table.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// `Uint8` arrays with 3 or 4 components are colors already; everything
    /// else is mapped.
    #[default]
    Default,
    /// Always map through the lookup table.
    MapScalars,
    /// Never map; only `Uint8` arrays produce colors.
    Direct,
}

/// Per-point RGB or RGBA bytes ready for packing.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedColors {
    components: usize,
    values: Vec<u8>,
}

impl MappedColors {
    /// 3 or 4.
    pub fn components(&self) -> usize {
        self.components
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn color(&self, point: usize) -> &[u8] {
        let start = point * self.components;
        &self.values[start..start + self.components]
    }
}

/// Scalar coloring settings carried by every mapper.
#[derive(Debug, Clone)]
pub struct ColorMapping {
    scalar_visibility: bool,
    color_by: Option<String>,
    scalar_range: [f32; 2],
    color_mode: ColorMode,
    lookup_table: LookupTable,
    mtime: TimeStamp,
}

impl Default for ColorMapping {
    fn default() -> Self {
        Self {
            scalar_visibility: true,
            color_by: None,
            scalar_range: [0.0, 1.0],
            color_mode: ColorMode::Default,
            lookup_table: LookupTable::default(),
            mtime: TimeStamp::new(),
        }
    }
}

impl ColorMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mtime(&self) -> TimeStamp {
        self.mtime
    }

    pub fn scalar_visibility(&self) -> bool {
        self.scalar_visibility
    }

    pub fn set_scalar_visibility(&mut self, visible: bool) {
        assign(&mut self.scalar_visibility, visible, &mut self.mtime);
    }

    pub fn color_by(&self) -> Option<&str> {
        self.color_by.as_deref()
    }

    /// Names the array to color by; `None` uses the active scalars.
    pub fn set_color_by(&mut self, name: Option<&str>) {
        assign(&mut self.color_by, name.map(str::to_owned), &mut self.mtime);
    }

    pub fn scalar_range(&self) -> [f32; 2] {
        self.scalar_range
    }

    pub fn set_scalar_range(&mut self, range: [f32; 2]) {
        assign(&mut self.scalar_range, range, &mut self.mtime);
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        assign(&mut self.color_mode, mode, &mut self.mtime);
    }

    pub fn lookup_table(&self) -> &LookupTable {
        &self.lookup_table
    }

    pub fn set_lookup_table(&mut self, lut: LookupTable) {
        assign(&mut self.lookup_table, lut, &mut self.mtime);
    }

    /// Produces per-point colors for `data`, or `None` when nothing is
    /// colored.
    pub fn map_scalars(&self, data: &PolyData) -> Option<MappedColors> {
        if !self.scalar_visibility {
            return None;
        }
        let array = self.source_array(data)?;
        let direct = array.scalar_type() == ScalarType::Uint8;
        match self.color_mode {
            ColorMode::Default if direct && matches!(array.components(), 3 | 4) => {
                Some(direct_colors(array))
            }
            ColorMode::Direct if direct => Some(direct_colors(array)),
            ColorMode::Direct => None,
            ColorMode::Default | ColorMode::MapScalars => Some(self.mapped_colors(array)),
        }
    }

    fn source_array<'a>(&self, data: &'a PolyData) -> Option<&'a Arc<DataArray>> {
        let array = match &self.color_by {
            Some(name) => data.point_data().array(name),
            None => data.point_data().scalars(),
        };
        if array.is_none() {
            if let Some(name) = &self.color_by {
                log::debug!("color array `{name}` not present; drawing without scalar colors");
            }
        }
        array
    }

    fn mapped_colors(&self, array: &DataArray) -> MappedColors {
        let n = array.tuple_count();
        let mut values = Vec::with_capacity(n * 4);
        for i in 0..n {
            let v = if array.components() == 1 { array.component(i, 0) } else { array.magnitude(i) };
            values.extend_from_slice(&self.lookup_table.map_value(v, self.scalar_range));
        }
        MappedColors { components: 4, values }
    }
}

/// Uses `Uint8` tuples as colors; 1 and 2 component arrays become gray and
/// gray-alpha.
fn direct_colors(array: &DataArray) -> MappedColors {
    let bytes = array.as_u8().unwrap_or(&[]);
    match array.components() {
        3 | 4 => MappedColors { components: array.components(), values: bytes.to_vec() },
        1 => MappedColors {
            components: 3,
            values: bytes.iter().flat_map(|&g| [g, g, g]).collect(),
        },
        2 => MappedColors {
            components: 4,
            values: bytes.chunks_exact(2).flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]]).collect(),
        },
        // More than four components: keep the first four.
        c => MappedColors {
            components: 4,
            values: bytes.chunks_exact(c).flat_map(|t| [t[0], t[1], t[2], t[3]]).collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_with(array: DataArray) -> PolyData {
        let n = array.tuple_count();
        let pts: Vec<[f32; 3]> = (0..n).map(|i| [i as f32, 0.0, 0.0]).collect();
        let mut pd = PolyData::from_points(&pts);
        let name = array.name().to_owned();
        pd.add_array(array).unwrap();
        pd.set_active_scalars(&name).unwrap();
        pd
    }

    #[test]
    fn default_table_runs_blue_to_red() {
        let lut = LookupTable::default();
        assert_eq!(lut.entries().len(), TABLE_SIZE);
        let first = lut.entries()[0];
        let last = lut.entries()[TABLE_SIZE - 1];
        assert!(first[2] > 250 && first[0] < 5, "{first:?}");
        assert_eq!(last, [255, 0, 0, 255]);
    }

    #[test]
    fn map_value_clamps() {
        let lut = LookupTable::default();
        assert_eq!(lut.map_value(-5.0, [0.0, 1.0]), lut.entries()[0]);
        assert_eq!(lut.map_value(5.0, [0.0, 1.0]), lut.entries()[TABLE_SIZE - 1]);
        assert_eq!(lut.map_value(1.0, [1.0, 1.0]), lut.entries()[0]);
    }

    #[test]
    fn uint8_rgb_is_used_directly() {
        let pd = data_with(DataArray::from_u8("rgb", 3, vec![10, 20, 30, 40, 50, 60]).unwrap());
        let colors = ColorMapping::new().map_scalars(&pd).unwrap();
        assert_eq!(colors.components(), 3);
        assert_eq!(colors.color(1), &[40, 50, 60]);
    }

    #[test]
    fn float_scalars_are_mapped_to_rgba() {
        let pd = data_with(DataArray::from_scalars("t", vec![0.0, 1.0]));
        let colors = ColorMapping::new().map_scalars(&pd).unwrap();
        assert_eq!(colors.components(), 4);
        assert_eq!(colors.color(1), &[255, 0, 0, 255]);
    }

    #[test]
    fn vectors_map_by_magnitude() {
        let pd = data_with(DataArray::from_vec3("v", &[[0.6, 0.8, 0.0]]));
        let mut mapping = ColorMapping::new();
        mapping.set_scalar_range([0.0, 1.0]);
        let colors = mapping.map_scalars(&pd).unwrap();
        assert_eq!(colors.color(0), &[255, 0, 0, 255]);
    }

    #[test]
    fn modes_and_visibility() {
        let floats = data_with(DataArray::from_scalars("t", vec![0.5]));
        let bytes = data_with(DataArray::from_u8("rgb", 3, vec![1, 2, 3]).unwrap());

        let mut mapping = ColorMapping::new();
        mapping.set_color_mode(ColorMode::Direct);
        assert!(mapping.map_scalars(&floats).is_none());
        assert_eq!(mapping.map_scalars(&bytes).unwrap().values(), &[1, 2, 3]);

        mapping.set_color_mode(ColorMode::MapScalars);
        assert_eq!(mapping.map_scalars(&bytes).unwrap().components(), 4);

        mapping.set_scalar_visibility(false);
        assert!(mapping.map_scalars(&bytes).is_none());
    }

    #[test]
    fn color_by_missing_array_gives_no_color() {
        let pd = data_with(DataArray::from_scalars("t", vec![0.5]));
        let mut mapping = ColorMapping::new();
        mapping.set_color_by(Some("absent"));
        assert!(mapping.map_scalars(&pd).is_none());
    }

    #[test]
    fn setters_touch_only_on_change() {
        let mut mapping = ColorMapping::new();
        mapping.set_scalar_range([0.0, 2.0]);
        let stamp = mapping.mtime();
        mapping.set_scalar_range([0.0, 2.0]);
        mapping.set_lookup_table(LookupTable::default());
        assert_eq!(mapping.mtime(), stamp);
        mapping.set_color_by(Some("x"));
        assert!(mapping.mtime() > stamp);
    }
}
