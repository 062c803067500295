//! Data objects exchanged between pipeline nodes.
//!
//! A [`PolyData`] is a point snapshot: 3-component point coordinates plus any
//! number of named per-point arrays, all with one tuple per point. Snapshots
//! are immutable once a node has produced them; arrays are held behind `Arc`
//! so a filter can pass unchanged arrays downstream without copying them.

mod array;
mod error;
mod poly_data;

pub use array::{ArrayValues, DataArray, ScalarType};
pub use error::DataError;
pub use poly_data::{PointData, PolyData};
