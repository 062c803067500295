//! Layered shader composition.
//!
//! Every mapper program starts from a GLSL template full of
//! `//Strata::Tag::Dec|Impl` markers. A [`ShaderLayer`] picks the templates
//! and fills markers in; specialized layers wrap the [`PolyDataShaderLayer`]
//! and call it last, so whatever they claimed first wins and the root layer
//! supplies defaults for the rest before stripping what nobody claimed.

mod layer;
mod markers;
mod poly_data;
mod sphere;
mod stick;
mod validate;

pub use layer::{compose, ShaderBuildState, ShaderKey, ShaderLayer};
pub use markers::NAMESPACE;
pub use poly_data::PolyDataShaderLayer;
pub use sphere::SphereShaderLayer;
pub use stick::StickShaderLayer;
pub use validate::validate_glsl;
