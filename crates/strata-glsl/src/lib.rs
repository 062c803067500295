//! Marker-based composition of GLSL shader templates.
//!
//! Shader templates carry placeholder comments of the form
//! `//Namespace::Tag::Phase` where the phase is either `Dec` (declaration
//! region) or `Impl` (function body). Independent pieces of rendering logic
//! fill those placeholders in turn, so lighting, picking and geometry
//! expansion code can be layered without knowing about each other.
//!
//! This crate is dependency-free so tooling can inspect and compose templates
//! without pulling in the pipeline engine or a GPU backend.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`marker`] | `Marker`, `Phase`, marker scanning |
//! | [`sources`] | `ShaderSources`, `Stage` |
//! | [`substitute`] | `substitute`, `substitute_all`, `strip_markers` |
//!
//! # Quick start
//!
//! ```rust
//! use strata_glsl::{substitute, Marker, Phase};
//!
//! let fs = "void main() {\n//Strata::Color::Impl\n}\n";
//! let marker = Marker::new("Strata", "Color", Phase::Impl);
//!
//! let out = substitute(fs, &marker.token(), "  vec3 diffuse = vec3(1.0);\n");
//! assert!(out.replaced);
//! assert!(out.result.contains("diffuse"));
//!
//! // Missing markers are not an error.
//! let again = substitute(&out.result, &marker.token(), "unused");
//! assert!(!again.replaced);
//! ```

pub mod marker;
pub mod sources;
pub mod substitute;

pub use marker::{find_markers, Marker, MarkerSpan, Phase};
pub use sources::{ShaderSources, Stage};
pub use substitute::{strip_markers, substitute, substitute_all, Replacement, Substitution};
