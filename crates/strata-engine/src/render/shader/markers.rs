//! Marker tokens understood by the mapper templates.

/// Namespace of every marker in the bundled templates.
pub const NAMESPACE: &str = "Strata";

pub(crate) const CAMERA_DEC: &str = "//Strata::Camera::Dec";
pub(crate) const ATTRIBUTES_DEC: &str = "//Strata::Attributes::Dec";
pub(crate) const POSITION_DEC: &str = "//Strata::PositionVC::Dec";
pub(crate) const POSITION_IMPL: &str = "//Strata::PositionVC::Impl";
pub(crate) const COLOR_DEC: &str = "//Strata::Color::Dec";
pub(crate) const COLOR_IMPL: &str = "//Strata::Color::Impl";
pub(crate) const NORMAL_IMPL: &str = "//Strata::Normal::Impl";
pub(crate) const DEPTH_IMPL: &str = "//Strata::Depth::Impl";
pub(crate) const LIGHT_IMPL: &str = "//Strata::Light::Impl";
pub(crate) const PICKING_IMPL: &str = "//Strata::Picking::Impl";
pub(crate) const OUTPUT_DEC: &str = "//Strata::Output::Dec";
pub(crate) const OUTPUT_IMPL: &str = "//Strata::Output::Impl";
