//! Edge-relative ROI construction and pixel extraction.

pub mod builder;
pub mod extract;

pub use builder::{build_selection, RoiGeometry, MIN_EDGE_LENGTH};
pub use extract::extract;
