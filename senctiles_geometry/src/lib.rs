//! Feature model and vector tile encoding for nautical chart tiles.

pub mod geo;
pub mod vector_tile;

pub use geo::*;
