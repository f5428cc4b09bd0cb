//! Mapbox Vector Tile (MVT v2) encoding and decoding.
//!
//! - [`feature`]: feature messages and geometry command streams.
//! - [`geometry_type`]: the wire-level geometry type.
//! - [`layer`]: a named layer with its key/value dictionaries.
//! - [`property_manager`]: interning of keys and values into tag indices.
//! - [`sounding`]: the `SOUNDG` layer and its safety-contour rule.
//! - [`tile`]: the top-level container.
//! - [`value`]: typed `Value` messages.

pub mod feature;
pub mod geometry_type;
pub mod layer;
pub mod property_manager;
pub mod sounding;
pub mod tile;
pub mod value;

pub use feature::{VectorTileFeature, encode_point};
pub use geometry_type::GeomType;
pub use layer::VectorTileLayer;
pub use sounding::SoundingEncoder;
pub use tile::VectorTile;
