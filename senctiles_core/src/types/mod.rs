//! Contains the byte buffer, tile coordinates and geographic bounding boxes.

mod blob;
pub use blob::*;

mod geo_bbox;
pub use geo_bbox::*;

mod tile_coord;
pub use tile_coord::*;
