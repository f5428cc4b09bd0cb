//! Core building blocks for serving chart tiles: an owned byte buffer, protobuf wire primitives,
//! Web Mercator tile math and gzip transport compression.

pub mod compression;
pub mod io;
pub mod types;

pub use types::*;
