//! # SENC Tiles
//!
//! Serves nautical chart data as Mapbox Vector Tiles.
//!
//! Charts are registered once through [`TileService::build_senc`], which returns an opaque
//! handle such as `senc_1`. Tiles are then requested by handle and `z/x/y` coordinate and come
//! back as gzip-compressed MVT payloads with a single `SOUNDG` layer.
//!
//! ```rust
//! use senctiles::{TileService, chart::StubChartSource};
//! use std::sync::Arc;
//!
//! let service = TileService::new(Arc::new(StubChartSource::accept_missing()));
//! let handle = service.build_senc("charts/US5MA22M.000", "senc").unwrap();
//! assert_eq!(handle.as_str(), "senc_1");
//!
//! let tile = service.query_tile_mvt(handle.as_str(), 14, 4953, 6060).unwrap();
//! assert!(!tile.is_empty());
//! ```

pub mod chart;
pub mod config;
mod error;
pub mod options;
pub mod server;
pub mod service;

pub use error::ChartError;
pub use options::{Palette, TileFormat, TileOptions};
pub use service::TileService;

pub use senctiles_core as core;
pub use senctiles_geometry as geometry;
