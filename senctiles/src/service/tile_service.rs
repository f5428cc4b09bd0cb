//! The tile pipeline: handle lookup, feature query, projection, MVT encoding and gzip.
//!
//! All operations are synchronous. The registry lock is only held inside the registry itself,
//! never while charts load or tiles encode.

use crate::{
	ChartError, Palette, TileFormat, TileOptions,
	chart::{ChartHandle, ChartRegistry, ChartSource, RasterRenderer, SolidRasterRenderer},
};
use anyhow::{Context, Result};
use senctiles_core::{
	Blob, GeoBBox, SCALE_AT_LEVEL_ZERO, TileCoord, compression::TransportCompressor,
};
use senctiles_geometry::{
	GeoFeature,
	vector_tile::{SoundingEncoder, layer::DEFAULT_EXTENT},
};
use std::{fmt, sync::Arc};

pub struct TileService {
	registry: Arc<ChartRegistry>,
	source: Arc<dyn ChartSource>,
	renderer: Arc<dyn RasterRenderer>,
	compressor: TransportCompressor,
	safety_contour: f64,
}

impl TileService {
	/// A service with its own registry, the solid raster renderer and a safety contour of 0 m.
	pub fn new(source: Arc<dyn ChartSource>) -> TileService {
		TileService {
			registry: Arc::new(ChartRegistry::new()),
			source,
			renderer: Arc::new(SolidRasterRenderer),
			compressor: TransportCompressor::new(),
			safety_contour: 0.0,
		}
	}

	pub fn with_registry(mut self, registry: Arc<ChartRegistry>) -> TileService {
		self.registry = registry;
		self
	}

	pub fn with_renderer(mut self, renderer: Arc<dyn RasterRenderer>) -> TileService {
		self.renderer = renderer;
		self
	}

	/// Safety contour applied by [`query_tile`](Self::query_tile).
	pub fn with_safety_contour(mut self, safety_contour: f64) -> Result<TileService, ChartError> {
		TileOptions::new(TileFormat::Mvt, Palette::Day, safety_contour)?;
		self.safety_contour = safety_contour;
		Ok(self)
	}

	pub fn registry(&self) -> &ChartRegistry {
		&self.registry
	}

	pub fn safety_contour(&self) -> f64 {
		self.safety_contour
	}

	/// Loads a chart and registers it.
	pub fn build_senc(&self, path: &str, kind: &str) -> Result<ChartHandle, ChartError> {
		if path.is_empty() {
			return Err(ChartError::invalid("path", "must not be empty"));
		}
		let source = self.source.load_chart(path, kind)?;
		self.registry.register(path, kind, source)
	}

	/// Features of a chart inside `bbox`. Unknown handles yield no features.
	pub fn query_features(&self, handle: &str, bbox: &GeoBBox, scale: f64) -> Vec<GeoFeature> {
		let Some(chart) = self.registry.resolve(handle) else {
			log::debug!("unknown chart handle '{handle}'");
			return Vec::new();
		};
		self.source.features_in_bbox(&chart.source, bbox, scale)
	}

	/// The uncompressed MVT tile `z/x/y` of a chart. Unknown handles yield a tile without layers.
	pub fn query_tile(&self, handle: &str, z: u8, x: u32, y: u32) -> Result<Blob, ChartError> {
		let coord = TileCoord::new(z, x, y).map_err(|e| ChartError::invalid("tile", e.to_string()))?;
		self.encode_tile(handle, &coord, self.safety_contour)
	}

	/// Like [`query_tile`](Self::query_tile) with an explicit safety contour.
	pub fn query_tile_with_safety(
		&self,
		handle: &str,
		coord: &TileCoord,
		safety_contour: f64,
	) -> Result<Blob, ChartError> {
		TileOptions::new(TileFormat::Mvt, Palette::Day, safety_contour)?;
		self.encode_tile(handle, coord, safety_contour)
	}

	/// [`query_tile`](Self::query_tile), gzip-compressed for transport.
	pub fn query_tile_mvt(&self, handle: &str, z: u8, x: u32, y: u32) -> Result<Blob, ChartError> {
		let tile = self.query_tile(handle, z, x, y)?;
		self.compress(&tile)
	}

	/// Renders an arbitrary area, either as PNG or as (uncompressed) MVT.
	///
	/// Options are validated before any work is done. MVT output contains the soundings of
	/// every registered chart inside `bbox`.
	pub fn generate_tile(&self, bbox: &GeoBBox, level: u8, options: &TileOptions) -> Result<Blob, ChartError> {
		options.validate()?;
		if level > 31 {
			return Err(ChartError::invalid("level", format!("must be <= 31, got {level}")));
		}

		match options.format {
			TileFormat::Png => Ok(self.renderer.render_png(bbox, level, options.palette)?),
			TileFormat::Mvt => {
				let scale = SCALE_AT_LEVEL_ZERO / 2.0f64.powi(i32::from(level));
				let mut features = Vec::new();
				for (_, chart) in self.registry.entries() {
					features.extend(self.source.features_in_bbox(&chart.source, bbox, scale));
				}
				let features = project_features(features, |lon, lat| bbox.project(lon, lat, DEFAULT_EXTENT))?;
				Ok(SoundingEncoder::new(options.safety_contour).encode_blob(&features)?)
			}
		}
	}

	/// Gzips a payload. An empty result means compression failed.
	pub fn compress(&self, blob: &Blob) -> Result<Blob, ChartError> {
		let compressed = self.compressor.compress(blob);
		if compressed.is_empty() {
			return Err(ChartError::Compression(format!(
				"no output for {} input bytes",
				blob.len()
			)));
		}
		Ok(compressed)
	}

	fn encode_tile(&self, handle: &str, coord: &TileCoord, safety_contour: f64) -> Result<Blob, ChartError> {
		log::debug!("query tile {coord:?} of chart '{handle}'");

		let Some(chart) = self.registry.resolve(handle) else {
			log::debug!("unknown chart handle '{handle}', sending empty tile");
			return Ok(Blob::new_empty());
		};

		let bbox = coord.to_geo_bbox();
		let features = self.source.features_in_bbox(&chart.source, &bbox, coord.scale());
		let features = project_features(features, |lon, lat| coord.project(lon, lat, DEFAULT_EXTENT))?;

		SoundingEncoder::new(safety_contour)
			.encode_blob(&features)
			.with_context(|| format!("Failed to encode tile {coord:?} of chart '{handle}'"))
			.map_err(ChartError::from)
	}
}

/// Maps WGS84 features into tile-local units.
fn project_features<F>(features: Vec<GeoFeature>, project: F) -> Result<Vec<GeoFeature>>
where
	F: Fn(f64, f64) -> Result<(i64, i64)>,
{
	features
		.into_iter()
		.map(|mut feature| {
			feature.geometry = feature.geometry.try_map_coords(|[lon, lat]| {
				let (x, y) = project(lon, lat)?;
				Ok([x as f64, y as f64])
			})?;
			Ok(feature)
		})
		.collect()
}

impl fmt::Debug for TileService {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TileService")
			.field("registry", &self.registry)
			.field("safety_contour", &self.safety_contour)
			.finish_non_exhaustive()
	}
}
