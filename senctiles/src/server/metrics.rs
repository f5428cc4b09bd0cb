//! Prometheus metrics of the tile endpoint.

use anyhow::{Context, Result};
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::fmt;

pub const MIME_METRICS: &str = prometheus::TEXT_FORMAT;

/// Render latency and payload size per chart kind, kept in a registry of their own.
#[derive(Clone)]
pub struct TileMetrics {
	registry: Registry,
	render_seconds: HistogramVec,
	bytes_total: IntCounterVec,
}

impl TileMetrics {
	pub fn new() -> Result<TileMetrics> {
		let render_seconds = HistogramVec::new(
			HistogramOpts::new("tile_render_seconds", "Time spent rendering tiles in seconds"),
			&["kind"],
		)
		.context("Failed to create tile_render_seconds")?;
		let bytes_total = IntCounterVec::new(
			Opts::new("tile_bytes_total", "Total number of bytes returned for tiles"),
			&["kind"],
		)
		.context("Failed to create tile_bytes_total")?;

		let registry = Registry::new();
		registry
			.register(Box::new(render_seconds.clone()))
			.context("Failed to register tile_render_seconds")?;
		registry
			.register(Box::new(bytes_total.clone()))
			.context("Failed to register tile_bytes_total")?;

		Ok(TileMetrics {
			registry,
			render_seconds,
			bytes_total,
		})
	}

	/// Records one served tile.
	pub fn observe_tile(&self, kind: &str, seconds: f64, bytes: u64) {
		self.render_seconds.with_label_values(&[kind]).observe(seconds);
		self.bytes_total.with_label_values(&[kind]).inc_by(bytes);
	}

	/// Text exposition format.
	pub fn render(&self) -> Result<String> {
		TextEncoder::new()
			.encode_to_string(&self.registry.gather())
			.context("Failed to encode metrics")
	}
}

impl fmt::Debug for TileMetrics {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TileMetrics").finish_non_exhaustive()
	}
}
