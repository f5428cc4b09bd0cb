//! Chart ingestion.
//!
//! A [`ChartSource`] loads a chart file once and afterwards answers feature queries for
//! geographic areas. Features are returned in WGS84 coordinates.

use crate::ChartError;
use senctiles_core::GeoBBox;
use senctiles_geometry::{
	GeoFeature, Geometry,
	vector_tile::sounding::DEPTH_KEY,
};
use std::{
	path::Path,
	sync::atomic::{AtomicU64, Ordering},
};

/// Opaque reference to a chart loaded by a [`ChartSource`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChartSourceHandle {
	id: u64,
	origin: String,
}

impl ChartSourceHandle {
	pub fn new(id: u64, origin: &str) -> ChartSourceHandle {
		ChartSourceHandle {
			id,
			origin: origin.to_string(),
		}
	}

	pub fn id(&self) -> u64 {
		self.id
	}

	/// Name of the source that issued this handle.
	pub fn origin(&self) -> &str {
		&self.origin
	}
}

pub trait ChartSource: Send + Sync {
	/// Loads the chart at `path`.
	fn load_chart(&self, path: &str, kind: &str) -> Result<ChartSourceHandle, ChartError>;

	/// Features of a loaded chart inside `bbox`, at the chart scale denominator `scale`.
	fn features_in_bbox(&self, chart: &ChartSourceHandle, bbox: &GeoBBox, scale: f64) -> Vec<GeoFeature>;
}

/// Stand-in for a real chart reader.
///
/// Returns one `SOUNDG` sounding of depth 5 m at the centre of every queried area.
#[derive(Debug, Default)]
pub struct StubChartSource {
	accept_missing: bool,
	next_id: AtomicU64,
}

impl StubChartSource {
	/// Accepts only paths that exist.
	pub fn new() -> StubChartSource {
		StubChartSource::default()
	}

	/// Accepts any path.
	pub fn accept_missing() -> StubChartSource {
		StubChartSource {
			accept_missing: true,
			..StubChartSource::default()
		}
	}

	pub const DEPTH: f64 = 5.0;
}

impl ChartSource for StubChartSource {
	fn load_chart(&self, path: &str, kind: &str) -> Result<ChartSourceHandle, ChartError> {
		if !self.accept_missing && !Path::new(path).exists() {
			return Err(ChartError::NotFound(path.to_string()));
		}
		let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
		log::debug!("stub loaded {kind} chart '{path}' as #{id}");
		Ok(ChartSourceHandle::new(id, "stub"))
	}

	fn features_in_bbox(&self, chart: &ChartSourceHandle, bbox: &GeoBBox, scale: f64) -> Vec<GeoFeature> {
		log::trace!("stub query of chart #{} for {bbox:?} at 1:{scale:.0}", chart.id());
		let (lon, lat) = bbox.mercator_center();
		let mut feature = GeoFeature::new(Geometry::new_point([lon, lat]));
		feature.set_id(1);
		feature.set_property(DEPTH_KEY, StubChartSource::DEPTH);
		vec![feature]
	}
}
