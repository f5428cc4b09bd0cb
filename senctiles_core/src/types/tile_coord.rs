//! Tile coordinates in the Web Mercator pyramid.
//!
//! ```
//! use senctiles_core::TileCoord;
//!
//! let coord = TileCoord::new(1, 0, 0).unwrap();
//! let bbox = coord.to_geo_bbox();
//! assert_eq!(bbox.x_min, -180.0);
//! assert_eq!(bbox.x_max, 0.0);
//! ```

use crate::GeoBBox;
use anyhow::{Context, Result, ensure};
use std::f64::consts::PI;
use std::fmt::{self, Debug};

/// Chart scale denominator at zoom level 0 (a 256 px world at ~0.28 mm per pixel).
pub const SCALE_AT_LEVEL_ZERO: f64 = 559_082_264.028;

/// A tile address `(level, x, y)` with `y` counted from the north.
#[derive(Eq, PartialEq, Clone, Hash, Copy)]
pub struct TileCoord {
	pub level: u8,
	pub x: u32,
	pub y: u32,
}

impl TileCoord {
	/// Creates a validated coordinate.
	///
	/// # Errors
	/// Fails if `level > 31` or `x`/`y` are outside `0..2^level`.
	pub fn new(level: u8, x: u32, y: u32) -> Result<TileCoord> {
		ensure!(level <= 31, "level ({level}) must be <= 31");
		let max = 2u64.pow(u32::from(level));
		ensure!(u64::from(x) < max, "x ({x}) out of bounds for level {level}");
		ensure!(u64::from(y) < max, "y ({y}) out of bounds for level {level}");
		Ok(TileCoord { level, x, y })
	}

	/// Northwest corner of tile `(x, y)` at `level` as `[lon, lat]` degrees.
	#[must_use]
	pub fn coord_to_geo(level: u8, x: u32, y: u32) -> [f64; 2] {
		let zoom: f64 = 2.0f64.powi(i32::from(level));
		[
			(f64::from(x) / zoom - 0.5) * 360.0,
			((PI * (1.0 - 2.0 * f64::from(y) / zoom)).exp().atan() / PI - 0.25) * 360.0,
		]
	}

	/// Geographic extent of this tile.
	#[must_use]
	pub fn to_geo_bbox(&self) -> GeoBBox {
		let [x_min, y_max] = TileCoord::coord_to_geo(self.level, self.x, self.y);
		let [x_max, y_min] = TileCoord::coord_to_geo(self.level, self.x + 1, self.y + 1);
		GeoBBox {
			x_min,
			y_min,
			x_max,
			y_max,
		}
	}

	/// Chart scale denominator used when querying features for this zoom level.
	#[must_use]
	pub fn scale(&self) -> f64 {
		SCALE_AT_LEVEL_ZERO / 2.0f64.powi(i32::from(self.level))
	}

	/// Projects a WGS84 position into this tile's local coordinate space of `extent` units.
	///
	/// The tile's northwest corner maps to `(0, 0)`; positions outside the tile map outside
	/// `0..extent`. Results are rounded to the nearest integer unit.
	///
	/// # Errors
	/// Fails if the projected position does not fit into `i64`.
	pub fn project(&self, lon: f64, lat: f64, extent: u32) -> Result<(i64, i64)> {
		let size = 2.0f64.powi(i32::from(self.level)) * f64::from(extent);
		let lat = lat.clamp(-89.999_999, 89.999_999);
		let world_x = (lon / 360.0 + 0.5) * size;
		let world_y = (0.5 - (PI / 4.0 + lat.to_radians() / 2.0).tan().ln() / (2.0 * PI)) * size;
		let local_x = (world_x - f64::from(self.x) * f64::from(extent)).round();
		let local_y = (world_y - f64::from(self.y) * f64::from(extent)).round();
		ensure!(
			local_x.is_finite() && local_y.is_finite() && local_x.abs() < 9.2e18 && local_y.abs() < 9.2e18,
			"position ({lon}, {lat}) cannot be projected into {self:?}"
		);
		Ok((local_x as i64, local_y as i64))
	}

	/// Parses a `z/x/y` triple as received from a request path.
	pub fn parse(z: &str, x: &str, y: &str) -> Result<TileCoord> {
		let level = z.parse::<u8>().with_context(|| format!("invalid zoom level '{z}'"))?;
		let x = x.parse::<u32>().with_context(|| format!("invalid x '{x}'"))?;
		let y = y.parse::<u32>().with_context(|| format!("invalid y '{y}'"))?;
		TileCoord::new(level, x, y)
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileCoord({}, [{}, {}])", self.level, self.x, self.y)
	}
}
