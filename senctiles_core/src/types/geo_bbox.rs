use anyhow::{Result, ensure};
use std::f64::consts::{FRAC_PI_4, PI};
use std::fmt::Debug;

static MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// A geographic bounding box `(west, south, east, north)` in WGS84 degrees.
///
/// This is the area handed to chart sources when tiles or features are queried.
///
/// ```
/// use senctiles_core::GeoBBox;
///
/// let bbox = GeoBBox::new(-10.0, -5.0, 10.0, 5.0).unwrap();
/// assert_eq!(bbox.as_tuple(), (-10.0, -5.0, 10.0, 5.0));
/// assert!(bbox.contains(0.0, 0.0));
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct GeoBBox {
	pub x_min: f64,
	pub y_min: f64,
	pub x_max: f64,
	pub y_max: f64,
}

impl GeoBBox {
	/// Creates a bounding box from `west, south, east, north`.
	///
	/// # Errors
	/// Fails if a value is not finite, lies outside the WGS84 range, or if min exceeds max.
	pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<GeoBBox> {
		GeoBBox {
			x_min,
			y_min,
			x_max,
			y_max,
		}
		.checked()
	}

	#[must_use]
	pub fn as_array(&self) -> [f64; 4] {
		[self.x_min, self.y_min, self.x_max, self.y_max]
	}

	#[must_use]
	pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
		(self.x_min, self.y_min, self.x_max, self.y_max)
	}

	/// Returns `true` if the point lies inside the box or on its border.
	#[must_use]
	pub fn contains(&self, lon: f64, lat: f64) -> bool {
		lon >= self.x_min && lon <= self.x_max && lat >= self.y_min && lat <= self.y_max
	}

	/// Centre of the box in Web Mercator space, returned as `(lon, lat)` degrees.
	///
	/// The latitude is the midpoint of the projected northern and southern edges, so the centre
	/// of a tile bbox lands exactly in the middle of the tile.
	#[must_use]
	pub fn mercator_center(&self) -> (f64, f64) {
		let lon = f64::midpoint(self.x_min, self.x_max);
		let y = f64::midpoint(mercator_y(self.y_min), mercator_y(self.y_max));
		(lon, inverse_mercator_y(y))
	}

	/// Projects a WGS84 position into a square of `extent` units spanning this box in Web
	/// Mercator space, with the northwest corner at `(0, 0)`. Results are rounded.
	///
	/// # Errors
	/// Fails for degenerate boxes and positions that do not fit into `i64`.
	pub fn project(&self, lon: f64, lat: f64, extent: u32) -> Result<(i64, i64)> {
		let width = self.x_max - self.x_min;
		let north = mercator_y(self.y_max);
		let height = north - mercator_y(self.y_min);
		ensure!(width > 0.0 && height > 0.0, "cannot project into degenerate {self:?}");

		let extent = f64::from(extent);
		let x = ((lon - self.x_min) / width * extent).round();
		let y = ((north - mercator_y(lat)) / height * extent).round();
		ensure!(
			x.is_finite() && y.is_finite() && x.abs() < 9.2e18 && y.abs() < 9.2e18,
			"position ({lon}, {lat}) cannot be projected into {self:?}"
		);
		Ok((x as i64, y as i64))
	}

	fn checked(self) -> Result<Self> {
		ensure!(
			self.as_array().iter().all(|v| v.is_finite()),
			"bbox values must be finite: {self:?}"
		);
		ensure!(self.x_min >= -180., "x_min ({}) must be >= -180", self.x_min);
		ensure!(self.y_min >= -90., "y_min ({}) must be >= -90", self.y_min);
		ensure!(self.x_max <= 180., "x_max ({}) must be <= 180", self.x_max);
		ensure!(self.y_max <= 90., "y_max ({}) must be <= 90", self.y_max);
		ensure!(
			self.x_min <= self.x_max,
			"x_min ({}) must be <= x_max ({})",
			self.x_min,
			self.x_max
		);
		ensure!(
			self.y_min <= self.y_max,
			"y_min ({}) must be <= y_max ({})",
			self.y_min,
			self.y_max
		);
		Ok(self)
	}
}

/// Unit-free Mercator ordinate `ln(tan(π/4 + φ/2))`, clamped to the Mercator latitude limit.
fn mercator_y(lat_deg: f64) -> f64 {
	let lat = lat_deg.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
	(FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln()
}

fn inverse_mercator_y(y: f64) -> f64 {
	(2.0 * y.exp().atan() - PI / 2.0).to_degrees()
}

impl Debug for GeoBBox {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"GeoBBox({}, {}, {}, {})",
			self.x_min, self.y_min, self.x_max, self.y_max
		)
	}
}

impl TryFrom<[f64; 4]> for GeoBBox {
	type Error = anyhow::Error;

	fn try_from(input: [f64; 4]) -> Result<Self> {
		GeoBBox::new(input[0], input[1], input[2], input[3])
	}
}

impl TryFrom<Vec<f64>> for GeoBBox {
	type Error = anyhow::Error;

	fn try_from(input: Vec<f64>) -> Result<Self> {
		ensure!(
			input.len() == 4,
			"GeoBBox must have 4 elements (x_min, y_min, x_max, y_max)"
		);
		GeoBBox::new(input[0], input[1], input[2], input[3])
	}
}
