use anyhow::Result;
use std::fmt::Debug;

/// A single `[x, y]` position. Geographic features use `[lon, lat]`; encoded tiles use
/// tile-local units.
pub type Coordinates = [f64; 2];

#[derive(Clone, PartialEq)]
pub enum Geometry {
	Point(Coordinates),
	LineString(Vec<Coordinates>),
	Polygon(Vec<Vec<Coordinates>>),
	MultiPoint(Vec<Coordinates>),
	MultiLineString(Vec<Vec<Coordinates>>),
	MultiPolygon(Vec<Vec<Vec<Coordinates>>>),
}

fn c<T: Copy + Into<f64>>(value: [T; 2]) -> Coordinates {
	[value[0].into(), value[1].into()]
}

impl Geometry {
	pub fn new_point<T: Copy + Into<f64>>(value: [T; 2]) -> Self {
		Self::Point(c(value))
	}
	pub fn new_line_string<T: Copy + Into<f64>>(value: Vec<[T; 2]>) -> Self {
		Self::LineString(value.into_iter().map(c).collect())
	}
	pub fn new_polygon<T: Copy + Into<f64>>(value: Vec<Vec<[T; 2]>>) -> Self {
		Self::Polygon(value.into_iter().map(|r| r.into_iter().map(c).collect()).collect())
	}
	pub fn new_multi_point<T: Copy + Into<f64>>(value: Vec<[T; 2]>) -> Self {
		Self::MultiPoint(value.into_iter().map(c).collect())
	}
	pub fn new_multi_line_string<T: Copy + Into<f64>>(value: Vec<Vec<[T; 2]>>) -> Self {
		Self::MultiLineString(value.into_iter().map(|l| l.into_iter().map(c).collect()).collect())
	}
	pub fn new_multi_polygon<T: Copy + Into<f64>>(value: Vec<Vec<Vec<[T; 2]>>>) -> Self {
		Self::MultiPolygon(
			value
				.into_iter()
				.map(|p| p.into_iter().map(|r| r.into_iter().map(c).collect()).collect())
				.collect(),
		)
	}

	#[must_use]
	pub fn type_name(&self) -> &'static str {
		match self {
			Geometry::Point(_) => "Point",
			Geometry::LineString(_) => "LineString",
			Geometry::Polygon(_) => "Polygon",
			Geometry::MultiPoint(_) => "MultiPoint",
			Geometry::MultiLineString(_) => "MultiLineString",
			Geometry::MultiPolygon(_) => "MultiPolygon",
		}
	}

	/// Applies a fallible transformation to every position, keeping the structure.
	pub fn try_map_coords<F>(self, mut f: F) -> Result<Geometry>
	where
		F: FnMut(Coordinates) -> Result<Coordinates>,
	{
		fn line<F: FnMut(Coordinates) -> Result<Coordinates>>(
			points: Vec<Coordinates>,
			f: &mut F,
		) -> Result<Vec<Coordinates>> {
			points.into_iter().map(&mut *f).collect()
		}
		fn polygon<F: FnMut(Coordinates) -> Result<Coordinates>>(
			rings: Vec<Vec<Coordinates>>,
			f: &mut F,
		) -> Result<Vec<Vec<Coordinates>>> {
			rings.into_iter().map(|r| line(r, f)).collect()
		}

		Ok(match self {
			Geometry::Point(p) => Geometry::Point(f(p)?),
			Geometry::LineString(l) => Geometry::LineString(line(l, &mut f)?),
			Geometry::Polygon(p) => Geometry::Polygon(polygon(p, &mut f)?),
			Geometry::MultiPoint(l) => Geometry::MultiPoint(line(l, &mut f)?),
			Geometry::MultiLineString(p) => Geometry::MultiLineString(polygon(p, &mut f)?),
			Geometry::MultiPolygon(m) => Geometry::MultiPolygon(
				m.into_iter()
					.map(|p| polygon(p, &mut f))
					.collect::<Result<_>>()?,
			),
		})
	}
}

impl Debug for Geometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let inner: &dyn Debug = match self {
			Geometry::Point(g) => g,
			Geometry::LineString(g) | Geometry::MultiPoint(g) => g,
			Geometry::Polygon(g) | Geometry::MultiLineString(g) => g,
			Geometry::MultiPolygon(g) => g,
		};
		f.debug_tuple(self.type_name()).field(inner).finish()
	}
}
