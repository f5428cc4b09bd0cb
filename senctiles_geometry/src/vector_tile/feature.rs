//! Vector tile features and their geometry command streams.
//!
//! A command stream is a sequence of `(id, count)` headers, packed as `(count << 3) | id`, each
//! followed by `count` zigzag-encoded `(dx, dy)` pairs relative to a cursor. The cursor starts at
//! `(0, 0)` for every feature and is carried across all parts of that feature's geometry.

use super::geometry_type::GeomType;
use crate::geo::*;
use anyhow::{Context, Result, bail, ensure};
use byteorder::LE;
use log::trace;
use senctiles_core::{
	Blob,
	io::{ValueReader, ValueReaderSlice, ValueWriter, ValueWriterBlob, WIRE_LEN, WIRE_VARINT, zigzag_decode, zigzag_encode},
};

const CMD_MOVE_TO: u64 = 1;
const CMD_LINE_TO: u64 = 2;
const CMD_CLOSE_PATH: u64 = 7;

fn command(id: u64, count: usize) -> u64 {
	((count as u64) << 3) | id
}

/// Command stream of a single point at tile-local `(x, y)`: `[MoveTo(1), zigzag(x), zigzag(y)]`.
pub fn encode_point(x: i32, y: i32) -> Result<Blob> {
	let mut writer = ValueWriterBlob::new_le();
	writer.write_varint(command(CMD_MOVE_TO, 1))?;
	writer.write_varint(u64::from(zigzag_encode(x)))?;
	writer.write_varint(u64::from(zigzag_encode(y)))?;
	Ok(writer.into_blob())
}

/// `to - from` as `i32`. Saturated positions still subtract without overflow.
fn delta(axis: &str, to: i64, from: i64) -> Result<i32> {
	let delta = i128::from(to) - i128::from(from);
	i32::try_from(delta).with_context(|| format!("geometry delta {axis} ({delta}) exceeds the 32-bit range"))
}

/// Writes cursor-relative parameters, rejecting deltas that do not fit into `i32`.
struct CommandWriter {
	writer: ValueWriterBlob<LE>,
	cursor: (i64, i64),
}

impl CommandWriter {
	fn new() -> Self {
		CommandWriter {
			writer: ValueWriterBlob::new_le(),
			cursor: (0, 0),
		}
	}

	fn command(&mut self, id: u64, count: usize) -> Result<()> {
		self.writer.write_varint(command(id, count))
	}

	fn point(&mut self, point: Coordinates) -> Result<()> {
		ensure!(
			point[0].is_finite() && point[1].is_finite(),
			"geometry position {point:?} is not finite"
		);
		let x = point[0].round() as i64;
		let y = point[1].round() as i64;
		let dx = delta("x", x, self.cursor.0)?;
		let dy = delta("y", y, self.cursor.1)?;
		self.writer.write_varint(u64::from(zigzag_encode(dx)))?;
		self.writer.write_varint(u64::from(zigzag_encode(dy)))?;
		self.cursor = (x, y);
		Ok(())
	}

	fn points(&mut self, points: &[Coordinates]) -> Result<()> {
		for point in points {
			self.point(*point)?;
		}
		Ok(())
	}

	fn line_string(&mut self, line: &[Coordinates]) -> Result<()> {
		let Some((first, rest)) = line.split_first() else {
			return Ok(());
		};
		self.command(CMD_MOVE_TO, 1)?;
		self.point(*first)?;
		if !rest.is_empty() {
			self.command(CMD_LINE_TO, rest.len())?;
			self.points(rest)?;
		}
		Ok(())
	}

	/// Rings are written without their closing point; `ClosePath` returns to the start.
	fn ring(&mut self, ring: &[Coordinates]) -> Result<()> {
		let mut points = ring;
		if points.len() > 1 && points.first() == points.last() {
			points = &points[..points.len() - 1];
		}
		if points.len() < 3 {
			trace!("skipping degenerate ring with {} points", points.len());
			return Ok(());
		}
		self.line_string(points)?;
		self.command(CMD_CLOSE_PATH, 1)
	}

	fn into_blob(self) -> Blob {
		self.writer.into_blob()
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorTileFeature {
	pub id: Option<u64>,
	pub tag_ids: Vec<u32>,
	pub geom_type: GeomType,
	pub geom_data: Blob,
}

impl VectorTileFeature {
	/// Encodes a geometry in tile-local units into a feature.
	///
	/// # Errors
	/// Fails if a position is not finite or a cursor delta leaves the `i32` range.
	pub fn from_geometry(id: Option<u64>, tag_ids: Vec<u32>, geometry: &Geometry) -> Result<VectorTileFeature> {
		let mut writer = CommandWriter::new();

		match geometry {
			Geometry::Point(p) => {
				writer.command(CMD_MOVE_TO, 1)?;
				writer.point(*p)?;
			}
			Geometry::MultiPoint(points) => {
				if !points.is_empty() {
					writer.command(CMD_MOVE_TO, points.len())?;
					writer.points(points)?;
				}
			}
			Geometry::LineString(line) => writer.line_string(line)?,
			Geometry::MultiLineString(lines) => {
				for line in lines {
					writer.line_string(line)?;
				}
			}
			Geometry::Polygon(rings) => {
				for ring in rings {
					writer.ring(ring)?;
				}
			}
			Geometry::MultiPolygon(polygons) => {
				for ring in polygons.iter().flatten() {
					writer.ring(ring)?;
				}
			}
		}

		Ok(VectorTileFeature {
			id,
			tag_ids,
			geom_type: GeomType::from(geometry),
			geom_data: writer.into_blob(),
		})
	}

	pub fn read(reader: &mut dyn ValueReader<'_, LE>) -> Result<VectorTileFeature> {
		let mut f = VectorTileFeature::default();

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 0) => f.id = Some(reader.read_varint().context("Failed to read feature ID")?),
				(2, 2) => f.tag_ids = reader.read_pbf_packed_uint32().context("Failed to read tag IDs")?,
				(3, 0) => f.geom_type = GeomType::from(reader.read_varint().context("Failed to read geometry type")?),
				(4, 2) => f.geom_data = reader.read_pbf_blob().context("Failed to read geometry data")?,
				(f, w) => bail!("Unexpected combination of field number ({f}) and wire type ({w})"),
			}
		}

		Ok(f)
	}

	/// Serializes the feature: id (if any), packed tags (if any), type, command stream.
	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		if let Some(id) = self.id {
			writer
				.write_pbf_key(1, WIRE_VARINT)
				.context("Failed to write PBF key for feature ID")?;
			writer.write_varint(id).context("Failed to write feature ID")?;
		}

		if !self.tag_ids.is_empty() {
			writer
				.write_pbf_key(2, WIRE_LEN)
				.context("Failed to write PBF key for tag IDs")?;
			writer
				.write_pbf_packed_uint32(&self.tag_ids)
				.context("Failed to write tag IDs")?;
		}

		writer
			.write_pbf_key(3, WIRE_VARINT)
			.context("Failed to write PBF key for geometry type")?;
		writer
			.write_varint(self.geom_type.as_u64())
			.context("Failed to write geometry type")?;

		if !self.geom_data.is_empty() {
			writer
				.write_pbf_field(4, &self.geom_data)
				.context("Failed to write geometry data")?;
		}

		Ok(writer.into_blob())
	}

	/// Decodes the command stream back into tile-local positions.
	pub fn to_geometry(&self) -> Result<Geometry> {
		let mut parts: Vec<Vec<Coordinates>> = Vec::new();
		let mut closed: Vec<bool> = Vec::new();
		let mut reader = ValueReaderSlice::new_le(self.geom_data.as_slice());
		let (mut x, mut y) = (0i64, 0i64);

		while reader.has_remaining() {
			let value = reader
				.read_varint()
				.context("Failed to read varint for geometry command")?;
			let id = value & 0x7;
			let count = value >> 3;

			match id {
				CMD_MOVE_TO | CMD_LINE_TO => {
					for _ in 0..count {
						if id == CMD_MOVE_TO {
							parts.push(Vec::new());
							closed.push(false);
						}
						let Some(part) = parts.last_mut() else {
							bail!("LineTo command without preceding MoveTo");
						};
						x += i64::from(zigzag_decode(read_u32(&mut reader)?));
						y += i64::from(zigzag_decode(read_u32(&mut reader)?));
						part.push([x as f64, y as f64]);
					}
				}
				CMD_CLOSE_PATH => {
					let Some(part) = parts.last_mut() else {
						bail!("ClosePath command found on an empty geometry");
					};
					if let Some(&first) = part.first() {
						part.push(first);
					}
					if let Some(flag) = closed.last_mut() {
						*flag = true;
					}
				}
				_ => bail!("Unknown command {id}"),
			}
		}

		match self.geom_type {
			GeomType::Unknown => bail!("Unknown geometry type"),
			GeomType::Point => {
				ensure!(parts.iter().all(|p| p.len() == 1), "Point entries must have exactly one position");
				let mut points: Vec<Coordinates> = parts.into_iter().flatten().collect();
				match points.len() {
					0 => bail!("Points must not be empty"),
					1 => Ok(Geometry::Point(points.remove(0))),
					_ => Ok(Geometry::MultiPoint(points)),
				}
			}
			GeomType::LineString => {
				ensure!(
					parts.iter().all(|l| l.len() >= 2),
					"Each LineString must have at least two positions"
				);
				match parts.len() {
					0 => bail!("LineStrings must not be empty"),
					1 => Ok(Geometry::LineString(parts.remove(0))),
					_ => Ok(Geometry::MultiLineString(parts)),
				}
			}
			GeomType::Polygon => {
				ensure!(closed.iter().all(|c| *c), "Every polygon ring must end with ClosePath");
				let mut polygons: Vec<Vec<Vec<Coordinates>>> = Vec::new();
				for ring in parts {
					ensure!(ring.len() >= 4, "Each ring must have at least four positions (A,B,C,A)");
					let area = ring_area(&ring);
					if area > 0.0 {
						polygons.push(vec![ring]);
					} else if area < 0.0 {
						match polygons.last_mut() {
							Some(polygon) => polygon.push(ring),
							None => trace!("An outer ring must precede inner rings"),
						}
					} else {
						trace!("skipping ring with zero area");
					}
				}
				match polygons.len() {
					0 => bail!("Polygons must not be empty"),
					1 => Ok(Geometry::Polygon(polygons.remove(0))),
					_ => Ok(Geometry::MultiPolygon(polygons)),
				}
			}
		}
	}

	pub fn to_feature(&self, properties: GeoProperties) -> Result<GeoFeature> {
		let mut feature = GeoFeature::new(self.to_geometry().context("Failed to convert to geometry")?);
		feature.id = self.id;
		feature.properties = properties;
		Ok(feature)
	}
}

fn read_u32(reader: &mut ValueReaderSlice<'_, LE>) -> Result<u32> {
	let value = reader.read_varint().context("Failed to read geometry parameter")?;
	u32::try_from(value).context("geometry parameter exceeds 32 bits")
}

/// Signed area by the surveyor's formula; positive for exterior rings in tile space (y down).
fn ring_area(ring: &[Coordinates]) -> f64 {
	ring.windows(2).map(|w| w[0][0] * w[1][1] - w[1][0] * w[0][1]).sum::<f64>() / 2.0
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	fn round_trip(geometry: Geometry) -> Result<()> {
		let feature = VectorTileFeature::from_geometry(None, vec![], &geometry)?;
		assert_eq!(feature.to_geometry()?, geometry);
		Ok(())
	}

	#[test]
	fn encode_point_command_stream() -> Result<()> {
		assert_eq!(encode_point(2048, 2048)?.into_vec(), vec![0x09, 0x80, 0x20, 0x80, 0x20]);
		assert_eq!(encode_point(-1, 1)?.into_vec(), vec![0x09, 0x01, 0x02]);
		Ok(())
	}

	#[test]
	fn point_feature_bytes() -> Result<()> {
		let feature = VectorTileFeature::from_geometry(Some(1), vec![0, 0], &Geometry::new_point([2048, 2048]))?;
		assert_eq!(feature.geom_data, encode_point(2048, 2048)?);
		assert_eq!(
			feature.to_blob()?.as_hex(),
			// id 1 | tags [0, 0] | type Point | geometry
			"08 01 12 02 00 00 18 01 22 05 09 80 20 80 20"
		);
		Ok(())
	}

	#[test]
	fn no_tags_omits_the_tag_field() -> Result<()> {
		let feature = VectorTileFeature::from_geometry(None, vec![], &Geometry::new_point([1, 1]))?;
		assert_eq!(feature.to_blob()?.as_hex(), "18 01 22 03 09 02 02");
		Ok(())
	}

	#[test]
	fn line_string_command_stream() -> Result<()> {
		let feature =
			VectorTileFeature::from_geometry(None, vec![], &Geometry::new_line_string(vec![[2, 2], [2, 10], [10, 10]]))?;
		// MoveTo(1) +2 +2, LineTo(2) +0 +8, +8 +0
		assert_eq!(feature.geom_data.into_vec(), vec![9, 4, 4, 18, 0, 16, 16, 0]);
		Ok(())
	}

	#[test]
	fn polygon_command_stream() -> Result<()> {
		let polygon = Geometry::new_polygon(vec![vec![[3, 6], [8, 12], [20, 34], [3, 6]]]);
		let feature = VectorTileFeature::from_geometry(None, vec![], &polygon)?;
		// MoveTo(1) +3 +6, LineTo(2) +5 +6, +12 +22, ClosePath
		assert_eq!(feature.geom_data.into_vec(), vec![9, 6, 12, 18, 10, 12, 24, 44, 15]);
		Ok(())
	}

	#[test]
	fn cursor_is_carried_across_parts() -> Result<()> {
		let points = Geometry::new_multi_point(vec![[5, 7], [3, 2]]);
		let feature = VectorTileFeature::from_geometry(None, vec![], &points)?;
		// MoveTo(2) +5 +7, -2 -5
		assert_eq!(feature.geom_data.into_vec(), vec![17, 10, 14, 3, 9]);
		Ok(())
	}

	#[test]
	fn cursor_resets_per_feature() -> Result<()> {
		let a = VectorTileFeature::from_geometry(None, vec![], &Geometry::new_point([10, 10]))?;
		let b = VectorTileFeature::from_geometry(None, vec![], &Geometry::new_point([10, 10]))?;
		assert_eq!(a.geom_data, b.geom_data);
		Ok(())
	}

	#[rstest]
	#[case::x_too_large(Geometry::Point([f64::from(i32::MAX) + 1.0, 0.0]))]
	#[case::y_too_small(Geometry::Point([0.0, f64::from(i32::MIN) - 1.0]))]
	#[case::not_finite(Geometry::Point([f64::NAN, 0.0]))]
	#[case::saturated_after_negative_cursor(Geometry::LineString(vec![[-10.0, 0.0], [1e30, 0.0]]))]
	#[case::saturated_below_positive_cursor(Geometry::LineString(vec![[10.0, 0.0], [0.0, -1e30]]))]
	fn out_of_range_positions_are_rejected(#[case] geometry: Geometry) {
		let error = VectorTileFeature::from_geometry(None, vec![], &geometry).unwrap_err();
		let message = error.to_string();
		assert!(message.contains("exceeds the 32-bit range") || message.contains("not finite"), "{message}");
	}

	#[test]
	fn delta_between_extremes_is_rejected() {
		let line = Geometry::new_line_string(vec![[i32::MIN, 0], [i32::MAX, 0]]);
		let error = VectorTileFeature::from_geometry(None, vec![], &line).unwrap_err();
		assert_eq!(error.to_string(), "geometry delta x (4294967295) exceeds the 32-bit range");
	}

	#[test]
	fn round_trips() -> Result<()> {
		round_trip(Geometry::new_point([1, 2]))?;
		round_trip(Geometry::new_multi_point(vec![[2, 3], [4, 5]]))?;
		round_trip(Geometry::new_line_string(vec![[0, 1], [0, 3]]))?;
		round_trip(Geometry::new_multi_line_string(vec![vec![[0, 0], [1, 1]], vec![[5, 5], [2, 2]]]))?;
		round_trip(Geometry::new_polygon(vec![
			vec![[0, 0], [3, 0], [3, 3], [0, 3], [0, 0]],
			vec![[1, 1], [1, 2], [2, 2], [1, 1]],
		]))?;
		round_trip(Geometry::new_multi_polygon(vec![
			vec![vec![[0, 0], [3, 0], [3, 3], [0, 0]]],
			vec![vec![[10, 0], [13, 0], [13, 3], [10, 0]]],
		]))
	}

	#[test]
	fn read_feature() -> Result<()> {
		let blob = Blob::from(&[0x08, 0x01, 0x12, 0x02, 0x00, 0x00, 0x18, 0x01, 0x22, 0x03, 0x09, 0x02, 0x04]);
		let feature = VectorTileFeature::read(&mut ValueReaderSlice::new_le(blob.as_slice()))?;
		assert_eq!(feature.id, Some(1));
		assert_eq!(feature.tag_ids, vec![0, 0]);
		assert_eq!(feature.geom_type, GeomType::Point);
		assert_eq!(feature.to_geometry()?, Geometry::new_point([1, 2]));
		assert_eq!(feature.to_blob()?, blob);
		Ok(())
	}

	#[test]
	fn malformed_command_streams() {
		let feature = |geom_type, bytes: &[u8]| VectorTileFeature {
			id: None,
			tag_ids: vec![],
			geom_type,
			geom_data: Blob::from(bytes),
		};
		assert!(feature(GeomType::Point, &[0x0A, 0x02, 0x02]).to_geometry().is_err());
		assert!(feature(GeomType::Polygon, &[0x0F]).to_geometry().is_err());
		assert!(feature(GeomType::Unknown, &[0x09, 0x02, 0x02]).to_geometry().is_err());
		assert!(feature(GeomType::Point, &[0x0C]).to_geometry().is_err());
	}
}
