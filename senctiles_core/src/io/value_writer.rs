//! The [`ValueWriter`] trait: the protobuf wire primitives every tile message is built from.
//!
//! A writer only has to expose an [`std::io::Write`] sink and its position; varints, zigzag
//! integers, field keys and length-delimited fields are all provided on top of that.
//!
//! # Examples
//!
//! ```rust
//! use senctiles_core::io::{ValueWriter, ValueWriterBlob};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let mut writer = ValueWriterBlob::new_le();
//!     writer.write_pbf_key(1, 2)?;
//!     writer.write_pbf_string("SOUNDG")?;
//!     assert_eq!(writer.into_blob().as_hex(), "0a 06 53 4f 55 4e 44 47");
//!     Ok(())
//! }
//! ```

use super::ValueWriterBlob;
use crate::Blob;
use anyhow::{Context, Result};
use byteorder::{ByteOrder, WriteBytesExt};
use std::io::Write;

/// Protobuf wire type for varint scalars.
pub const WIRE_VARINT: u8 = 0;
/// Protobuf wire type for 64-bit fixed scalars.
pub const WIRE_FIXED64: u8 = 1;
/// Protobuf wire type for length-delimited payloads.
pub const WIRE_LEN: u8 = 2;
/// Protobuf wire type for 32-bit fixed scalars.
pub const WIRE_FIXED32: u8 = 5;

/// A trait for writing values to various destinations with support for different byte orders.
pub trait ValueWriter<E: ByteOrder> {
	/// Returns a mutable reference to the underlying writer.
	fn get_writer(&mut self) -> &mut dyn Write;

	/// Returns the current write position.
	fn position(&mut self) -> Result<u64>;

	/// Returns `true` if nothing has been written yet.
	fn is_empty(&mut self) -> Result<bool> {
		Ok(self.position()? == 0)
	}

	/// Writes an unsigned base-128 varint, least significant group first.
	///
	/// The encoding is canonical: no trailing zero groups are emitted, so values below 128
	/// take exactly one byte and `u64::MAX` takes ten.
	fn write_varint(&mut self, mut value: u64) -> Result<()> {
		while value >= 0x80 {
			self.get_writer().write_all(&[((value & 0x7F) as u8) | 0x80])?;
			value >>= 7;
		}
		self.get_writer().write_all(&[value as u8])?;
		Ok(())
	}

	/// Writes a 64-bit zigzag-encoded varint (protobuf `sint64`).
	fn write_svarint(&mut self, value: i64) -> Result<()> {
		self.write_varint(((value << 1) ^ (value >> 63)) as u64)
	}

	fn write_u8(&mut self, value: u8) -> Result<()> {
		Ok(self.get_writer().write_u8(value)?)
	}

	/// Writes a 32-bit float using the writer's byte order.
	fn write_f32(&mut self, value: f32) -> Result<()> {
		Ok(self.get_writer().write_f32::<E>(value)?)
	}

	/// Writes a 64-bit float using the writer's byte order.
	fn write_f64(&mut self, value: f64) -> Result<()> {
		Ok(self.get_writer().write_f64::<E>(value)?)
	}

	fn write_blob(&mut self, blob: &Blob) -> Result<()> {
		self.get_writer().write_all(blob.as_slice())?;
		Ok(())
	}

	fn write_slice(&mut self, buf: &[u8]) -> Result<()> {
		self.get_writer().write_all(buf)?;
		Ok(())
	}

	fn write_string(&mut self, text: &str) -> Result<()> {
		self.get_writer().write_all(text.as_bytes())?;
		Ok(())
	}

	/// Writes a protobuf field key: `varint((field_number << 3) | wire_type)`.
	fn write_pbf_key(&mut self, field_number: u32, wire_type: u8) -> Result<()> {
		self
			.write_varint((u64::from(field_number) << 3) | u64::from(wire_type))
			.context("Failed to write PBF key")
	}

	/// Writes a complete length-delimited field: key with wire type 2, varint length, payload.
	fn write_pbf_field(&mut self, field_number: u32, payload: &Blob) -> Result<()> {
		self
			.write_pbf_key(field_number, WIRE_LEN)
			.with_context(|| format!("Failed to write key of field {field_number}"))?;
		self
			.write_pbf_blob(payload)
			.with_context(|| format!("Failed to write payload of field {field_number}"))
	}

	/// Writes a packed repeated `uint32` payload (length prefix plus varints, no key).
	fn write_pbf_packed_uint32(&mut self, data: &[u32]) -> Result<()> {
		let mut writer = ValueWriterBlob::new_le();
		for &value in data {
			writer
				.write_varint(u64::from(value))
				.context("Failed to write varint for packed uint32")?;
		}
		self
			.write_pbf_blob(&writer.into_blob())
			.context("Failed to write packed uint32 blob")
	}

	/// Writes a length-prefixed blob (no key).
	fn write_pbf_blob(&mut self, blob: &Blob) -> Result<()> {
		self
			.write_varint(blob.len())
			.context("Failed to write varint for blob length")?;
		self.write_blob(blob).context("Failed to write PBF blob")
	}

	/// Writes a length-prefixed UTF-8 string (no key).
	fn write_pbf_string(&mut self, text: &str) -> Result<()> {
		self
			.write_varint(text.len() as u64)
			.context("Failed to write varint for string length")?;
		self.write_string(text).context("Failed to write PBF string")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use byteorder::LittleEndian;
	use rstest::rstest;
	use std::io::Cursor;

	struct MockValueWriter {
		cursor: Cursor<Vec<u8>>,
	}

	impl MockValueWriter {
		fn new() -> Self {
			Self {
				cursor: Cursor::new(Vec::new()),
			}
		}

		fn into_inner(self) -> Vec<u8> {
			self.cursor.into_inner()
		}
	}

	impl ValueWriter<LittleEndian> for MockValueWriter {
		fn get_writer(&mut self) -> &mut dyn Write {
			&mut self.cursor
		}

		fn position(&mut self) -> Result<u64> {
			Ok(self.cursor.position())
		}
	}

	#[rstest]
	#[case::zero(0, &[0x00])]
	#[case::one(1, &[0x01])]
	#[case::largest_single_byte(127, &[0x7F])]
	#[case::smallest_two_bytes(128, &[0x80, 0x01])]
	#[case::three_hundred(300, &[0xAC, 0x02])]
	#[case::half_extent(4096, &[0x80, 0x20])]
	#[case::max(u64::MAX, &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01])]
	fn varint_encoding(#[case] value: u64, #[case] expected: &[u8]) -> Result<()> {
		let mut writer = MockValueWriter::new();
		writer.write_varint(value)?;
		assert_eq!(writer.into_inner(), expected);
		Ok(())
	}

	#[test]
	fn svarint_encoding() -> Result<()> {
		let mut writer = MockValueWriter::new();
		writer.write_svarint(-75)?;
		assert_eq!(writer.into_inner(), vec![149, 1]);
		Ok(())
	}

	#[rstest]
	#[case::feature_id(1, WIRE_VARINT, 0x08)]
	#[case::feature_tags(2, WIRE_LEN, 0x12)]
	#[case::tile_layers(3, WIRE_LEN, 0x1A)]
	#[case::float_value(2, WIRE_FIXED32, 0x15)]
	#[case::double_value(3, WIRE_FIXED64, 0x19)]
	#[case::layer_version(15, WIRE_VARINT, 0x78)]
	fn pbf_keys(#[case] field: u32, #[case] wire_type: u8, #[case] expected: u8) -> Result<()> {
		let mut writer = MockValueWriter::new();
		writer.write_pbf_key(field, wire_type)?;
		assert_eq!(writer.into_inner(), vec![expected]);
		Ok(())
	}

	#[test]
	fn pbf_field_prefixes_key_and_length() -> Result<()> {
		let mut writer = MockValueWriter::new();
		writer.write_pbf_field(3, &Blob::from(&[0x0A, 0x00]))?;
		assert_eq!(writer.into_inner(), vec![0x1A, 0x02, 0x0A, 0x00]);
		Ok(())
	}

	#[test]
	fn pbf_field_with_empty_payload() -> Result<()> {
		let mut writer = MockValueWriter::new();
		writer.write_pbf_field(1, &Blob::new_empty())?;
		assert_eq!(writer.into_inner(), vec![0x0A, 0x00]);
		Ok(())
	}

	#[test]
	fn packed_uint32() -> Result<()> {
		let mut writer = MockValueWriter::new();
		writer.write_pbf_packed_uint32(&[9, 4096, 4096])?;
		assert_eq!(writer.into_inner(), vec![0x05, 0x09, 0x80, 0x20, 0x80, 0x20]);
		Ok(())
	}

	#[test]
	fn pbf_string() -> Result<()> {
		let mut writer = MockValueWriter::new();
		writer.write_pbf_string("isShallow")?;
		let mut expected = vec![9];
		expected.extend_from_slice(b"isShallow");
		assert_eq!(writer.into_inner(), expected);
		Ok(())
	}

	#[test]
	fn fixed_width_scalars() -> Result<()> {
		let mut writer = MockValueWriter::new();
		assert!(writer.is_empty()?);
		writer.write_u8(0xFF)?;
		writer.write_f32(1.0)?;
		writer.write_f64(1.0)?;
		assert_eq!(writer.position()?, 13);
		assert_eq!(
			writer.into_inner(),
			vec![0xFF, 0, 0, 0x80, 0x3F, 0, 0, 0, 0, 0, 0, 0xF0, 0x3F]
		);
		Ok(())
	}
}
