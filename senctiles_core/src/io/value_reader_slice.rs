//! [`ValueReaderSlice`] reads protobuf values from a borrowed byte slice.
//!
//! ```rust
//! use senctiles_core::io::{ValueReader, ValueReaderSlice};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let mut reader = ValueReaderSlice::new_le(&[0x78, 0x02]);
//!     assert_eq!(reader.read_pbf_key()?, (15, 0));
//!     assert_eq!(reader.read_varint()?, 2);
//!     Ok(())
//! }
//! ```

use super::{SeekRead, ValueReader};
use anyhow::{Result, anyhow, bail};
use byteorder::{ByteOrder, LittleEndian};
use std::{io::Cursor, marker::PhantomData};

/// Reads values from a byte slice using byte order `E`.
pub struct ValueReaderSlice<'a, E: ByteOrder> {
	_phantom: PhantomData<E>,
	cursor: Cursor<&'a [u8]>,
	len: u64,
}

impl<'a, E: ByteOrder> ValueReaderSlice<'a, E> {
	#[must_use]
	pub fn new(slice: &'a [u8]) -> ValueReaderSlice<'a, E> {
		ValueReaderSlice {
			_phantom: PhantomData,
			len: slice.len() as u64,
			cursor: Cursor::new(slice),
		}
	}
}

impl<'a> ValueReaderSlice<'a, LittleEndian> {
	#[must_use]
	pub fn new_le(slice: &'a [u8]) -> ValueReaderSlice<'a, LittleEndian> {
		ValueReaderSlice::new(slice)
	}
}

impl SeekRead for Cursor<&[u8]> {}

impl<'a, E: ByteOrder + 'a> ValueReader<'a, E> for ValueReaderSlice<'a, E> {
	fn get_reader(&mut self) -> &mut dyn SeekRead {
		&mut self.cursor
	}

	fn len(&self) -> u64 {
		self.len
	}

	fn position(&mut self) -> u64 {
		self.cursor.position()
	}

	fn get_sub_reader<'b>(&'b mut self, length: u64) -> Result<Box<dyn ValueReader<'b, E> + 'b>>
	where
		E: 'b,
	{
		let start = self.cursor.position();
		let end = start
			.checked_add(length)
			.ok_or_else(|| anyhow!("sub-reader length overflows"))?;
		if end > self.len {
			bail!("Requested sub-reader length exceeds remaining data");
		}

		self.cursor.set_position(end);
		Ok(Box::new(ValueReaderSlice {
			_phantom: PhantomData,
			len: length,
			cursor: Cursor::new(
				self
					.cursor
					.get_ref()
					.get(start as usize..end as usize)
					.ok_or_else(|| anyhow!("out of bounds"))?,
			),
		}))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_slice() {
		let mut reader = ValueReaderSlice::new_le(&[]);
		assert!(reader.is_empty());
		assert!(!reader.has_remaining());
		assert!(reader.read_u8().is_err());
	}

	#[test]
	fn positions() -> Result<()> {
		let mut reader = ValueReaderSlice::new_le(&[0x01, 0x02, 0x03]);
		assert_eq!(reader.len(), 3);
		reader.read_u8()?;
		assert_eq!(reader.position(), 1);
		assert_eq!(reader.remaining(), 2);
		Ok(())
	}

	#[test]
	fn sub_reader_exceeding_data() {
		let mut reader = ValueReaderSlice::new_le(&[0x01, 0x02]);
		assert!(reader.get_sub_reader(3).is_err());
		assert!(reader.get_sub_reader(u64::MAX).is_err());
	}

	#[test]
	fn sub_reader_advances_parent() -> Result<()> {
		let mut reader = ValueReaderSlice::new_le(&[0x01, 0x02, 0x03]);
		{
			let mut sub = reader.get_sub_reader(2)?;
			assert_eq!(sub.read_u8()?, 1);
		}
		assert_eq!(reader.read_u8()?, 3);
		Ok(())
	}
}
