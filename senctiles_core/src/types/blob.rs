//! This module provides the [`Blob`] struct, an owned, length-tracked byte buffer.
//!
//! Every encoder and compressor in the workspace hands its result back as a [`Blob`] by value,
//! so callers never have to pair an allocation with a manual release.
//!
//! # Examples
//!
//! ```rust
//! use senctiles_core::Blob;
//!
//! let blob = Blob::from(vec![0x1a, 0x00]);
//! assert_eq!(blob.len(), 2);
//! assert_eq!(blob.as_hex(), "1a 00");
//! assert_eq!(blob.into_vec(), vec![0x1a, 0x00]);
//! ```

use anyhow::Result;
use std::fmt::Debug;
use std::path::Path;

/// A simple wrapper around [`Vec<u8>`] that provides additional methods for working with byte data.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Blob(Vec<u8>);

impl Blob {
	/// Creates an empty `Blob`.
	///
	/// ```rust
	/// use senctiles_core::Blob;
	///
	/// let empty_blob = Blob::new_empty();
	/// assert!(empty_blob.is_empty());
	/// ```
	#[must_use]
	pub fn new_empty() -> Blob {
		Blob(Vec::new())
	}

	/// Creates a `Blob` of `length` zero bytes.
	#[must_use]
	pub fn new_sized(length: usize) -> Blob {
		Blob(vec![0u8; length])
	}

	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		self.0.as_ref()
	}

	pub fn as_mut_slice(&mut self) -> &mut [u8] {
		self.0.as_mut()
	}

	/// Consumes this [`Blob`] and returns the underlying `Vec<u8>`.
	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Interprets the bytes as UTF-8 text, replacing invalid sequences.
	#[must_use]
	pub fn as_lossy_str(&self) -> std::borrow::Cow<'_, str> {
		String::from_utf8_lossy(&self.0)
	}

	/// Returns a hexadecimal string representation of the bytes, separated by spaces.
	///
	/// ```rust
	/// use senctiles_core::Blob;
	///
	/// let blob = Blob::from(&[0xDE, 0xAD, 0xBE, 0xEF]);
	/// assert_eq!(blob.as_hex(), "de ad be ef");
	/// ```
	#[must_use]
	pub fn as_hex(&self) -> String {
		self
			.0
			.iter()
			.map(|byte| format!("{byte:02x}"))
			.collect::<Vec<_>>()
			.join(" ")
	}

	/// Returns the length in bytes.
	#[must_use]
	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Writes the bytes to `path`, replacing any existing file.
	pub fn save_to_file(&self, path: &Path) -> Result<()> {
		std::fs::write(path, &self.0)?;
		Ok(())
	}

	/// Reads all bytes of the file at `path`.
	pub fn load_from_file(path: &Path) -> Result<Self> {
		Ok(Blob::from(std::fs::read(path)?))
	}
}

impl From<Vec<u8>> for Blob {
	fn from(item: Vec<u8>) -> Self {
		Blob(item)
	}
}

impl From<&[u8]> for Blob {
	fn from(item: &[u8]) -> Self {
		Blob(item.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	fn from(item: &[u8; N]) -> Self {
		Blob(item.to_vec())
	}
}

impl From<&str> for Blob {
	fn from(item: &str) -> Self {
		Blob(item.as_bytes().to_vec())
	}
}

impl From<String> for Blob {
	fn from(item: String) -> Self {
		Blob(item.into_bytes())
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		const MAX: usize = 32;
		let len = self.0.len();
		let shown = Blob(self.0[..len.min(MAX)].to_vec()).as_hex();
		if len > MAX {
			write!(f, "Blob({len}): {shown} ...")
		} else {
			write!(f, "Blob({len}): {shown}")
		}
	}
}
