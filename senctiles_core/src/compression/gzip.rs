use crate::Blob;
use anyhow::{Context, Result};
use flate2::{Compression, GzBuilder, bufread::GzDecoder};
use std::io::Read;

/// Gzip header value for "unknown operating system".
pub const GZIP_OS_UNKNOWN: u8 = 255;

/// Compresses data into a gzip container at the best compression level.
///
/// The header carries no file name, a zero modification time and OS byte 255, so the output
/// depends on the input bytes only.
///
/// # Errors
///
/// * If the deflate stream fails.
pub fn compress_gzip(blob: &Blob) -> Result<Blob> {
	let mut encoder = GzBuilder::new()
		.operating_system(GZIP_OS_UNKNOWN)
		.mtime(0)
		.buf_read(blob.as_slice(), Compression::best());
	let mut compressed_data = Vec::with_capacity(blob.as_slice().len() / 2 + 32);
	encoder
		.read_to_end(&mut compressed_data)
		.context("Failed to compress data using Gzip")?;
	Ok(Blob::from(compressed_data))
}

/// Decompresses a gzip container.
///
/// # Errors
///
/// * If the data is not a valid gzip stream.
pub fn decompress_gzip(blob: &Blob) -> Result<Blob> {
	let mut decoder = GzDecoder::new(blob.as_slice());
	let mut decompressed_data = Vec::new();
	decoder
		.read_to_end(&mut decompressed_data)
		.context("Failed to decompress data using Gzip")?;
	Ok(Blob::from(decompressed_data))
}

/// Returns `true` if the blob starts with the gzip magic bytes.
#[must_use]
pub fn is_gzip(blob: &Blob) -> bool {
	blob.as_slice().starts_with(&[0x1f, 0x8b])
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn generate_test_data(size: usize) -> Blob {
		Blob::from((0..size).map(|i| ((i * 7) % 251) as u8).collect::<Vec<u8>>())
	}

	#[test]
	fn should_compress_and_decompress_gzip_correctly() -> Result<()> {
		let data = generate_test_data(100_000);
		let compressed = compress_gzip(&data)?;
		assert!(compressed.len() < data.len());
		let decompressed = decompress_gzip(&compressed)?;
		assert_eq!(data, decompressed, "Gzip compression and decompression failed");
		Ok(())
	}

	#[test]
	fn header_is_reproducible() -> Result<()> {
		let compressed = compress_gzip(&Blob::from("SOUNDG"))?;
		let header = &compressed.as_slice()[..10];
		// magic, deflate, no flags, mtime 0, xfl "best", os unknown
		assert_eq!(header, &[0x1f, 0x8b, 0x08, 0x00, 0, 0, 0, 0, 0x02, 0xff]);
		assert_eq!(compressed, compress_gzip(&Blob::from("SOUNDG"))?);
		Ok(())
	}

	#[test]
	fn empty_input_gives_non_empty_container() -> Result<()> {
		let compressed = compress_gzip(&Blob::new_empty())?;
		assert!(!compressed.is_empty());
		assert!(is_gzip(&compressed));
		assert!(decompress_gzip(&compressed)?.is_empty());
		Ok(())
	}

	#[test]
	fn decompress_rejects_garbage() {
		assert!(decompress_gzip(&Blob::from("not gzip")).is_err());
		assert!(!is_gzip(&Blob::from("not gzip")));
	}
}
