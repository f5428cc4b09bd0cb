//! Transport compression for encoded tiles.

mod gzip;

pub use gzip::*;

use crate::Blob;
use anyhow::Result;

/// Wraps encoded tiles in gzip for transport.
///
/// Unlike [`compress_gzip`], [`TransportCompressor::compress`] never fails: a broken deflate
/// stream is logged and answered with an empty blob. A successfully compressed payload is never
/// empty (even for an empty tile), so callers can tell the two apart by length alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransportCompressor;

impl TransportCompressor {
	#[must_use]
	pub fn new() -> Self {
		TransportCompressor
	}

	/// Compresses `blob`, returning an empty blob on failure.
	#[must_use]
	pub fn compress(&self, blob: &Blob) -> Blob {
		or_empty(compress_gzip(blob))
	}
}

fn or_empty(result: Result<Blob>) -> Blob {
	match result {
		Ok(blob) => blob,
		Err(err) => {
			log::warn!("gzip compression failed, returning empty payload: {err:#}");
			Blob::new_empty()
		}
	}
}
