use super::layer::VectorTileLayer;
use anyhow::{Context, Result, bail};
use senctiles_core::{Blob, io::*};

/// A vector tile: a sequence of layers. A tile without layers serializes to zero bytes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorTile {
	pub layers: Vec<VectorTileLayer>,
}

impl VectorTile {
	#[must_use]
	pub fn new(layers: Vec<VectorTileLayer>) -> VectorTile {
		VectorTile { layers }
	}

	pub fn from_blob(blob: &Blob) -> Result<VectorTile> {
		let mut reader = ValueReaderSlice::new_le(blob.as_slice());

		let mut tile = VectorTile::default();
		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(3, 2) => {
					tile.layers.push(
						VectorTileLayer::read(
							reader
								.get_pbf_sub_reader()
								.context("Failed to get PBF sub-reader")?
								.as_mut(),
						)
						.context("Failed to read VectorTileLayer")?,
					);
				}
				(f, w) => bail!("Unexpected combination of field number ({f}) and wire type ({w})"),
			}
		}

		Ok(tile)
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		for layer in &self.layers {
			writer
				.write_pbf_field(3, &layer.to_blob().context("Failed to convert VectorTileLayer to blob")?)
				.context("Failed to write layer")?;
		}

		Ok(writer.into_blob())
	}

	#[must_use]
	pub fn find_layer(&self, name: &str) -> Option<&VectorTileLayer> {
		self.layers.iter().find(|layer| layer.name == name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::geo::{GeoFeature, Geometry};

	#[test]
	fn empty_tile_is_zero_bytes() -> Result<()> {
		let blob = VectorTile::default().to_blob()?;
		assert!(blob.is_empty());
		assert_eq!(VectorTile::from_blob(&blob)?, VectorTile::default());
		Ok(())
	}

	#[test]
	fn layers_round_trip() -> Result<()> {
		let mut water = VectorTileLayer::new_standard("DEPARE");
		water.add_feature(&GeoFeature::new(Geometry::new_line_string(vec![[0, 0], [10, 10]])))?;
		let tile = VectorTile::new(vec![water, VectorTileLayer::new_standard("SOUNDG")]);

		let decoded = VectorTile::from_blob(&tile.to_blob()?)?;
		assert_eq!(decoded, tile);
		assert!(decoded.find_layer("SOUNDG").is_some());
		assert!(decoded.find_layer("LNDARE").is_none());
		Ok(())
	}

	#[test]
	fn unexpected_field() {
		let error = VectorTile::from_blob(&Blob::from(&[0x08, 0x01])).unwrap_err();
		assert_eq!(
			error.to_string(),
			"Unexpected combination of field number (1) and wire type (0)"
		);
	}
}
