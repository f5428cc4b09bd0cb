//! Vector tile **layers**.
//!
//! Wire layout of a layer message:
//!  * field 1: `name` (string)
//!  * field 2: repeated `feature` (embedded message)
//!  * field 3: repeated `keys` (string)
//!  * field 4: repeated `values` (embedded message)
//!  * field 5: `extent` (varint, default 4096)
//!  * field 15: `version` (varint)

use super::{feature::VectorTileFeature, property_manager::PropertyManager, value::GeoValuePBF};
use crate::geo::{GeoFeature, GeoProperties, GeoValue};
use anyhow::{Context, Result, anyhow, bail};
use byteorder::LE;
use senctiles_core::{
	Blob,
	io::{ValueReader, ValueWriter, ValueWriterBlob, WIRE_LEN, WIRE_VARINT},
};

pub const DEFAULT_EXTENT: u32 = 4096;
pub const LAYER_VERSION: u32 = 2;

/// A named layer: features plus the key/value dictionaries their tags point into.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorTileLayer {
	pub extent: u32,
	pub features: Vec<VectorTileFeature>,
	pub name: String,
	pub property_manager: PropertyManager,
	pub version: u32,
}

impl VectorTileLayer {
	#[must_use]
	pub fn new(name: String, extent: u32, version: u32) -> VectorTileLayer {
		VectorTileLayer {
			extent,
			features: vec![],
			name,
			property_manager: PropertyManager::default(),
			version,
		}
	}

	/// A version 2 layer with the default extent of 4096.
	#[must_use]
	pub fn new_standard(name: &str) -> VectorTileLayer {
		VectorTileLayer::new(name.to_string(), DEFAULT_EXTENT, LAYER_VERSION)
	}

	pub fn read(reader: &mut dyn ValueReader<'_, LE>) -> Result<VectorTileLayer> {
		let mut extent = DEFAULT_EXTENT;
		let mut features: Vec<VectorTileFeature> = Vec::new();
		let mut name = None;
		let mut property_manager = PropertyManager::new();
		let mut version = 1;

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 2) => name = Some(reader.read_pbf_string().context("Failed to read layer name")?),
				(2, 2) => features.push(
					VectorTileFeature::read(
						reader
							.get_pbf_sub_reader()
							.context("Failed to get PBF sub-reader for feature")?
							.as_mut(),
					)
					.context("Failed to read VectorTileFeature")?,
				),
				(3, 2) => {
					property_manager.add_key(reader.read_pbf_string().context("Failed to read property key")?);
				}
				(4, 2) => {
					property_manager.add_val(
						GeoValue::read(
							reader
								.get_pbf_sub_reader()
								.context("Failed to get PBF sub-reader for property value")?
								.as_mut(),
						)
						.context("Failed to read GeoValue")?,
					);
				}
				(5, 0) => extent = u32::try_from(reader.read_varint().context("Failed to read extent")?)?,
				(15, 0) => version = u32::try_from(reader.read_varint().context("Failed to read version")?)?,
				(f, w) => bail!("Unexpected combination of field number ({f}) and wire type ({w})"),
			}
		}

		Ok(VectorTileLayer {
			extent,
			features,
			name: name
				.ok_or(anyhow!("Layer name is required"))
				.context("Failed to get layer name")?,
			property_manager,
			version,
		})
	}

	/// Serializes the layer. `extent` is only written when it differs from 4096; `version` is
	/// always written.
	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		writer
			.write_pbf_key(1, WIRE_LEN)
			.context("Failed to write PBF key for layer name")?;
		writer
			.write_pbf_string(&self.name)
			.context("Failed to write layer name")?;

		for feature in &self.features {
			writer
				.write_pbf_field(2, &feature.to_blob().context("Failed to convert feature to blob")?)
				.context("Failed to write feature blob")?;
		}

		for key in self.property_manager.iter_key() {
			writer
				.write_pbf_key(3, WIRE_LEN)
				.context("Failed to write PBF key for property key")?;
			writer.write_pbf_string(key).context("Failed to write property key")?;
		}

		for value in self.property_manager.iter_val() {
			writer
				.write_pbf_field(4, &value.to_blob().context("Failed to convert property value to blob")?)
				.context("Failed to write property value blob")?;
		}

		if self.extent != DEFAULT_EXTENT {
			writer
				.write_pbf_key(5, WIRE_VARINT)
				.context("Failed to write PBF key for extent")?;
			writer
				.write_varint(u64::from(self.extent))
				.context("Failed to write extent")?;
		}

		writer
			.write_pbf_key(15, WIRE_VARINT)
			.context("Failed to write PBF key for version")?;
		writer
			.write_varint(u64::from(self.version))
			.context("Failed to write version")?;

		Ok(writer.into_blob())
	}

	/// Encodes a feature whose geometry is already in tile-local units and appends it.
	pub fn add_feature(&mut self, feature: &GeoFeature) -> Result<()> {
		let mut encoded = VectorTileFeature::from_geometry(feature.id, vec![], &feature.geometry)
			.with_context(|| format!("Failed to encode feature {:?} of layer '{}'", feature.id, self.name))?;
		// tags are interned only once the geometry is known to be encodable
		encoded.tag_ids = self.encode_tag_ids(feature.properties.clone());
		self.features.push(encoded);
		Ok(())
	}

	/// Decodes all features with their properties.
	pub fn to_features(&self) -> Result<Vec<GeoFeature>> {
		self
			.features
			.iter()
			.map(|feature| {
				let properties = self.decode_tag_ids(&feature.tag_ids)?;
				feature.to_feature(properties)
			})
			.collect()
	}

	pub fn encode_tag_ids(&mut self, properties: GeoProperties) -> Vec<u32> {
		self.property_manager.encode_tag_ids(properties)
	}

	pub fn decode_tag_ids(&self, tag_ids: &[u32]) -> Result<GeoProperties> {
		self.property_manager.decode_tag_ids(tag_ids)
	}
}
