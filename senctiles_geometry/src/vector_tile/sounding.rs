//! The sounding layer and its safety-contour rule.
//!
//! Every sounding carrying a numeric `DEPTH` attribute is tagged with `isShallow`, a boolean that
//! is `true` when the depth lies above the navigator's safety contour. The depth attribute itself
//! is consumed by the rule; all other attributes are kept.

use super::{VectorTile, VectorTileLayer};
use crate::geo::{GeoFeature, GeoProperties, GeoValue};
use anyhow::{Context, Result};
use log::trace;
use senctiles_core::Blob;

pub const SOUNDING_LAYER: &str = "SOUNDG";
pub const DEPTH_KEY: &str = "DEPTH";
pub const IS_SHALLOW_KEY: &str = "isShallow";

/// `true` if a sounding of `depth` is shallower than `safety_contour`.
#[must_use]
pub fn is_shallow(depth: f64, safety_contour: f64) -> bool {
	depth < safety_contour
}

/// Encodes soundings (already in tile-local units) into a single-layer tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoundingEncoder {
	safety_contour: f64,
}

impl SoundingEncoder {
	#[must_use]
	pub fn new(safety_contour: f64) -> SoundingEncoder {
		SoundingEncoder { safety_contour }
	}

	/// Replaces a numeric `DEPTH` with the derived `isShallow` flag.
	#[must_use]
	pub fn apply_safety_rule(&self, mut properties: GeoProperties) -> GeoProperties {
		let depth = properties.get(DEPTH_KEY).and_then(GeoValue::as_f64);
		if let Some(depth) = depth {
			properties.remove(DEPTH_KEY);
			properties.insert(
				IS_SHALLOW_KEY.to_string(),
				GeoValue::Bool(is_shallow(depth, self.safety_contour)),
			);
		}
		properties
	}

	/// Builds the tile. No features yield a tile without layers.
	pub fn encode(&self, features: &[GeoFeature]) -> Result<VectorTile> {
		if features.is_empty() {
			return Ok(VectorTile::default());
		}

		let mut layer = VectorTileLayer::new_standard(SOUNDING_LAYER);
		for feature in features {
			let mut feature = feature.clone();
			feature.properties = self.apply_safety_rule(feature.properties);
			layer.add_feature(&feature)?;
		}
		trace!(
			"encoded {} soundings with safety contour {}",
			layer.features.len(),
			self.safety_contour
		);

		Ok(VectorTile::new(vec![layer]))
	}

	/// Builds the tile and serializes it.
	pub fn encode_blob(&self, features: &[GeoFeature]) -> Result<Blob> {
		self
			.encode(features)?
			.to_blob()
			.context("Failed to serialize sounding tile")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::geo::Geometry;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	fn sounding(depth: f64) -> GeoFeature {
		let mut feature = GeoFeature::new(Geometry::new_point([2048, 2048]));
		feature.set_id(1);
		feature.set_property(DEPTH_KEY, depth);
		feature
	}

	fn reference_tile(shallow: bool) -> Vec<u8> {
		let mut bytes = vec![0x1a, 0x2a]; // layer, 42 bytes
		bytes.extend_from_slice(&[0x0a, 0x06]); // name
		bytes.extend_from_slice(b"SOUNDG");
		bytes.extend_from_slice(&[0x12, 0x0f]); // feature, 15 bytes
		bytes.extend_from_slice(&[0x08, 0x01]); // id 1
		bytes.extend_from_slice(&[0x12, 0x02, 0x00, 0x00]); // tags [0, 0]
		bytes.extend_from_slice(&[0x18, 0x01]); // type Point
		bytes.extend_from_slice(&[0x22, 0x05, 0x09, 0x80, 0x20, 0x80, 0x20]); // MoveTo(2048, 2048)
		bytes.extend_from_slice(&[0x1a, 0x09]); // key
		bytes.extend_from_slice(b"isShallow");
		bytes.extend_from_slice(&[0x22, 0x02, 0x38, u8::from(shallow)]); // bool value
		bytes.extend_from_slice(&[0x78, 0x02]); // version 2
		bytes
	}

	#[rstest]
	#[case::sounding_shallower_than_contour(10.0, true)]
	#[case::sounding_deeper_than_contour(2.0, false)]
	fn reference_bytes(#[case] safety_contour: f64, #[case] shallow: bool) -> Result<()> {
		let blob = SoundingEncoder::new(safety_contour).encode_blob(&[sounding(5.0)])?;
		assert_eq!(blob.len(), 44);
		assert_eq!(blob.into_vec(), reference_tile(shallow));
		Ok(())
	}

	#[rstest]
	#[case(5.0, 10.0, true)]
	#[case(5.0, 2.0, false)]
	#[case(5.0, 5.0, false)]
	#[case(-1.0, 0.0, true)]
	fn safety_rule(#[case] depth: f64, #[case] contour: f64, #[case] expected: bool) {
		assert_eq!(is_shallow(depth, contour), expected);
	}

	#[test]
	fn decoded_tile_has_one_point_and_one_bool_tag() -> Result<()> {
		let blob = SoundingEncoder::new(10.0).encode_blob(&[sounding(5.0)])?;
		let tile = VectorTile::from_blob(&blob)?;
		assert_eq!(tile.layers.len(), 1);
		let layer = &tile.layers[0];
		assert_eq!(layer.name, "SOUNDG");
		let features = layer.to_features()?;
		assert_eq!(features.len(), 1);
		assert_eq!(features[0].geometry, Geometry::new_point([2048, 2048]));
		assert_eq!(
			features[0].properties,
			GeoProperties::from(vec![(IS_SHALLOW_KEY, GeoValue::Bool(true))])
		);
		Ok(())
	}

	#[test]
	fn empty_feature_set_gives_empty_tile() -> Result<()> {
		let encoder = SoundingEncoder::new(10.0);
		assert_eq!(encoder.encode(&[])?, VectorTile::default());
		assert!(encoder.encode_blob(&[])?.len() < 16);
		Ok(())
	}

	#[test]
	fn other_attributes_pass_through() {
		let encoder = SoundingEncoder::new(3.0);
		let properties = GeoProperties::from(vec![
			("OBJNAM", GeoValue::from("Shoal")),
			(DEPTH_KEY, GeoValue::Float(1.5)),
			("QUASOU", GeoValue::from(6)),
		]);
		assert_eq!(
			encoder.apply_safety_rule(properties),
			GeoProperties::from(vec![
				("OBJNAM", GeoValue::from("Shoal")),
				("QUASOU", GeoValue::from(6)),
				(IS_SHALLOW_KEY, GeoValue::Bool(true)),
			])
		);
	}

	#[test]
	fn non_numeric_depth_is_left_alone() {
		let encoder = SoundingEncoder::new(3.0);
		let properties = GeoProperties::from(vec![(DEPTH_KEY, GeoValue::from("unknown"))]);
		assert_eq!(encoder.apply_safety_rule(properties.clone()), properties);
	}

	#[test]
	fn features_share_dictionaries() -> Result<()> {
		let mut second = sounding(20.0);
		second.set_id(2);
		let tile = SoundingEncoder::new(10.0).encode(&[sounding(5.0), second])?;
		let layer = &tile.layers[0];
		assert_eq!(layer.property_manager.key.len(), 1);
		assert_eq!(layer.property_manager.val.len(), 2);
		assert_eq!(layer.features[1].tag_ids, vec![0, 1]);
		Ok(())
	}
}
