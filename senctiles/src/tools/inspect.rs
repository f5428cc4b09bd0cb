use anyhow::{Context, Result};
use senctiles_core::{
	Blob,
	compression::{decompress_gzip, is_gzip},
};
use senctiles_geometry::vector_tile::VectorTile;
use std::{fmt::Write, path::PathBuf};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// Tile file, raw or gzip-compressed
	pub file: PathBuf,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let blob = Blob::load_from_file(&arguments.file)
		.with_context(|| format!("Failed to read {:?}", arguments.file))?;
	print!("{}", describe(&blob)?);
	Ok(())
}

/// Human readable summary of a tile.
pub fn describe(blob: &Blob) -> Result<String> {
	let mut text = String::new();
	let raw = if is_gzip(blob) {
		writeln!(text, "gzip: {} bytes", blob.len())?;
		decompress_gzip(blob)?
	} else {
		blob.clone()
	};
	writeln!(text, "tile: {} bytes", raw.len())?;

	let tile = VectorTile::from_blob(&raw).context("Failed to decode vector tile")?;
	if tile.layers.is_empty() {
		writeln!(text, "no layers")?;
	}
	for layer in &tile.layers {
		writeln!(
			text,
			"layer '{}': version {}, extent {}, {} features",
			layer.name,
			layer.version,
			layer.extent,
			layer.features.len()
		)?;
		for feature in layer.to_features()? {
			let id = feature.id.map_or_else(|| "-".to_string(), |id| id.to_string());
			writeln!(text, "  #{id} {:?} {:?}", feature.geometry, feature.properties)?;
		}
	}
	Ok(text)
}
