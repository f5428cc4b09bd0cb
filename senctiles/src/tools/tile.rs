use super::{service_with_charts, write_output};
use anyhow::{Context, Result};
use senctiles_core::TileCoord;
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// Chart to read, as "path" or "kind:path"
	pub chart: String,

	/// Zoom level
	pub z: u8,

	/// Tile column
	pub x: u32,

	/// Tile row, counted from the north
	pub y: u32,

	/// Output file. Default: stdout
	#[arg(short, long, value_name = "FILE")]
	pub output: Option<PathBuf>,

	/// Write the uncompressed tile instead of gzip
	#[arg(long)]
	pub raw: bool,

	/// Depth in metres separating safe from shallow soundings
	#[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
	pub safety_contour: f64,

	/// Accept chart paths that do not exist
	#[arg(long)]
	pub accept_missing: bool,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let service = service_with_charts(
		std::slice::from_ref(&arguments.chart),
		arguments.accept_missing,
		arguments.safety_contour,
	)?;
	let handle = service
		.registry()
		.handles()
		.into_iter()
		.next()
		.context("no chart registered")?;
	let coord = TileCoord::new(arguments.z, arguments.x, arguments.y)?;
	log::info!("write tile {coord:?} of {handle}");

	let blob = if arguments.raw {
		service.query_tile(handle.as_str(), coord.level, coord.x, coord.y)?
	} else {
		service.query_tile_mvt(handle.as_str(), coord.level, coord.x, coord.y)?
	};
	write_output(&blob, arguments.output.as_ref())
}
