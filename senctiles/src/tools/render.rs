use super::{service_with_charts, write_output};
use anyhow::Result;
use senctiles::{Palette, TileFormat, TileOptions};
use senctiles_core::TileCoord;
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// Zoom level
	pub z: u8,

	/// Tile column
	pub x: u32,

	/// Tile row, counted from the north
	pub y: u32,

	/// Output format: png or mvt
	#[arg(short, long, default_value = "png")]
	pub format: TileFormat,

	/// Colour palette: day, dusk or night
	#[arg(long, default_value = "day")]
	pub palette: Palette,

	/// Depth in metres separating safe from shallow soundings
	#[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
	pub safety_contour: f64,

	/// Charts contributing soundings to MVT output, as "path" or "kind:path"
	#[arg(long = "chart", value_name = "CHART")]
	pub charts: Vec<String>,

	/// Accept chart paths that do not exist
	#[arg(long)]
	pub accept_missing: bool,

	/// Output file. Default: stdout
	#[arg(short, long, value_name = "FILE")]
	pub output: Option<PathBuf>,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let options = TileOptions::new(arguments.format, arguments.palette, arguments.safety_contour)?;
	let coord = TileCoord::new(arguments.z, arguments.x, arguments.y)?;
	let service = service_with_charts(&arguments.charts, arguments.accept_missing, arguments.safety_contour)?;

	log::info!("render {coord:?} as {}", options.format);
	let blob = service.generate_tile(&coord.to_geo_bbox(), coord.level, &options)?;
	write_output(&blob, arguments.output.as_ref())
}
