mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{ErrorLevel, Verbosity};

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<ErrorLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Decode a vector tile and print its layers and features
	Inspect(tools::inspect::Subcommand),

	/// Render a tile as PNG or MVT
	Render(tools::render::Subcommand),

	#[clap(alias = "server")]
	/// Serve chart tiles via http
	Serve(tools::serve::Subcommand),

	/// Write a single vector tile of a chart
	Tile(tools::tile::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(cli)
}

fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Inspect(arguments) => tools::inspect::run(arguments),
		Commands::Render(arguments) => tools::render::run(arguments),
		Commands::Serve(arguments) => tools::serve::run(arguments),
		Commands::Tile(arguments) => tools::tile::run(arguments),
	}
}
