use anyhow::{Context, Result};
use senctiles::{
	Palette, TileService,
	chart::{ChartSource, StubChartSource},
	config::{ChartConfig, Config},
	server::{AppState, TileServer},
};
use std::{path::PathBuf, sync::Arc};
use tokio::time::{Duration, sleep};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true, verbatim_doc_comment)]
pub struct Subcommand {
	/// Charts to serve, in addition to those listed in the configuration file.
	/// Each chart is given as "path" or "kind:path", e.g. "cm93:/data/cm93".
	/// The kind defaults to "senc". Handles are issued in order:
	///    "senc_1", "cm93_2", ...
	#[arg(num_args = 0.., verbatim_doc_comment)]
	pub charts: Vec<String>,

	/// Path to a configuration file (YAML format) listing server settings, charts and tile defaults.
	/// Command line arguments will override configuration file settings.
	#[arg(short = 'c', long, value_name = "FILE", display_order = 0)]
	pub config: Option<PathBuf>,

	/// Serve via socket ip. Default: 0.0.0.0
	#[arg(short = 'i', long, display_order = 0)]
	pub ip: Option<String>,

	/// Serve via port. Default: 8080
	#[arg(short, long, display_order = 0)]
	pub port: Option<u16>,

	/// Depth in metres separating safe from shallow soundings. Default: 0
	#[arg(long, allow_negative_numbers = true, display_order = 1)]
	pub safety_contour: Option<f64>,

	/// Palette of rendered tiles when a request names none. Default: day
	#[arg(long, display_order = 1)]
	pub palette: Option<Palette>,

	/// Register charts even if their path does not exist.
	#[arg(long, display_order = 1)]
	pub accept_missing: bool,

	/// Shutdown server automatically after x milliseconds.
	#[arg(long, display_order = 4)]
	pub auto_shutdown: Option<u64>,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let config = if let Some(config_path) = &arguments.config {
		Config::from_path(config_path)?
	} else {
		Config::default()
	};

	let mut server_config = config.server.clone();
	server_config.override_optional_ip(arguments.ip.as_deref());
	server_config.override_optional_port(arguments.port);

	let mut tiles_config = config.tiles.clone();
	tiles_config.override_optional_safety_contour(arguments.safety_contour);
	tiles_config.override_optional_accept_missing(arguments.accept_missing.then_some(true));

	let source: Arc<dyn ChartSource> = if tiles_config.accept_missing.unwrap_or(false) {
		Arc::new(StubChartSource::accept_missing())
	} else {
		Arc::new(StubChartSource::new())
	};
	let service = TileService::new(source).with_safety_contour(tiles_config.safety_contour.unwrap_or(0.0))?;

	let charts = arguments
		.charts
		.iter()
		.map(String::as_str)
		.map(ChartConfig::parse_argument)
		.chain(config.charts.iter().cloned());
	for chart in charts {
		let handle = service
			.build_senc(&chart.path, chart.kind())
			.with_context(|| format!("Failed to register chart '{}'", chart.path))?;
		eprintln!("   {:30}  <-  {}", format!("/tiles/{handle}/"), chart.path);
	}

	let mut state = AppState::new(Arc::new(service))?;
	state.palette = arguments.palette.or(tiles_config.palette).unwrap_or_default();
	let mut server = TileServer::from_config(&server_config, state);
	let address = server.start().await?;
	eprintln!("server starts listening on {address}");

	if let Some(milliseconds) = arguments.auto_shutdown {
		sleep(Duration::from_millis(milliseconds)).await;
		server.stop();
	} else {
		loop {
			sleep(Duration::from_secs(60)).await;
		}
	}

	Ok(())
}
